use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use clap::{Args, Parser, Subcommand};
use toolkit::config::{DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_JSON_SIZE};
use toolkit::routes::{self, ServiceSettings};
use toolkit::{HttpTransport, JsonConfig, JsonTransport, UploadConfig};

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the demo HTTP service
    Serve(ServeArgs),

    /// Print the slug of a text
    Slugify { text: String },

    /// Create a directory and its parents unless it exists
    Mkdir { path: PathBuf },

    /// Print a random string
    Random {
        #[arg(default_value = "10")]
        length: usize,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,

    /// Number of worker threads
    #[arg(long, default_value = "1")]
    workers: usize,

    /// Directory uploaded files are written to
    #[arg(long, default_value = "./uploads")]
    uploads_dir: PathBuf,

    /// Maximum size of a multipart form in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: usize,

    /// Sniffed content type accepted for uploads, repeatable; all types when omitted
    #[arg(long = "allowed-file-type")]
    allowed_file_types: Vec<String>,

    /// Keep the client's file names instead of generating random ones
    #[arg(long)]
    keep_file_names: bool,

    /// Maximum size of a JSON request body in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_JSON_SIZE)]
    max_json_size: usize,

    /// Accept JSON keys the target type does not know
    #[arg(long)]
    allow_unknown_fields: bool,

    /// Where /remote-service relays to; defaults to this server's /simulated-service
    #[arg(long)]
    remote_uri: Option<String>,

    /// File served by /download
    #[arg(long, default_value = "./files/pic.jpg")]
    download_path: PathBuf,

    /// File name the client saves the download as
    #[arg(long, default_value = "pic.jpg")]
    download_name: String,
}

impl ServeArgs {
    fn settings(&self) -> ServiceSettings {
        let remote_uri = self.remote_uri.clone().unwrap_or_else(|| {
            let port = self.bind.rsplit(':').next().unwrap_or("8080");
            format!("http://localhost:{port}/simulated-service")
        });

        ServiceSettings {
            uploads_dir: self.uploads_dir.clone(),
            upload: UploadConfig {
                max_total_bytes: self.max_file_size,
                allowed_content_types: self.allowed_file_types.clone(),
                rename_files: !self.keep_file_names,
            },
            remote_uri,
            download_path: self.download_path.clone(),
            download_name: self.download_name.clone(),
        }
    }

    fn json_config(&self) -> JsonConfig {
        JsonConfig {
            max_body_bytes: self.max_json_size,
            allow_unknown_fields: self.allow_unknown_fields,
        }
    }
}

async fn serve(args: ServeArgs) -> io::Result<()> {
    let settings = web::Data::new(args.settings());
    let json_config = web::Data::new(args.json_config());
    let transport: Arc<dyn JsonTransport> = Arc::new(HttpTransport::default());
    let transport = web::Data::from(transport);

    toolkit::create_dir_if_not_exists(&settings.uploads_dir).await?;
    log::info!("starting service on {}", args.bind);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new(r#"%a "%r" %s %b %T"#))
            .app_data(settings.clone())
            .app_data(json_config.clone())
            .app_data(transport.clone())
            .configure(routes::configure_routes)
    })
    .workers(args.workers)
    .bind(&args.bind)?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::Slugify { text } => {
            let slug = toolkit::slugify(&text).map_err(io::Error::other)?;
            println!("{slug}");
            Ok(())
        }
        Command::Mkdir { path } => {
            toolkit::create_dir_if_not_exists(&path).await?;
            log::info!("{} is ready", path.display());
            Ok(())
        }
        Command::Random { length } => {
            let s = toolkit::random_string(length).map_err(io::Error::other)?;
            println!("{s}");
            Ok(())
        }
    }
}
