//! Serving files as downloads

use std::io;
use std::path::Path;

use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse};

/// Serves the file at `path` as an attachment the client saves under
/// `display_name`.
///
/// Conditional and range requests are answered by `actix-files`. A missing or
/// unreadable file is returned as the I/O error, which actix maps to 404.
pub async fn download_static_file(
    req: &HttpRequest,
    path: impl AsRef<Path>,
    display_name: &str,
) -> io::Result<HttpResponse> {
    let file = NamedFile::open_async(path).await?;

    Ok(file
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(display_name.to_string())],
        })
        .into_response(req))
}

/// Same as [`download_static_file`] for `file` inside `dir`.
pub async fn download_static_file_in(
    req: &HttpRequest,
    dir: impl AsRef<Path>,
    file: impl AsRef<Path>,
    display_name: &str,
) -> io::Result<HttpResponse> {
    download_static_file(req, dir.as_ref().join(file), display_name).await
}
