use std::io;
use std::path::Path;

use tokio::fs;

/// Permission bits for directories created by the toolkit
pub const DIR_MODE: u32 = 0o755;

/// Creates `path` and any missing parents unless it already exists.
///
/// Errors other than "not found" from the existence check are returned as is,
/// and so are errors from the creation itself.
pub async fn create_dir_if_not_exists(path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();

    match fs::metadata(path).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let mut builder = fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            builder.mode(DIR_MODE);
            builder.create(path).await?;

            log::debug!("created directory {}", path.display());
            Ok(())
        }
        Err(e) => Err(e),
    }
}
