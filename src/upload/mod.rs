//! Multipart file uploads
//!
//! A form is read completely before any file becomes visible under its final
//! name, so the size ceiling applies to the whole form. File parts are
//! streamed into hidden temporary files in the upload directory while the
//! form is read. Each one is then sniffed, checked against the allow-list,
//! named and moved into place in the order it appeared. Temporary files that
//! are never moved are removed when the upload ends.

pub mod error;
pub mod sniff;

use std::io;
use std::path::Path;

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use serde::Serialize;
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub use error::{UploadError, UploadFailure};
pub use sniff::{SNIFF_LEN, detect_content_type};

use crate::config::UploadConfig;
use crate::dirs::create_dir_if_not_exists;
use crate::random::random_string;

/// Length of the random stem given to renamed files
const RENAMED_STEM_LEN: usize = 10;

/// Permission bits for stored files
pub const FILE_MODE: u32 = 0o644;

/// A file part that was written to the upload directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    pub new_name: String,
    pub original_name: String,
    pub size: u64,
}

/// A file part spooled to a temporary file, waiting to be stored
struct FilePart {
    filename: String,
    /// Leading bytes kept for sniffing
    head: Vec<u8>,
    size: u64,
    file: NamedTempFile,
}

/// Stores every file part of `multipart` under `upload_dir`.
///
/// Fails on the first rejected or unwritable part. Files stored before that
/// point are not removed and are returned inside the [`UploadFailure`].
pub async fn upload_files(
    mut multipart: Multipart,
    upload_dir: impl AsRef<Path>,
    config: &UploadConfig,
) -> Result<Vec<UploadedFile>, UploadFailure> {
    let upload_dir = upload_dir.as_ref();
    create_dir_if_not_exists(upload_dir).await.map_err(UploadError::from)?;

    let parts = read_form(&mut multipart, upload_dir, config.max_total_bytes)
        .await
        .inspect_err(|e| {
            log::warn!("rejected multipart form: {e}");
        })?;

    let mut uploaded = Vec::with_capacity(parts.len());
    for part in parts {
        match store_part(part, upload_dir, config) {
            Ok(file) => uploaded.push(file),
            Err(source) => return Err(UploadFailure { uploaded, source }),
        }
    }

    Ok(uploaded)
}

/// Like [`upload_files`] but returns only the first stored file.
pub async fn upload_one_file(
    multipart: Multipart,
    upload_dir: impl AsRef<Path>,
    config: &UploadConfig,
) -> Result<UploadedFile, UploadFailure> {
    upload_files(multipart, upload_dir, config)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| UploadError::NoFile.into())
}

/// Counts `len` more bytes against the form ceiling
fn charge(total: &mut usize, len: usize, limit: usize) -> Result<(), UploadError> {
    *total += len;
    if *total > limit {
        return Err(UploadError::TooBig);
    }
    Ok(())
}

async fn read_form(multipart: &mut Multipart, upload_dir: &Path, limit: usize) -> Result<Vec<FilePart>, UploadError> {
    let mut parts = Vec::new();
    let mut total = 0usize;

    while let Some(field) = multipart.next().await {
        let mut field = field.map_err(|e| UploadError::Multipart(e.to_string()))?;
        // an empty file input is sent with an empty name and no content
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        match filename {
            Some(filename) => parts.push(spool_part(&mut field, filename, upload_dir, &mut total, limit).await?),
            None => {
                // plain form values only count towards the limit
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|e| UploadError::Multipart(e.to_string()))?;
                    charge(&mut total, chunk.len(), limit)?;
                }
            }
        }
    }

    Ok(parts)
}

async fn spool_part(
    field: &mut Field,
    filename: String,
    upload_dir: &Path,
    total: &mut usize,
    limit: usize,
) -> Result<FilePart, UploadError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".upload-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(FILE_MODE));
    }
    let temp = builder.tempfile_in(upload_dir)?;
    let mut file = fs::File::from_std(temp.as_file().try_clone()?);

    let mut head = Vec::with_capacity(SNIFF_LEN);
    let mut size = 0u64;
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| UploadError::Multipart(e.to_string()))?;
        charge(total, chunk.len(), limit)?;

        let wanted = SNIFF_LEN.saturating_sub(head.len()).min(chunk.len());
        head.extend_from_slice(&chunk[..wanted]);

        file.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }
    file.flush().await?;

    Ok(FilePart {
        filename,
        head,
        size,
        file: temp,
    })
}

fn store_part(part: FilePart, upload_dir: &Path, config: &UploadConfig) -> Result<UploadedFile, UploadError> {
    let original_name = base_name(&part.filename)
        .ok_or_else(|| UploadError::InvalidName(part.filename.clone()))?
        .to_string();

    let content_type = detect_content_type(&part.head);
    if !config.allows(content_type) {
        log::warn!("rejected upload {original_name}: content type {content_type} not allowed");
        return Err(UploadError::TypeNotAllowed {
            content_type: content_type.to_string(),
        });
    }

    let new_name = if config.rename_files {
        format!("{}{}", random_string(RENAMED_STEM_LEN)?, extension(&original_name))
    } else {
        original_name.clone()
    };

    part.file.persist(upload_dir.join(&new_name)).map_err(io::Error::from)?;

    log::debug!(
        "stored upload {original_name} as {new_name} ({} bytes, {content_type})",
        part.size
    );

    Ok(UploadedFile {
        new_name,
        original_name,
        size: part.size,
    })
}

/// Final path component of a client supplied file name
fn base_name(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next()?;
    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// Extension including the dot, or an empty string
fn extension(name: &str) -> &str {
    name.rfind('.').map_or("", |i| &name[i..])
}
