//! Error types for multipart uploads

use std::io;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::json::JsonResponse;
use crate::random::RandomError;
use crate::upload::UploadedFile;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("uploaded file is too big")]
    TooBig,

    #[error("uploaded file type not allowed")]
    TypeNotAllowed { content_type: String },

    #[error("uploaded file has an invalid name")]
    InvalidName(String),

    #[error("no file was uploaded")]
    NoFile,

    #[error("error parsing multipart form: {0}")]
    Multipart(String),

    #[error("error saving uploaded file: {0}")]
    Io(#[from] io::Error),

    #[error("error naming uploaded file: {0}")]
    Random(#[from] RandomError),
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::TooBig => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::TypeNotAllowed { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadError::Io(_) | UploadError::Random(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let payload: JsonResponse = JsonResponse::error(self.to_string());
        HttpResponse::build(self.status_code()).json(payload)
    }
}

/// An aborted upload. Files written before the failing part stay on disk and
/// are listed in `uploaded`.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct UploadFailure {
    pub uploaded: Vec<UploadedFile>,
    #[source]
    pub source: UploadError,
}

impl From<UploadError> for UploadFailure {
    fn from(source: UploadError) -> Self {
        Self {
            uploaded: Vec::new(),
            source,
        }
    }
}

impl ResponseError for UploadFailure {
    fn status_code(&self) -> StatusCode {
        self.source.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        self.source.error_response()
    }
}
