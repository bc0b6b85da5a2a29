//! Error types for the JSON exchanger

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::json::JsonResponse;

/// Failures while reading, decoding or encoding JSON bodies. The display
/// strings are meant to be returned to API clients unchanged.
#[derive(Error, Debug)]
pub enum JsonError {
    #[error("body contains badly-formed JSON (at character {0})")]
    Syntax(usize),

    #[error("body contains badly-formed JSON")]
    Truncated,

    #[error("body contains incorrect JSON type for field \"{0}\"")]
    FieldType(String),

    #[error("body contains incorrect JSON type (at character {0})")]
    Type(usize),

    #[error("body must not be empty")]
    Empty,

    #[error("body contains unknown key \"{0}\"")]
    UnknownField(String),

    #[error("body must not be larger than {0} bytes")]
    TooLarge(usize),

    #[error("error unmarshalling JSON: {0}")]
    Unmarshal(String),

    #[error("body must contain only one json value")]
    TrailingData,

    #[error("error reading body: {0}")]
    Payload(String),

    #[error("error encoding JSON: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        match self {
            JsonError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            JsonError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let payload: JsonResponse = JsonResponse::error(self.to_string());
        HttpResponse::build(self.status_code()).json(payload)
    }
}
