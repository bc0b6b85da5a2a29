//! JSON response encoding and the error envelope

use std::fmt::Display;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderMap};
use serde::{Deserialize, Serialize};

use crate::json::JsonError;

/// Envelope wrapped around error responses and, optionally, payloads
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonResponse<T = serde_json::Value> {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> JsonResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Serializes `data` into a JSON response with the given status.
///
/// `headers` are copied onto the response first; `Content-Type` is set to
/// `application/json` afterwards, so it always wins. Serialization failures
/// are returned instead of producing a partial response.
pub fn write_json<T: Serialize + ?Sized>(
    status: StatusCode,
    data: &T,
    headers: Option<&HeaderMap>,
) -> Result<HttpResponse, JsonError> {
    let out = serde_json::to_vec(data).map_err(JsonError::Encode)?;

    let mut builder = HttpResponse::build(status);
    if let Some(headers) = headers {
        for (name, value) in headers.iter() {
            builder.append_header((name.clone(), value.clone()));
        }
    }
    builder.insert_header((header::CONTENT_TYPE, "application/json"));

    Ok(builder.body(out))
}

/// Wraps `err` in the error envelope, answering with `status` or 400.
pub fn error_json(err: impl Display, status: Option<StatusCode>) -> Result<HttpResponse, JsonError> {
    let payload: JsonResponse = JsonResponse::error(err.to_string());
    write_json(status.unwrap_or(StatusCode::BAD_REQUEST), &payload, None)
}
