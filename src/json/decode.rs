//! Strict, size-bounded JSON request decoding

use actix_web::error::PayloadError;
use actix_web::web::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::error::Category;

use crate::config::JsonConfig;
use crate::json::JsonError;

/// Collects a request body, failing as soon as it grows past `limit` bytes.
pub async fn read_body<S>(mut payload: S, limit: usize) -> Result<Bytes, JsonError>
where
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
{
    let mut body = BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| JsonError::Payload(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(JsonError::TooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}

/// Reads at most `config.max_body_bytes` from `payload` and decodes a single
/// JSON value from it. See [`decode_json`] for the decoding rules.
pub async fn read_json<T, S>(payload: S, config: &JsonConfig) -> Result<T, JsonError>
where
    T: DeserializeOwned,
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
{
    let body = read_body(payload, config.max_body_bytes).await?;
    decode_json(&body, config)
}

/// Decodes exactly one JSON value from `body`.
///
/// Syntax errors anywhere in the value are reported before anything else.
/// Keys that `T` does not consume are rejected unless
/// `config.allow_unknown_fields` is set; an unknown key that precedes a data
/// error is reported instead of that error. Only whitespace may follow the
/// value. Every failure is mapped onto one [`JsonError`] variant.
pub fn decode_json<T: DeserializeOwned>(body: &[u8], config: &JsonConfig) -> Result<T, JsonError> {
    if body.len() > config.max_body_bytes {
        return Err(JsonError::TooLarge(config.max_body_bytes));
    }

    if body.iter().all(|b| is_json_ws(*b)) {
        return Err(JsonError::Empty);
    }

    check_syntax(body)?;

    let mut de = serde_json::Deserializer::from_slice(body);
    let mut unknown: Option<String> = None;
    let mut on_ignored = |path: serde_ignored::Path<'_>| {
        if unknown.is_none() {
            unknown = Some(path.to_string());
        }
    };

    let tracked = serde_ignored::Deserializer::new(&mut de, &mut on_ignored);
    let result: Result<T, _> = serde_path_to_error::deserialize(tracked);
    let unknown = unknown.filter(|_| !config.allow_unknown_fields);

    let value = match (result, unknown) {
        (Ok(_), Some(key)) => return Err(JsonError::UnknownField(key)),
        (Ok(value), None) => value,
        (Err(err), unknown) => {
            return Err(match (classify(err, body), unknown) {
                (JsonError::FieldType(_) | JsonError::Type(_) | JsonError::Unmarshal(_), Some(key)) => {
                    JsonError::UnknownField(key)
                }
                (err, _) => err,
            });
        }
    };

    de.end().map_err(|_| JsonError::TrailingData)?;

    Ok(value)
}

/// Walks the first value without a target type so malformed input is
/// reported ahead of data errors.
fn check_syntax(body: &[u8]) -> Result<(), JsonError> {
    let mut de = serde_json::Deserializer::from_slice(body);
    IgnoredAny::deserialize(&mut de).map_err(|e| match e.classify() {
        Category::Eof => JsonError::Truncated,
        Category::Io => JsonError::Payload(e.to_string()),
        Category::Syntax | Category::Data => JsonError::Syntax(byte_offset(body, e.line(), e.column())),
    })?;
    Ok(())
}

fn classify(err: serde_path_to_error::Error<serde_json::Error>, body: &[u8]) -> JsonError {
    let has_field = err.path().iter().next().is_some();
    let field = err.path().to_string();
    let inner = err.into_inner();

    match inner.classify() {
        Category::Syntax => JsonError::Syntax(byte_offset(body, inner.line(), inner.column())),
        Category::Eof => JsonError::Truncated,
        Category::Io => JsonError::Payload(inner.to_string()),
        Category::Data => {
            let message = inner.to_string();
            if let Some(key) = unknown_field_name(&message) {
                JsonError::UnknownField(key)
            } else if is_type_mismatch(&message) {
                if has_field {
                    JsonError::FieldType(field)
                } else {
                    JsonError::Type(byte_offset(body, inner.line(), inner.column()))
                }
            } else {
                JsonError::Unmarshal(message)
            }
        }
    }
}

/// Converts serde_json's 1-based line and byte column into an offset from
/// the start of the body.
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let preceding: usize = body
        .split(|b| *b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();

    preceding + column
}

/// Picks the key out of serde's "unknown field `key`, expected ..." message,
/// which targets with `deny_unknown_fields` produce.
fn unknown_field_name(message: &str) -> Option<String> {
    let rest = message.strip_prefix("unknown field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

fn is_type_mismatch(message: &str) -> bool {
    message.starts_with("invalid type") || message.starts_with("invalid value") || message.starts_with("invalid length")
}

fn is_json_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}
