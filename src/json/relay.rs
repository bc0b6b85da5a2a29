//! Relaying JSON payloads to a remote service

use std::error::Error as StdError;

use actix_web::web::Bytes;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("error encoding JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("request to {uri} failed: {source}")]
    Transport {
        uri: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl RelayError {
    pub fn transport(uri: &str, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        RelayError::Transport {
            uri: uri.to_string(),
            source: source.into(),
        }
    }
}

/// Remote answer with its body already read into memory
#[derive(Clone, Debug)]
pub struct RemoteResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl RemoteResponse {
    /// First header value with the given name, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Sends an encoded JSON body to a URI. Implemented over HTTP by
/// [`HttpTransport`]; tests and hosts can plug in their own.
#[async_trait]
pub trait JsonTransport: Send + Sync {
    async fn post_json(&self, uri: &str, body: Vec<u8>) -> Result<RemoteResponse, RelayError>;
}

#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JsonTransport for HttpTransport {
    async fn post_json(&self, uri: &str, body: Vec<u8>) -> Result<RemoteResponse, RelayError> {
        let response = self
            .client
            .post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| RelayError::transport(uri, e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await.map_err(|e| RelayError::transport(uri, e))?;

        Ok(RemoteResponse { status, headers, body })
    }
}

/// Serializes `data` and POSTs it to `uri` as `application/json`.
///
/// Uses `transport` when given, otherwise a fresh [`HttpTransport`].
pub async fn push_json_to_remote<T: Serialize + ?Sized>(
    uri: &str,
    data: &T,
    transport: Option<&dyn JsonTransport>,
) -> Result<RemoteResponse, RelayError> {
    let body = serde_json::to_vec(data)?;
    log::debug!("relaying {} bytes of JSON to {uri}", body.len());

    let response = match transport {
        Some(transport) => transport.post_json(uri, body).await?,
        None => HttpTransport::default().post_json(uri, body).await?,
    };

    log::debug!("{uri} answered {}", response.status);
    Ok(response)
}
