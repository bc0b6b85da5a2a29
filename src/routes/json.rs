use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::json::{JsonError, JsonTransport, StrictJson, error_json, push_json_to_remote, write_json};
use crate::routes::ServiceSettings;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestPayload {
    pub action: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ResponsePayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub status_code: u16,
}

fn is_zero(code: &u16) -> bool {
    *code == 0
}

#[post("/receive-post")]
pub async fn receive_post(body: StrictJson<RequestPayload>) -> Result<HttpResponse, JsonError> {
    log::debug!("received action {:?}", body.action);

    let response = ResponsePayload {
        message: "hallo!".to_string(),
        status_code: 200,
    };
    write_json(StatusCode::OK, &response, None)
}

/// Relays the request to the simulated service and reports its status code
#[post("/remote-service")]
pub async fn remote_service(
    body: StrictJson<RequestPayload>,
    settings: web::Data<ServiceSettings>,
    transport: web::Data<dyn JsonTransport>,
) -> Result<HttpResponse, JsonError> {
    let remote = match push_json_to_remote(&settings.remote_uri, &*body, Some(transport.get_ref())).await {
        Ok(remote) => remote,
        Err(e) => {
            log::warn!("relay to {} failed: {e}", settings.remote_uri);
            return error_json(e, Some(StatusCode::BAD_GATEWAY));
        }
    };

    let response = ResponsePayload {
        message: "hallo!".to_string(),
        status_code: remote.status,
    };
    write_json(StatusCode::OK, &response, None)
}

#[post("/simulated-service")]
pub async fn simulated_service() -> Result<HttpResponse, JsonError> {
    let response = ResponsePayload {
        message: "okay".to_string(),
        status_code: 200,
    };
    write_json(StatusCode::OK, &response, None)
}
