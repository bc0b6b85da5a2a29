use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

use crate::config::JsonConfig;
use crate::json::{JsonError, read_json};

/// Extractor that decodes the request body with [`read_json`].
///
/// The [`JsonConfig`] is looked up in app data, either wrapped in `web::Data`
/// or registered directly, and falls back to the defaults. Rejections are
/// [`JsonError`]s and render as the error envelope.
#[derive(Debug)]
pub struct StrictJson<T>(pub T);

impl<T> StrictJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for StrictJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for StrictJson<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

fn request_config(req: &HttpRequest) -> JsonConfig {
    req.app_data::<web::Data<JsonConfig>>()
        .map(|config| config.get_ref().clone())
        .or_else(|| req.app_data::<JsonConfig>().cloned())
        .unwrap_or_default()
}

impl<T: DeserializeOwned + 'static> FromRequest for StrictJson<T> {
    type Error = JsonError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let config = request_config(req);
        let path = req.path().to_string();
        let payload = payload.take();

        Box::pin(async move {
            read_json(payload, &config).await.map(StrictJson).map_err(|e| {
                log::warn!("rejected JSON body for {path}: {e}");
                e
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, post, test};
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Greeting {
        name: String,
    }

    #[post("/greet")]
    async fn greet(body: StrictJson<Greeting>) -> HttpResponse {
        HttpResponse::Ok().body(format!("hello {}", body.name))
    }

    #[actix_web::test]
    async fn test_extracts_valid_body() {
        let app = test::init_service(App::new().service(greet)).await;

        let req = test::TestRequest::post()
            .uri("/greet")
            .set_payload(r#"{"name": "ferris"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await.as_ref(), b"hello ferris");
    }

    #[actix_web::test]
    async fn test_rejects_unknown_key_with_envelope() {
        let app = test::init_service(App::new().service(greet)).await;

        let req = test::TestRequest::post()
            .uri("/greet")
            .set_payload(r#"{"name": "ferris", "age": 8}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "body contains unknown key \"age\"");
    }

    #[actix_web::test]
    async fn test_uses_configured_limits() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(JsonConfig {
                    max_body_bytes: 8,
                    allow_unknown_fields: true,
                }))
                .service(greet),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/greet")
            .set_payload(r#"{"name": "ferris"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "body must not be larger than 8 bytes");
    }

    #[actix_web::test]
    async fn test_plain_app_data_config() {
        let app = test::init_service(
            App::new()
                .app_data(JsonConfig {
                    allow_unknown_fields: true,
                    ..Default::default()
                })
                .service(greet),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/greet")
            .set_payload(r#"{"name": "ferris", "age": 8}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }
}
