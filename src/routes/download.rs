use actix_web::{HttpRequest, HttpResponse, get, web};

use crate::download::download_static_file;
use crate::routes::ServiceSettings;

#[get("/download")]
pub async fn download_file(req: HttpRequest, settings: web::Data<ServiceSettings>) -> actix_web::Result<HttpResponse> {
    Ok(download_static_file(&req, &settings.download_path, &settings.download_name).await?)
}
