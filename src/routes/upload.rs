use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, post, web};

use crate::routes::ServiceSettings;
use crate::upload::UploadedFile;

fn describe(file: &UploadedFile) -> String {
    format!(
        "uploaded {} to the uploads folder, renamed to {}\n",
        file.original_name, file.new_name
    )
}

fn rejected(err: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type(ContentType::plaintext())
        .body(err.to_string())
}

/// Stores every file in the form
#[post("/upload")]
pub async fn upload_files(multipart: Multipart, settings: web::Data<ServiceSettings>) -> HttpResponse {
    match crate::upload::upload_files(multipart, &settings.uploads_dir, &settings.upload).await {
        Ok(files) => HttpResponse::Ok()
            .content_type(ContentType::plaintext())
            .body(files.iter().map(describe).collect::<String>()),
        Err(failure) => rejected(failure),
    }
}

/// Stores the form's files and reports the first one
#[post("/upload-one")]
pub async fn upload_one_file(multipart: Multipart, settings: web::Data<ServiceSettings>) -> HttpResponse {
    match crate::upload::upload_one_file(multipart, &settings.uploads_dir, &settings.upload).await {
        Ok(file) => HttpResponse::Ok()
            .content_type(ContentType::plaintext())
            .body(describe(&file)),
        Err(failure) => rejected(failure),
    }
}
