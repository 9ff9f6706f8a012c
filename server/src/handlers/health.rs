use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::{error::Result, store::BlogStore};

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub posts: usize,
    pub users: usize,
}

#[get("/health")]
pub async fn health_check(store: web::Data<BlogStore>) -> Result<HttpResponse> {
    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        posts: store.posts().len()?,
        users: store.users().len()?,
    };

    Ok(HttpResponse::Ok().json(response))
}
