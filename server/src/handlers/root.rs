use actix_web::{get, HttpResponse};

use super::response::MessageResponse;
use crate::error::Result;

#[get("/")]
pub async fn read_root() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Welcome to your blog!.".to_string(),
    }))
}
