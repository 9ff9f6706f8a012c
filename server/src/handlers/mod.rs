use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest,
};

use crate::error::ApiError;

pub mod health;
pub mod posts;
pub mod response;
pub mod root;
pub mod users;

pub use health::health_check;
pub use posts::{add_post, delete_post, get_post, list_posts, update_post};
pub use root::read_root;
pub use users::{create_user, user_login};

/// Registers every route plus the extractor configs that turn malformed
/// bodies and path ids into 422 responses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(read_root)
        .service(health_check)
        .service(list_posts)
        .service(get_post)
        .service(add_post)
        .service(update_post)
        .service(delete_post)
        .service(create_user)
        .service(user_login);
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::InvalidRequest(err.to_string()).into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::InvalidRequest(err.to_string()).into()
}
