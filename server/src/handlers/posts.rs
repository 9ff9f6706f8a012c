use actix_web::{delete, get, middleware::from_fn, post, put, routes, web, HttpResponse};

use super::response::DataResponse;
use crate::{
    error::{ErrorResponse, Result},
    middleware::{access_guard, AuthenticatedUser},
    store::{BlogStore, PostInput},
};

const NO_SUCH_POST: &str = "No such post with the supplied ID.";

#[routes]
#[get("/posts")]
#[get("/post")]
pub async fn list_posts(store: web::Data<BlogStore>) -> Result<HttpResponse> {
    let posts = store.posts().list()?;
    Ok(HttpResponse::Ok().json(DataResponse::new(posts)))
}

#[get("/posts/{id}")]
pub async fn get_post(path: web::Path<u64>, store: web::Data<BlogStore>) -> Result<HttpResponse> {
    let id = path.into_inner();

    match store.posts().get(id)? {
        Some(post) => Ok(HttpResponse::Ok().json(DataResponse::new(post))),
        None => {
            log::debug!("Post {} not found", id);
            Ok(HttpResponse::Ok().json(ErrorResponse::new(NO_SUCH_POST)))
        }
    }
}

#[post("/posts", wrap = "from_fn(access_guard)")]
pub async fn add_post(
    user: web::ReqData<AuthenticatedUser>,
    body: web::Json<PostInput>,
    store: web::Data<BlogStore>,
) -> Result<HttpResponse> {
    let post = store.posts().create(body.into_inner())?;

    log::info!("Post {} added by {}", post.id, user.email);

    Ok(HttpResponse::Ok().json(DataResponse::new("post added.")))
}

#[put("/posts/{id}", wrap = "from_fn(access_guard)")]
pub async fn update_post(
    user: web::ReqData<AuthenticatedUser>,
    path: web::Path<u64>,
    body: web::Json<PostInput>,
    store: web::Data<BlogStore>,
) -> Result<HttpResponse> {
    let id = path.into_inner();

    if store.posts().update(id, body.into_inner())?.is_none() {
        return Ok(HttpResponse::Ok().json(not_found(id)));
    }

    log::info!("Post {} updated by {}", id, user.email);

    Ok(HttpResponse::Ok().json(DataResponse::new(format!(
        "post with id {} has been updated.",
        id
    ))))
}

#[delete("/posts/{id}", wrap = "from_fn(access_guard)")]
pub async fn delete_post(
    user: web::ReqData<AuthenticatedUser>,
    path: web::Path<u64>,
    store: web::Data<BlogStore>,
) -> Result<HttpResponse> {
    let id = path.into_inner();

    if store.posts().delete(id)?.is_none() {
        return Ok(HttpResponse::Ok().json(not_found(id)));
    }

    log::info!("Post {} removed by {}", id, user.email);

    Ok(HttpResponse::Ok().json(DataResponse::new(format!(
        "post with id {} has been removed.",
        id
    ))))
}

fn not_found(id: u64) -> ErrorResponse {
    ErrorResponse::new(format!("post with id {} not found.", id))
}
