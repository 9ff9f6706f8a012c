use actix_web::{middleware::from_fn, post, web, HttpResponse};

use crate::{
    auth_token::{now_secs, AuthTokenService, TokenResponse},
    error::{ErrorResponse, Result},
    middleware::rate_limit_middleware,
    store::{BlogStore, User},
};

#[post("/user/signup", wrap = "from_fn(rate_limit_middleware)")]
pub async fn create_user(
    body: web::Json<User>,
    store: web::Data<BlogStore>,
    auth_tokens: web::Data<AuthTokenService>,
) -> Result<HttpResponse> {
    let user = body.into_inner();
    let email = user.email.clone();

    store.users().append(user)?;
    let access_token = auth_tokens.issue_access_token(&email, now_secs())?;

    log::info!("Signed up user: {}", email);

    Ok(HttpResponse::Ok().json(TokenResponse { access_token }))
}

#[post("/user/login", wrap = "from_fn(rate_limit_middleware)")]
pub async fn user_login(
    body: web::Json<User>,
    store: web::Data<BlogStore>,
    auth_tokens: web::Data<AuthTokenService>,
) -> Result<HttpResponse> {
    if !store.users().find_match(&body.email, &body.password)? {
        log::warn!("Failed login attempt for user: {}", body.email);
        return Ok(HttpResponse::Ok().json(ErrorResponse::new("Wrong login details!")));
    }

    let access_token = auth_tokens.issue_access_token(&body.email, now_secs())?;

    log::info!("Successful login for user: {}", body.email);

    Ok(HttpResponse::Ok().json(TokenResponse { access_token }))
}
