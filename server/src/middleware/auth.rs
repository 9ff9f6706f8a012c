use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    middleware::Next,
    web, HttpMessage, ResponseError,
};

use crate::{auth_token::AuthTokenService, error::ApiError};

const MISSING_CREDENTIALS: &str = "Invalid authorization code.";
const INVALID_SCHEME: &str = "Invalid authentication scheme.";
const INVALID_TOKEN: &str = "Invalid token or expired token.";

/// Identity verified by [`access_guard`], available to handlers as
/// `web::ReqData<AuthenticatedUser>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: String,
}

/// Rejects the request with 403 unless it carries `Authorization: Bearer <token>`
/// with a token the [`AuthTokenService`] accepts.
pub async fn access_guard(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, actix_web::Error> {
    match authenticate(&req) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(err @ ApiError::AccessDenied(_)) => {
            log::warn!(
                "Access denied for {} {}: {}",
                req.method(),
                req.path(),
                err
            );
            let response = err.error_response();
            Ok(req.into_response(response).map_into_right_body())
        }
        Err(err) => {
            log::error!(
                "Unable to authenticate {} {}: {}",
                req.method(),
                req.path(),
                err
            );
            let response = err.error_response();
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}

fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::AccessDenied(MISSING_CREDENTIALS))?;

    let token = bearer_token(header)?;

    let tokens = req
        .app_data::<web::Data<AuthTokenService>>()
        .ok_or_else(|| ApiError::Internal("Token service not available".to_string()))?;

    let claims = tokens
        .decode(token)
        .ok_or(ApiError::AccessDenied(INVALID_TOKEN))?;

    Ok(AuthenticatedUser {
        email: claims.user_id,
    })
}

fn bearer_token(header: &str) -> Result<&str, ApiError> {
    match header.split_once(' ') {
        Some(("Bearer", token)) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err(ApiError::AccessDenied(INVALID_SCHEME)),
        None => Err(ApiError::AccessDenied(MISSING_CREDENTIALS)),
    }
}
