use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;

use crate::auth_token::AuthTokenError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    AccessDenied(&'static str),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Too many requests")]
    RateLimitExceeded,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token error: {0}")]
    Token(#[from] AuthTokenError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Body shared by every error path, including business failures that the
/// handlers answer with HTTP 200.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AccessDenied(_) => StatusCode::FORBIDDEN,
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
