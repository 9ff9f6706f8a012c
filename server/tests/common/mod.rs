use actix_web::{web, App};
use std::net::SocketAddr;
use std::time::Duration;

use blog_server::{
    auth_token::{now_secs, AuthTokenService},
    middleware::RateLimiter,
    store::{BlogStore, PostInput},
};

pub const TEST_SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

pub struct TestContext {
    pub store: BlogStore,
    pub auth_tokens: AuthTokenService,
    pub rate_limiter: RateLimiter,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_rate_limiter(RateLimiter::disabled())
    }

    pub fn with_rate_limiter(rate_limiter: RateLimiter) -> Self {
        TestContext {
            store: BlogStore::new(vec![PostInput::new("Pancake", "Lorem Ipsum ...")]),
            auth_tokens: AuthTokenService::new(TEST_SECRET.to_vec(), Duration::from_secs(600))
                .expect("valid token service"),
            rate_limiter,
        }
    }

    pub fn create_app(
        &self,
    ) -> actix_web::App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.store.clone()))
            .app_data(web::Data::new(self.auth_tokens.clone()))
            .app_data(web::Data::new(self.rate_limiter.clone()))
            .configure(blog_server::handlers::configure)
    }

    #[allow(dead_code)]
    pub fn token_for(&self, email: &str) -> String {
        self.auth_tokens
            .issue_access_token(email, now_secs())
            .expect("issue token")
    }

    #[allow(dead_code)]
    pub fn bearer(&self, email: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token_for(email)))
    }
}

#[allow(dead_code)]
pub fn client_addr(last_octet: u8) -> SocketAddr {
    SocketAddr::from(([10, 0, 0, last_octet], 40_000))
}
