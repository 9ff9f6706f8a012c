mod common;

use actix_web::{http::StatusCode, test};
use blog_server::middleware::RateLimiter;
use common::{client_addr, TestContext};
use serde_json::json;
use std::time::Duration;

#[actix_web::test]
async fn test_login_route_is_rate_limited() {
    let ctx = TestContext::with_rate_limiter(RateLimiter::new(2, Duration::from_secs(60)));
    let app = test::init_service(ctx.create_app()).await;
    let credentials = json!({ "email": "a@x.com", "password": "p" });

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/user/login")
            .peer_addr(client_addr(1))
            .set_json(&credentials)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/user/login")
        .peer_addr(client_addr(1))
        .set_json(&credentials)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Too many requests");

    // Another client keeps its own quota.
    let req = test::TestRequest::post()
        .uri("/user/login")
        .peer_addr(client_addr(2))
        .set_json(&credentials)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_post_routes_are_not_rate_limited() {
    let ctx = TestContext::with_rate_limiter(RateLimiter::new(1, Duration::from_secs(60)));
    let app = test::init_service(ctx.create_app()).await;

    for _ in 0..3 {
        let req = test::TestRequest::get()
            .uri("/posts")
            .peer_addr(client_addr(1))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
