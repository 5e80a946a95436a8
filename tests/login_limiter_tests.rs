mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{read_json, spawn_app, spawn_app_with, test_config};
use serde_json::json;

fn login_request(origin: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/auth")
        .header("Content-Type", "application/json");
    if let Some(origin) = origin {
        builder = builder.header("Origin", origin);
    }
    builder
        .body(Body::from(
            json!({ "username": "nobody", "password": "wrong" }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_sixth_login_attempt_is_limited() {
    let app = spawn_app().await;

    for _ in 0..5 {
        let response = app.send(login_request(None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app
        .send(login_request(Some("http://localhost:3000")))
        .await;
    assert!(response.headers().contains_key("retry-after"));

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["message"],
        "Too many login attempts from this IP, please try again after 60 second pause"
    );

    let log = app.read_log("errLog.log").await;
    let line = log
        .lines()
        .find(|l| l.contains("Too many requests"))
        .expect("limiter rejection should be logged");
    assert!(line.ends_with("\tPOST\t/auth\thttp://localhost:3000"));
    assert_eq!(line.split('\t').count(), 7);
}

#[tokio::test]
async fn test_limiter_only_guards_login() {
    let app = spawn_app().await;

    for _ in 0..6 {
        app.send(login_request(None)).await;
    }

    let (status, _) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_configured_status_and_budget() {
    let mut config = test_config();
    config.security.login_limiter.max_requests = 1;
    config.security.login_limiter.status_code = 503;
    let app = spawn_app_with(config).await;

    let response = app.send(login_request(None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(login_request(None)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
