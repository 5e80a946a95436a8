#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use http_body_util::BodyExt;
use std::path::PathBuf;
use technotes::config::Config;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub log_dir: PathBuf,
}

/// Config backed by a fresh temp-file database and log directory, with
/// cheap password hashing.
pub fn test_config() -> Config {
    let id = uuid::Uuid::new_v4();
    let tmp = std::env::temp_dir();

    let mut config = Config::default();
    config.general.database_path = format!(
        "sqlite:{}",
        tmp.join(format!("technotes-test-{id}.db")).display()
    );
    config.logging.log_dir = tmp
        .join(format!("technotes-logs-{id}"))
        .display()
        .to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

pub async fn spawn_app_with(config: Config) -> TestApp {
    let log_dir = PathBuf::from(&config.logging.log_dir);
    let state = technotes::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    TestApp {
        router: technotes::api::router(state),
        log_dir,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let response = self
            .send(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await;
        read_json(response).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        read_json(response).await
    }

    /// Creates a user and returns its id.
    pub async fn create_user(&self, username: &str) -> i64 {
        let (status, _) = self
            .json(
                "POST",
                "/users",
                serde_json::json!({
                    "username": username,
                    "password": "hunter22",
                    "email": format!("{}@example.com", username.to_lowercase()),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, users) = self.get("/users").await;
        users
            .as_array()
            .unwrap()
            .iter()
            .find(|u| u["username"] == username)
            .and_then(|u| u["id"].as_i64())
            .unwrap()
    }

    pub async fn read_log(&self, file: &str) -> String {
        tokio::fs::read_to_string(self.log_dir.join(file))
            .await
            .unwrap_or_default()
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}
