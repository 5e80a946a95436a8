//! Origin allow-list. Browsers get the usual CORS headers from
//! `tower-http`; requests from any other origin are refused outright.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use super::{ApiError, AppState};
use crate::constants::messages;

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed: Vec<String>,
}

impl CorsPolicy {
    #[must_use]
    pub fn new(allowed: &[String]) -> Self {
        Self {
            allowed: allowed
                .iter()
                .map(|o| o.trim().trim_end_matches('/').to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    /// A request without an `Origin` header (curl, server-to-server) is
    /// always allowed.
    #[must_use]
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        origin.is_none_or(|o| self.allowed.iter().any(|a| a == o))
    }

    #[must_use]
    pub fn layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .allowed
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    }
}

pub async fn enforce_origin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .map(|v| v.to_str().unwrap_or_default().to_string());

    if state.cors_policy().is_allowed(origin.as_deref()) {
        return next.run(req).await;
    }

    let origin = origin.unwrap_or_default();
    warn!(origin = %origin, path = %req.uri(), "Rejected request from disallowed origin");

    let line = format!(
        "Error: {}\t{}\t{}\t{}",
        messages::NOT_ALLOWED_BY_CORS,
        req.method(),
        req.uri(),
        origin
    );
    let config = state.config();
    state
        .event_log()
        .record(&config.logging.error_log_file, &line)
        .await;

    ApiError::Forbidden(messages::NOT_ALLOWED_BY_CORS.to_string()).into_response()
}
