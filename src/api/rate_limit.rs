use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::warn;

use super::{AppState, MessageResponse};
use crate::services::LoginLimiter;
use crate::services::login_limiter::Decision;

/// Key used to bucket login attempts: the socket peer, or the first
/// `X-Forwarded-For` hop when the peer is a trusted proxy.
#[must_use]
pub fn client_key(limiter: &LoginLimiter, peer: Option<SocketAddr>, headers: &HeaderMap) -> String {
    let Some(peer) = peer else {
        return "unknown".to_string();
    };
    let peer_ip = peer.ip().to_string();

    if limiter.trusts_proxy(&peer_ip)
        && let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }

    peer_ip
}

pub async fn login_rate_limit(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let limiter = state.login_limiter();
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(limiter, peer, req.headers());

    let retry_after = match limiter.check(&key).await {
        Decision::Allowed { .. } => return next.run(req).await,
        Decision::Limited { retry_after } => retry_after,
    };

    warn!(client = %key, "Login rate limit exceeded");
    metrics::counter!("login_rate_limited_total").increment(1);

    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let line = format!(
        "Too many requests: {}\t{}\t{}\t{}",
        limiter.message(),
        req.method(),
        req.uri(),
        origin
    );
    state.event_log().record(limiter.log_file(), &line).await;

    let status =
        StatusCode::from_u16(limiter.status_code()).unwrap_or(StatusCode::TOO_MANY_REQUESTS);
    let mut response = (status, Json(MessageResponse::new(limiter.message()))).into_response();

    let secs = retry_after.as_secs().max(1);
    if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }

    response
}
