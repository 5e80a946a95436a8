use axum::{
    Router, middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::{AuthService, EventLog, LoginLimiter, NoteService, UserService};
use crate::state::SharedState;

pub mod auth;
pub mod cors;
mod error;
mod extract;
mod health;
pub mod notes;
mod observability;
pub mod rate_limit;
mod types;
pub mod users;

pub use cors::CorsPolicy;
pub use error::ApiError;
pub use extract::ValidJson;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub cors_policy: CorsPolicy,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<Config> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn user_service(&self) -> &Arc<dyn UserService> {
        &self.shared.user_service
    }

    #[must_use]
    pub fn note_service(&self) -> &Arc<dyn NoteService> {
        &self.shared.note_service
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn event_log(&self) -> &EventLog {
        &self.shared.event_log
    }

    #[must_use]
    pub fn login_limiter(&self) -> &Arc<LoginLimiter> {
        &self.shared.login_limiter
    }

    #[must_use]
    pub const fn cors_policy(&self) -> &CorsPolicy {
        &self.cors_policy
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let cors_policy = CorsPolicy::new(&shared.config.server.cors_allowed_origins);

    Arc::new(AppState {
        shared,
        cors_policy,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/auth", post(auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::login_rate_limit,
        ));

    let mut app = Router::new()
        .route(
            "/users",
            get(users::list_users)
                .post(users::create_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/notes",
            get(notes::list_notes)
                .post(notes::create_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        .merge(auth_routes)
        .route("/health", get(health::health));

    if state.prometheus_handle.is_some() {
        app = app.route("/metrics", get(observability::get_metrics));
    }

    let cors_layer = state.cors_policy().layer();

    app.layer(cors_layer)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            cors::enforce_origin,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            observability::logging_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
