use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState, ValidJson};
use crate::services::auth_service::{AuthError, LoginInput, LoginResult};

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingFields => Self::validation(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// POST /auth
/// Check a username/password pair. Guarded by the login rate limiter.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<LoginInput>,
) -> Result<Json<LoginResult>, ApiError> {
    let result = state.auth_service().login(payload).await?;
    Ok(Json(result))
}
