use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::{ApiError, AppState, MessageResponse, ValidJson};
use crate::services::user_service::{
    CreateUserInput, DeleteUserInput, UpdateUserInput, UserDto, UserError,
};

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(msg) => Self::validation(msg),
            UserError::NoneFound | UserError::NotFound => Self::not_found(err.to_string()),
            UserError::HasAssignedNotes | UserError::InvalidData => {
                Self::validation(err.to_string())
            }
            UserError::DuplicateUsername => Self::conflict(err.to_string()),
            UserError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = state.user_service().list_users().await?;
    Ok(Json(users))
}

/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CreateUserInput>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let user = state.user_service().create_user(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!(
            "New user {} created",
            user.username
        ))),
    ))
}

/// PATCH /users
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<UpdateUserInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = state.user_service().update_user(payload).await?;
    Ok(Json(MessageResponse::new(format!("{} updated", user.username))))
}

/// DELETE /users
///
/// Replies with a bare JSON string rather than a message object.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<DeleteUserInput>,
) -> Result<Json<String>, ApiError> {
    let user = state.user_service().delete_user(payload).await?;
    Ok(Json(format!(
        "Username : {} with ID {} deleted",
        user.username, user.id
    )))
}
