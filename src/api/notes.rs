use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::{ApiError, AppState, MessageResponse, ValidJson};
use crate::services::note_service::{
    CreateNoteInput, DeleteNoteInput, NoteError, NoteWithOwnerDto, UpdateNoteInput,
};

impl From<NoteError> for ApiError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::Validation(msg) => Self::validation(msg),
            NoteError::NoneFound | NoteError::NotFound => Self::not_found(err.to_string()),
            NoteError::InvalidData => Self::validation(err.to_string()),
            NoteError::DuplicateTitle => Self::conflict(err.to_string()),
            NoteError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /notes
///
/// Each note carries its owner's `username`.
pub async fn list_notes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NoteWithOwnerDto>>, ApiError> {
    let notes = state.note_service().list_notes().await?;
    Ok(Json(notes))
}

/// POST /notes
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CreateNoteInput>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let note = state.note_service().create_note(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("New note {} created", note.title))),
    ))
}

/// PATCH /notes
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<UpdateNoteInput>,
) -> Result<Json<String>, ApiError> {
    let note = state.note_service().update_note(payload).await?;
    Ok(Json(format!("'{}' updated", note.title)))
}

/// DELETE /notes
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<DeleteNoteInput>,
) -> Result<Json<String>, ApiError> {
    let note = state.note_service().delete_note(payload).await?;
    Ok(Json(format!(
        "Note '{}' with ID {} deleted",
        note.title, note.id
    )))
}
