//! Domain service for notes (repair tickets).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::messages;
use crate::db::Note;
use crate::services::validation::lenient;

/// Errors specific to note operations.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", messages::NO_NOTES_FOUND)]
    NoneFound,

    #[error("{}", messages::NOTE_NOT_FOUND)]
    NotFound,

    #[error("{}", messages::DUPLICATE_NOTE_TITLE)]
    DuplicateTitle,

    #[error("{}", messages::INVALID_NOTE_DATA)]
    InvalidData,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for NoteError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    pub id: i32,
    /// Owning user id.
    pub user: i32,
    pub title: String,
    pub text: String,
    pub client: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Note> for NoteDto {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            user: note.user_id,
            title: note.title,
            text: note.text,
            client: note.client,
            completed: note.completed,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Listing entry: the note plus its owner's username (`null` if the owner
/// record no longer exists).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NoteWithOwnerDto {
    #[serde(flatten)]
    pub note: NoteDto,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNoteInput {
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub client: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteInput {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub client: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteNoteInput {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i32>,
}

/// Domain service trait for notes.
#[async_trait::async_trait]
pub trait NoteService: Send + Sync {
    /// Lists every note with its owner's username.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::NoneFound`] when there are no notes; an empty list
    /// is never returned.
    async fn list_notes(&self) -> Result<Vec<NoteWithOwnerDto>, NoteError>;

    async fn create_note(&self, input: CreateNoteInput) -> Result<NoteDto, NoteError>;

    /// Overwrites owner, title, text, client and completion state.
    async fn update_note(&self, input: UpdateNoteInput) -> Result<NoteDto, NoteError>;

    /// Deletes a note and returns the removed record.
    async fn delete_note(&self, input: DeleteNoteInput) -> Result<NoteDto, NoteError>;
}
