//! `SeaORM` implementation of the `NoteService` trait.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tracing::{error, info, warn};

use crate::constants::messages;
use crate::db::{NewNoteRecord, NoteRecordUpdate, Store};
use crate::services::duplicates::is_duplicate;
use crate::services::note_service::{
    CreateNoteInput, DeleteNoteInput, NoteDto, NoteError, NoteService, NoteWithOwnerDto,
    UpdateNoteInput,
};
use crate::services::validation::present;

pub struct SeaOrmNoteService {
    store: Store,
}

impl SeaOrmNoteService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn ensure_unique_title(&self, title: &str, exclude: Option<i32>) -> Result<(), NoteError> {
        let existing = self.store.find_note_by_title(title).await?;
        if is_duplicate(existing.map(|n| n.id), exclude) {
            return Err(NoteError::DuplicateTitle);
        }
        Ok(())
    }
}

fn all_fields_required() -> NoteError {
    NoteError::Validation(messages::ALL_FIELDS_REQUIRED.to_string())
}

#[async_trait]
impl NoteService for SeaOrmNoteService {
    async fn list_notes(&self) -> Result<Vec<NoteWithOwnerDto>, NoteError> {
        let notes = self.store.list_notes().await?;
        if notes.is_empty() {
            return Err(NoteError::NoneFound);
        }

        // One query for all distinct owners instead of one per note.
        let owner_ids: Vec<i32> = notes
            .iter()
            .map(|n| n.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let usernames: HashMap<i32, String> = self
            .store
            .get_users_by_ids(&owner_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(notes
            .into_iter()
            .map(|note| {
                let username = usernames.get(&note.user_id).cloned();
                if username.is_none() {
                    warn!(note_id = note.id, user_id = note.user_id, "Note owner is missing");
                }
                NoteWithOwnerDto {
                    note: NoteDto::from(note),
                    username,
                }
            })
            .collect())
    }

    async fn create_note(&self, input: CreateNoteInput) -> Result<NoteDto, NoteError> {
        let (Some(user_id), Some(title), Some(text), Some(client)) = (
            input.user,
            present(input.title),
            present(input.text),
            present(input.client),
        ) else {
            return Err(all_fields_required());
        };

        self.ensure_unique_title(&title, None).await?;

        // Without a database-level foreign key the owner has to be checked here.
        if self.store.get_user(user_id).await?.is_none() {
            warn!(user_id, "Rejecting note for unknown owner");
            return Err(NoteError::InvalidData);
        }

        let record = NewNoteRecord {
            user_id,
            title,
            text,
            client,
        };

        match self.store.create_note(record).await {
            Ok(note) => {
                info!(note_id = note.id, title = %note.title, "Note created");
                Ok(NoteDto::from(note))
            }
            Err(e) => {
                error!(error = %e, "Store rejected new note");
                Err(NoteError::InvalidData)
            }
        }
    }

    async fn update_note(&self, input: UpdateNoteInput) -> Result<NoteDto, NoteError> {
        let (Some(id), Some(user_id), Some(title), Some(text), Some(client), Some(completed)) = (
            input.id,
            input.user,
            present(input.title),
            present(input.text),
            present(input.client),
            input.completed,
        ) else {
            return Err(all_fields_required());
        };

        if self.store.get_note(id).await?.is_none() {
            return Err(NoteError::NotFound);
        }

        self.ensure_unique_title(&title, Some(id)).await?;

        let update = NoteRecordUpdate {
            user_id,
            title,
            text,
            client,
            completed,
        };

        let note = self
            .store
            .update_note(id, update)
            .await?
            .ok_or(NoteError::NotFound)?;

        info!(note_id = id, title = %note.title, "Note updated");
        Ok(NoteDto::from(note))
    }

    async fn delete_note(&self, input: DeleteNoteInput) -> Result<NoteDto, NoteError> {
        let Some(id) = input.id else {
            return Err(NoteError::Validation(messages::NOTE_ID_REQUIRED.to_string()));
        };

        let note = self.store.get_note(id).await?.ok_or(NoteError::NotFound)?;

        if !self.store.delete_note(id).await? {
            return Err(NoteError::NotFound);
        }

        info!(note_id = id, title = %note.title, "Note deleted");
        Ok(NoteDto::from(note))
    }
}
