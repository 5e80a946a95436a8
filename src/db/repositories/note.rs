use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::notes;
use crate::services::validation::fold_case;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub text: String,
    pub client: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<notes::Model> for Note {
    fn from(model: notes::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            text: model.text,
            client: model.client,
            completed: model.completed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewNoteRecord {
    pub user_id: i32,
    pub title: String,
    pub text: String,
    pub client: String,
}

#[derive(Debug, Clone)]
pub struct NoteRecordUpdate {
    pub user_id: i32,
    pub title: String,
    pub text: String,
    pub client: String,
    pub completed: bool,
}

pub struct NoteRepository {
    conn: DatabaseConnection,
}

impl NoteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Note>> {
        let notes = notes::Entity::find()
            .order_by_asc(notes::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list notes")?;

        Ok(notes.into_iter().map(Note::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Note>> {
        let note = notes::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query note by ID")?;

        Ok(note.map(Note::from))
    }

    /// Case-insensitive lookup by title.
    pub async fn find_by_title(&self, title: &str) -> Result<Option<Note>> {
        let note = notes::Entity::find()
            .filter(notes::Column::TitleKey.eq(fold_case(title)))
            .order_by_asc(notes::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query note by title")?;

        Ok(note.map(Note::from))
    }

    /// Any one note owned by `user_id`, if there is one.
    pub async fn find_any_for_user(&self, user_id: i32) -> Result<Option<Note>> {
        let note = notes::Entity::find()
            .filter(notes::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query notes for user")?;

        Ok(note.map(Note::from))
    }

    pub async fn create(&self, record: NewNoteRecord) -> Result<Note> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = notes::ActiveModel {
            user_id: Set(record.user_id),
            title_key: Set(fold_case(&record.title)),
            title: Set(record.title),
            text: Set(record.text),
            client: Set(record.client),
            completed: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert note")?;

        Ok(Note::from(model))
    }

    /// Overwrites every mutable field. Returns `None` if the note is gone.
    pub async fn update(&self, id: i32, update: NoteRecordUpdate) -> Result<Option<Note>> {
        let Some(note) = notes::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query note for update")?
        else {
            return Ok(None);
        };

        let mut active: notes::ActiveModel = note.into();
        active.user_id = Set(update.user_id);
        active.title_key = Set(fold_case(&update.title));
        active.title = Set(update.title);
        active.text = Set(update.text);
        active.client = Set(update.client);
        active.completed = Set(update.completed);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update note")?;

        Ok(Some(Note::from(model)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = notes::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete note")?;

        Ok(result.rows_affected > 0)
    }
}
