use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::note::{NewNoteRecord, Note, NoteRecordUpdate};
pub use repositories::user::{NewUserRecord, User, UserRecordUpdate};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url
            .trim_start_matches("sqlite:")
            .trim_start_matches("//")
            .split('?')
            .next()
            .unwrap_or_default();

        if !path_str.is_empty() && !path_str.starts_with(":memory:") {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn note_repo(&self) -> repositories::note::NoteRepository {
        repositories::note::NoteRepository::new(self.conn.clone())
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_users_by_ids(&self, ids: &[i32]) -> Result<Vec<User>> {
        self.user_repo().get_by_ids(ids).await
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().find_by_username(username).await
    }

    pub async fn find_user_credentials(&self, username: &str) -> Result<Option<(User, String)>> {
        self.user_repo().find_credentials(username).await
    }

    pub async fn create_user(&self, record: NewUserRecord) -> Result<User> {
        self.user_repo().create(record).await
    }

    pub async fn update_user(&self, id: i32, update: UserRecordUpdate) -> Result<Option<User>> {
        self.user_repo().update(id, update).await
    }

    /// Deletes the user row only. Callers must check for assigned notes first;
    /// the check and the delete are not atomic.
    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        self.note_repo().list_all().await
    }

    pub async fn get_note(&self, id: i32) -> Result<Option<Note>> {
        self.note_repo().get_by_id(id).await
    }

    pub async fn find_note_by_title(&self, title: &str) -> Result<Option<Note>> {
        self.note_repo().find_by_title(title).await
    }

    pub async fn find_note_for_user(&self, user_id: i32) -> Result<Option<Note>> {
        self.note_repo().find_any_for_user(user_id).await
    }

    pub async fn create_note(&self, record: NewNoteRecord) -> Result<Note> {
        self.note_repo().create(record).await
    }

    pub async fn update_note(&self, id: i32, update: NoteRecordUpdate) -> Result<Option<Note>> {
        self.note_repo().update(id, update).await
    }

    pub async fn delete_note(&self, id: i32) -> Result<bool> {
        self.note_repo().delete(id).await
    }
}
