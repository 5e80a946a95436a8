use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, EventLog, LoginLimiter, NoteService, SeaOrmAuthService, SeaOrmNoteService,
    SeaOrmUserService, UserService,
};

/// Process-wide components, constructed once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub user_service: Arc<dyn UserService>,

    pub note_service: Arc<dyn NoteService>,

    pub auth_service: Arc<dyn AuthService>,

    pub event_log: Arc<EventLog>,

    pub login_limiter: Arc<LoginLimiter>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn UserService>;

        let note_service = Arc::new(SeaOrmNoteService::new(store.clone()))
            as Arc<dyn NoteService>;

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone()))
            as Arc<dyn AuthService>;

        let event_log = Arc::new(EventLog::new(&config.logging.log_dir));
        let login_limiter = Arc::new(LoginLimiter::new(&config.security.login_limiter));

        Ok(Self {
            config: Arc::new(config),
            store,
            user_service,
            note_service,
            auth_service,
            event_log,
            login_limiter,
        })
    }
}
