pub mod duplicates;
pub mod event_log;
pub mod login_limiter;
pub mod validation;

pub mod auth_service;
pub use auth_service::{AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod note_service;
pub use note_service::{NoteError, NoteService};

pub mod note_service_impl;
pub use note_service_impl::SeaOrmNoteService;

pub mod user_service;
pub use user_service::{UserError, UserService};

pub mod user_service_impl;
pub use user_service_impl::SeaOrmUserService;

pub use event_log::EventLog;
pub use login_limiter::LoginLimiter;
