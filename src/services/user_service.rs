//! Domain service for user records.
//!
//! Validates request fields, enforces case-insensitive username uniqueness and
//! the "no assigned notes" precondition on delete.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::messages;
use crate::db::User;
use crate::services::validation::lenient;

/// Errors specific to user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", messages::NO_USERS_FOUND)]
    NoneFound,

    #[error("{}", messages::USER_NOT_FOUND)]
    NotFound,

    #[error("{}", messages::DUPLICATE_USERNAME)]
    DuplicateUsername,

    #[error("{}", messages::USER_HAS_NOTES)]
    HasAssignedNotes,

    #[error("{}", messages::INVALID_USER_DATA)]
    InvalidData,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// User as exposed by the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            roles: user.roles,
            active: user.active,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub roles: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
}

/// Full replacement of a user's fields.
///
/// `password` is the only optional change: present and non-empty means
/// "re-hash and replace", absent means "keep the current one".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub roles: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteUserInput {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i32>,
}

/// Domain service trait for users.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Lists every user.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NoneFound`] when there are no users at all.
    async fn list_users(&self) -> Result<Vec<UserDto>, UserError>;

    /// Registers a new user with a hashed password.
    async fn create_user(&self, input: CreateUserInput) -> Result<UserDto, UserError>;

    /// Overwrites an existing user's fields.
    async fn update_user(&self, input: UpdateUserInput) -> Result<UserDto, UserError>;

    /// Deletes a user that owns no notes and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::HasAssignedNotes`] while any note references the user.
    async fn delete_user(&self, input: DeleteUserInput) -> Result<UserDto, UserError>;
}
