//! Domain service for credential checks on the login endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::messages;
use crate::services::validation::lenient;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", messages::ALL_FIELDS_REQUIRED)]
    MissingFields,

    /// Unknown user, inactive user or wrong password. Deliberately not
    /// distinguished in the response.
    #[error("{}", messages::UNAUTHORIZED)]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub password: Option<String>,
}

/// Login result containing the authenticated user's identity.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub username: String,
    pub roles: Vec<String>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials of an active user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, input: LoginInput) -> Result<LoginResult, AuthError>;
}
