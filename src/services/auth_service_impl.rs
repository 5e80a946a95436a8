//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::db::repositories::user::verify_password;
use crate::services::auth_service::{AuthError, AuthService, LoginInput, LoginResult};
use crate::services::validation::present;

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, input: LoginInput) -> Result<LoginResult, AuthError> {
        let (Some(username), Some(password)) = (present(input.username), present(input.password))
        else {
            return Err(AuthError::MissingFields);
        };

        let Some((user, password_hash)) = self.store.find_user_credentials(&username).await?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        if !user.active {
            return Err(AuthError::InvalidCredentials);
        }

        if !verify_password(password, password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = user.id, username = %user.username, "User logged in");

        Ok(LoginResult {
            username: user.username,
            roles: user.roles,
        })
    }
}
