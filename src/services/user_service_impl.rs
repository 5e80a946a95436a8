//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::SecurityConfig;
use crate::constants::{DEFAULT_ROLE, messages};
use crate::db::repositories::user::hash_password_blocking;
use crate::db::{NewUserRecord, Store, UserRecordUpdate};
use crate::services::duplicates::is_duplicate;
use crate::services::user_service::{
    CreateUserInput, DeleteUserInput, UpdateUserInput, UserDto, UserError, UserService,
};
use crate::services::validation::{present, validate_email};

pub struct SeaOrmUserService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn ensure_unique_username(
        &self,
        username: &str,
        exclude: Option<i32>,
    ) -> Result<(), UserError> {
        let existing = self.store.find_user_by_username(username).await?;
        if is_duplicate(existing.map(|u| u.id), exclude) {
            return Err(UserError::DuplicateUsername);
        }
        Ok(())
    }
}

fn require_valid_email(email: Option<&str>) -> Result<(), UserError> {
    if validate_email(email.unwrap_or_default()) {
        Ok(())
    } else {
        Err(UserError::Validation(messages::VALID_EMAIL_REQUIRED.to_string()))
    }
}

fn all_fields_required() -> UserError {
    UserError::Validation(messages::ALL_FIELDS_REQUIRED.to_string())
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn list_users(&self) -> Result<Vec<UserDto>, UserError> {
        let users = self.store.list_users().await?;
        if users.is_empty() {
            return Err(UserError::NoneFound);
        }
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    async fn create_user(&self, input: CreateUserInput) -> Result<UserDto, UserError> {
        // Email is checked before anything else, including required fields.
        require_valid_email(input.email.as_deref())?;

        let (Some(username), Some(password)) = (present(input.username), present(input.password))
        else {
            return Err(all_fields_required());
        };

        self.ensure_unique_username(&username, None).await?;

        let password_hash = hash_password_blocking(password, self.security.clone()).await?;

        let roles = input
            .roles
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_ROLE.to_string()]);

        let record = NewUserRecord {
            username,
            password_hash,
            roles,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
        };

        match self.store.create_user(record).await {
            Ok(user) => {
                info!(user_id = user.id, username = %user.username, "User created");
                Ok(UserDto::from(user))
            }
            Err(e) => {
                error!(error = %e, "Store rejected new user");
                Err(UserError::InvalidData)
            }
        }
    }

    async fn update_user(&self, input: UpdateUserInput) -> Result<UserDto, UserError> {
        let roles = input.roles.filter(|r| !r.is_empty());
        let (Some(id), Some(username), Some(roles), Some(active)) =
            (input.id, present(input.username), roles, input.active)
        else {
            return Err(all_fields_required());
        };

        require_valid_email(input.email.as_deref())?;

        if self.store.get_user(id).await?.is_none() {
            return Err(UserError::NotFound);
        }

        self.ensure_unique_username(&username, Some(id)).await?;

        let password_hash = match present(input.password) {
            Some(password) => Some(hash_password_blocking(password, self.security.clone()).await?),
            None => None,
        };

        let update = UserRecordUpdate {
            username,
            roles,
            active,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password_hash,
        };

        let user = self
            .store
            .update_user(id, update)
            .await?
            .ok_or(UserError::NotFound)?;

        info!(user_id = id, username = %user.username, "User updated");
        Ok(UserDto::from(user))
    }

    async fn delete_user(&self, input: DeleteUserInput) -> Result<UserDto, UserError> {
        let Some(id) = input.id else {
            return Err(UserError::Validation(messages::USER_ID_REQUIRED.to_string()));
        };

        if self.store.find_note_for_user(id).await?.is_some() {
            return Err(UserError::HasAssignedNotes);
        }

        let user = self.store.get_user(id).await?.ok_or(UserError::NotFound)?;

        if !self.store.delete_user(id).await? {
            return Err(UserError::NotFound);
        }

        info!(user_id = id, username = %user.username, "User deleted");
        Ok(UserDto::from(user))
    }
}
