use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tokio::task;
use tracing::warn;

use crate::config::SecurityConfig;
use crate::entities::users;
use crate::services::validation::fold_case;

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
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

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        let roles = decode_roles(model.id, &model.roles);
        Self {
            id: model.id,
            username: model.username,
            roles,
            active: model.active,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Fields written when a user is created. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Full overwrite of a user's mutable fields. A `None` password hash keeps
/// the stored one.
#[derive(Debug, Clone)]
pub struct UserRecordUpdate {
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        let users = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query users by IDs")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    /// Case-insensitive lookup by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::UsernameKey.eq(fold_case(username)))
            .order_by_asc(users::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Case-insensitive lookup returning the password hash alongside the user.
    pub async fn find_credentials(&self, username: &str) -> Result<Option<(User, String)>> {
        let user = users::Entity::find()
            .filter(users::Column::UsernameKey.eq(fold_case(username)))
            .order_by_asc(users::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    pub async fn create(&self, record: NewUserRecord) -> Result<User> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            username_key: Set(fold_case(&record.username)),
            username: Set(record.username),
            password_hash: Set(record.password_hash),
            roles: Set(encode_roles(&record.roles)?),
            active: Set(true),
            first_name: Set(record.first_name),
            last_name: Set(record.last_name),
            email: Set(record.email),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(User::from(model))
    }

    /// Overwrites the user's fields. Returns `None` if the user is gone.
    pub async fn update(&self, id: i32, update: UserRecordUpdate) -> Result<Option<User>> {
        let Some(user) = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for update")?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.username_key = Set(fold_case(&update.username));
        active.username = Set(update.username);
        active.roles = Set(encode_roles(&update.roles)?);
        active.active = Set(update.active);
        active.first_name = Set(update.first_name);
        active.last_name = Set(update.last_name);
        active.email = Set(update.email);
        if let Some(hash) = update.password_hash {
            active.password_hash = Set(hash);
        }
        active.updated_at = Set(now);

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update user")?;

        Ok(Some(User::from(model)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }
}

fn encode_roles(roles: &[String]) -> Result<String> {
    serde_json::to_string(roles).context("Failed to encode roles")
}

fn decode_roles(user_id: i32, raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(user_id, error = %e, "Stored roles are not a JSON array, treating as empty");
        Vec::new()
    })
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None, // output length (use default)
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Hashes on a blocking thread; Argon2 is CPU-intensive and would stall the
/// async runtime if run directly.
pub async fn hash_password_blocking(password: String, config: SecurityConfig) -> Result<String> {
    task::spawn_blocking(move || hash_password(&password, &config))
        .await
        .context("Password hashing task panicked")?
}

/// Verifies `password` against a stored PHC hash on a blocking thread.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool> {
    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password_blocking("hunter2".to_string(), cheap_params())
            .await
            .unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("hunter3".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_hash() {
        assert!(
            verify_password("x".to_string(), "not-a-hash".to_string())
                .await
                .is_err()
        );
    }

    #[test]
    fn test_roles_codec() {
        let roles = vec!["Employee".to_string(), "Manager".to_string()];
        let encoded = encode_roles(&roles).unwrap();
        assert_eq!(encoded, r#"["Employee","Manager"]"#);
        assert_eq!(decode_roles(1, &encoded), roles);
        assert!(decode_roles(1, "Employee").is_empty());
    }
}
