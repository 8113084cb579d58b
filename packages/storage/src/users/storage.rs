// ABOUTME: Storage operations for users and their API tokens
// ABOUTME: Token generation, hashing, constant-time verification and profile lookups

use base64::Engine;
use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use subtle::ConstantTimeEq;
use tracing::debug;

use super::types::{ProfileUpdateInput, User, UserCreateInput, UserWithToken};
use crate::common::map_write_err;
use crate::StorageError;

const USER_COLUMNS: &str = "id, name, email, role, ward_id, ward_name, employee_id, phone_number, \
     green_points, reports_submitted, verified, status, created_at, updated_at";

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a random 32-byte token, base64 URL-safe encoded
    pub fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; 32] = rng.gen();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Hash a token using SHA-256. This is what gets stored.
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Compare a token against a stored hash in constant time
    pub fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
        let computed_hash = Self::hash_token(token);
        computed_hash
            .as_bytes()
            .ct_eq(stored_hash.as_bytes())
            .into()
    }

    /// Create a user and issue its API token
    pub async fn create_user(&self, input: UserCreateInput) -> Result<UserWithToken, StorageError> {
        let id = airwatch_core::generate_id("user");
        let token = Self::generate_token();
        let token_hash = Self::hash_token(&token);
        let now = Utc::now();
        let role = input.role.unwrap_or_default();

        debug!("Creating user: {} (role: {})", id, role);

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, ward_id, ward_name, employee_id,
                               phone_number, api_token_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(input.name.trim())
        .bind(input.email.trim().to_lowercase())
        .bind(role)
        .bind(&input.ward)
        .bind(&input.ward_name)
        .bind(&input.employee_id)
        .bind(&input.phone_number)
        .bind(&token_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;

        let user = self.get_user(&id).await?;
        Ok(UserWithToken {
            user,
            api_token: token,
        })
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, StorageError> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("User"))?;

        row_to_user(&row)
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        input: ProfileUpdateInput,
    ) -> Result<User, StorageError> {
        debug!("Updating profile: {}", user_id);

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE users SET updated_at = ");
        query_builder.push_bind(Utc::now());

        if let Some(name) = input.name {
            query_builder.push(", name = ").push_bind(name.trim().to_string());
        }
        if let Some(phone_number) = input.phone_number {
            query_builder.push(", phone_number = ").push_bind(phone_number);
        }

        query_builder.push(" WHERE id = ").push_bind(user_id);

        let result = query_builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("User"));
        }

        self.get_user(user_id).await
    }

    /// Resolve a presented token to an active user
    pub async fn find_by_token(&self, token: &str) -> Result<Option<User>, StorageError> {
        let token_hash = Self::hash_token(token);

        let row = sqlx::query(&format!(
            "SELECT {}, api_token_hash FROM users WHERE api_token_hash = ? AND status = 'active'",
            USER_COLUMNS
        ))
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => {
                let stored_hash: String =
                    row.try_get("api_token_hash").map_err(StorageError::Sqlx)?;
                if Self::verify_token_hash(token, &stored_hash) {
                    Ok(Some(row_to_user(&row)?))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Replace a user's token, invalidating the previous one
    pub async fn rotate_token(&self, user_id: &str) -> Result<UserWithToken, StorageError> {
        let token = Self::generate_token();

        debug!("Rotating API token for user: {}", user_id);

        let result = sqlx::query("UPDATE users SET api_token_hash = ?, updated_at = ? WHERE id = ?")
            .bind(Self::hash_token(&token))
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("User"));
        }

        let user = self.get_user(user_id).await?;
        Ok(UserWithToken {
            user,
            api_token: token,
        })
    }

    pub async fn count_users(&self) -> Result<i64, StorageError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
    Ok(User {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
        email: row.try_get("email").map_err(StorageError::Sqlx)?,
        role: row.try_get("role").map_err(StorageError::Sqlx)?,
        ward: row.try_get("ward_id").map_err(StorageError::Sqlx)?,
        ward_name: row.try_get("ward_name").map_err(StorageError::Sqlx)?,
        employee_id: row.try_get("employee_id").map_err(StorageError::Sqlx)?,
        phone_number: row.try_get("phone_number").map_err(StorageError::Sqlx)?,
        green_points: row.try_get("green_points").map_err(StorageError::Sqlx)?,
        reports_submitted: row.try_get("reports_submitted").map_err(StorageError::Sqlx)?,
        verified: row.try_get("verified").map_err(StorageError::Sqlx)?,
        status: row.try_get("status").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_produces_unique_values() {
        let token1 = UserStorage::generate_token();
        let token2 = UserStorage::generate_token();

        assert_ne!(token1, token2);
        assert_eq!(token1.len(), 43); // base64 of 32 bytes, no padding
    }

    #[test]
    fn test_hash_token_is_deterministic() {
        let hash1 = UserStorage::hash_token("token-abc");
        let hash2 = UserStorage::hash_token("token-abc");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_verify_token_hash() {
        let hash = UserStorage::hash_token("right");
        assert!(UserStorage::verify_token_hash("right", &hash));
        assert!(!UserStorage::verify_token_hash("wrong", &hash));
    }
}
