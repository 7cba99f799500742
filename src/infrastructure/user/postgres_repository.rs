//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::user::{User, UserId, UserPatch, UserRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of UserRepository
///
/// Insertion order is tracked by the `seq` column.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ensures the users table exists
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                seq BIGSERIAL NOT NULL,
                id VARCHAR(64) PRIMARY KEY,
                login TEXT NOT NULL,
                password_hash TEXT,
                age SMALLINT,
                is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, login, password_hash, age, is_deleted, created_at, updated_at
            FROM users
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, login, password_hash, age, is_deleted, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, login, password_hash, age, is_deleted, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.login())
        .bind(user.password_hash())
        .bind(user.age().map(i16::from))
        .bind(user.is_deleted())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "User with ID '{}' already exists",
                    user.id().as_str()
                ))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<u64, DomainError> {
        if patch.is_empty() {
            // Nothing to write, but the caller still needs to know whether the id exists
            return Ok(u64::from(self.exists(id).await?));
        }

        let result = sqlx::query(
            r#"
            UPDATE users
            SET login = COALESCE($2, login),
                password_hash = COALESCE($3, password_hash),
                age = COALESCE($4, age),
                is_deleted = COALESCE($5, is_deleted),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(patch.login.as_deref())
        .bind(patch.password_hash.as_deref())
        .bind(patch.age.map(i16::from))
        .bind(patch.is_deleted)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update user: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn soft_delete(&self, id: &UserId) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE users SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected())
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Failed to read user id: {}", e)))?;
    let login: String = row
        .try_get("login")
        .map_err(|e| DomainError::storage(format!("Failed to read login: {}", e)))?;
    let password_hash: Option<String> = row
        .try_get("password_hash")
        .map_err(|e| DomainError::storage(format!("Failed to read password hash: {}", e)))?;
    let age: Option<i16> = row
        .try_get("age")
        .map_err(|e| DomainError::storage(format!("Failed to read age: {}", e)))?;
    let is_deleted: bool = row
        .try_get("is_deleted")
        .map_err(|e| DomainError::storage(format!("Failed to read is_deleted: {}", e)))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::storage(format!("Failed to read created_at: {}", e)))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| DomainError::storage(format!("Failed to read updated_at: {}", e)))?;

    let user_id = UserId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(User::restore(
        user_id,
        login,
        password_hash,
        age_from_column(age)?,
        is_deleted,
        created_at,
        updated_at,
    ))
}

fn age_from_column(age: Option<i16>) -> Result<Option<u8>, DomainError> {
    age.map(|value| {
        u8::try_from(value)
            .map_err(|_| DomainError::storage(format!("Invalid age in database: {}", value)))
    })
    .transpose()
}
