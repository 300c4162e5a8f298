use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use vitals_common::models::{Role, User};

use crate::error::StoreError;

const USER_COLUMNS: &str =
    "user_id, name, email, password_hash, role, created_at, session_version";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub session_version: i64,
}

impl UserRow {
    pub fn role(&self) -> Role {
        // The column is constrained to 'user' | 'admin'
        self.role.parse().unwrap_or_default()
    }

    pub fn to_user(&self) -> User {
        User {
            user_id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role(),
            created_at: self.created_at,
        }
    }
}

/// Fields for a new account; the email must already be normalized
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &SqlitePool, user: &NewUser<'_>) -> Result<UserRow, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"INSERT INTO "user" (name, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?) RETURNING {}"#,
            USER_COLUMNS
        ))
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .map_err(StoreError::from_insert)?;
        Ok(row)
    }

    pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {} FROM "user" WHERE email = ?"#,
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by email")?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {} FROM "user" WHERE user_id = ?"#,
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by id")?;
        Ok(row)
    }

    /// All users, oldest account first
    pub async fn list(pool: &SqlitePool) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {} FROM "user" ORDER BY created_at ASC, user_id ASC"#,
            USER_COLUMNS
        ))
        .fetch_all(pool)
        .await
        .context("Failed to list users")?;
        Ok(rows)
    }

    /// Invalidate every session token issued to the user so far
    pub async fn bump_session_version(pool: &SqlitePool, user_id: i64) -> Result<()> {
        sqlx::query(r#"UPDATE "user" SET session_version = session_version + 1 WHERE user_id = ?"#)
            .bind(user_id)
            .execute(pool)
            .await
            .context("Failed to bump session version")?;
        Ok(())
    }
}
