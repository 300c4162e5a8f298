//! Registration, login and role assignment.

use anyhow::Context;
use serde::Deserialize;
use sqlx::SqlitePool;
use vitals_common::models::{Role, normalize_email};
use vitals_db::{NewUser, UserRepo, UserRow};

use crate::auth::{hash_password, verify_password};
use crate::config::AuthConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Role for a newly registered account.
///
/// Only the configured bootstrap address becomes admin; with no address
/// configured every registration is a plain user.
pub fn role_for_email(email: &str, admin_email: Option<&str>) -> Role {
    match admin_email {
        Some(admin) if normalize_email(admin) == normalize_email(email) => Role::Admin,
        _ => Role::User,
    }
}

/// Create a new account from the registration form
#[tracing::instrument(skip(pool, auth, form), fields(email = %form.email))]
pub async fn register(
    pool: &SqlitePool,
    auth: &AuthConfig,
    form: &RegisterForm,
) -> Result<UserRow, AppError> {
    let name = form.name.trim();
    let email = normalize_email(&form.email);

    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if form.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    if UserRepo::get_by_email(pool, &email).await?.is_some() {
        return Err(AppError::Validation("Email already exists".to_string()));
    }

    let password_hash = hash_password(&form.password)?;
    let role = role_for_email(&email, auth.admin_email.as_deref());

    // A concurrent registration can still win the race; the unique index reports it
    let user = UserRepo::create(
        pool,
        &NewUser {
            name,
            email: &email,
            password_hash: &password_hash,
            role,
        },
    )
    .await?;

    tracing::info!(user_id = user.user_id, role = %role, "Registered user");
    Ok(user)
}

/// Check credentials. Unknown email and wrong password are indistinguishable to the caller.
#[tracing::instrument(skip(pool, form), fields(email = %form.email))]
pub async fn authenticate(pool: &SqlitePool, form: &LoginForm) -> Result<UserRow, AppError> {
    let email = normalize_email(&form.email);

    let user = match UserRepo::get_by_email(pool, &email).await? {
        Some(u) => u,
        None => {
            tracing::warn!("Login failed: unknown email");
            return Err(AppError::Authentication);
        }
    };

    if !verify_password(&form.password, &user.password_hash)? {
        tracing::warn!(user_id = user.user_id, "Login failed: wrong password");
        return Err(AppError::Authentication);
    }

    Ok(user)
}

/// Create the configured initial admin if it does not exist yet
pub async fn seed_initial_admin(pool: &SqlitePool, auth: &AuthConfig) -> anyhow::Result<()> {
    let Some(initial) = &auth.initial_admin else {
        return Ok(());
    };
    let email = normalize_email(&initial.email);

    let existing = UserRepo::get_by_email(pool, &email)
        .await
        .context("Failed to check for initial admin")?;
    if existing.is_some() {
        tracing::info!("Initial admin '{}' already exists, skipping seed", email);
        return Ok(());
    }

    let password_hash =
        hash_password(&initial.password).context("Failed to hash initial admin password")?;
    UserRepo::create(
        pool,
        &NewUser {
            name: &initial.name,
            email: &email,
            password_hash: &password_hash,
            role: Role::Admin,
        },
    )
    .await
    .context("Failed to create initial admin")?;
    tracing::info!("Created initial admin: {}", email);
    Ok(())
}
