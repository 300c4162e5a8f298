use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use vitals_common::models::{SessionClaims, User};

/// Hash a password using argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Stored password hash is malformed: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Create a signed session token for a logged-in user.
///
/// `session_version` is the account's current version; bumping it revokes the token.
pub fn create_session_token(
    user: &User,
    session_version: i64,
    secret: &str,
    ttl_secs: u64,
) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let exp = i64::try_from(ttl_secs)
        .ok()
        .and_then(|ttl| now.checked_add(ttl))
        .with_context(|| format!("Session TTL of {}s is out of range", ttl_secs))?;
    let claims = SessionClaims {
        sub: user.user_id.to_string(),
        email: user.email.clone(),
        role: user.role,
        ver: session_version,
        iat: now,
        exp,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to create session token")
}

/// Validate a session token and return its claims
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims> {
    let token_data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Invalid session token")?;
    Ok(token_data.claims)
}
