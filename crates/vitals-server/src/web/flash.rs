//! One-shot status messages carried across a redirect in a signed cookie.

use crate::error::AppError;
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "vitals_flash";

/// Flash messages older than this are dropped unread
const FLASH_TTL_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Danger,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FlashClaims {
    #[serde(flatten)]
    flash: Flash,
    exp: i64,
}

/// Sign a flash message for storage in a cookie
pub fn encode_flash(flash: &Flash, secret: &str) -> Result<String> {
    let claims = FlashClaims {
        flash: flash.clone(),
        exp: chrono::Utc::now().timestamp() + FLASH_TTL_SECS,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode flash message")
}

pub fn decode_flash(token: &str, secret: &str) -> Result<Flash> {
    let token_data = jsonwebtoken::decode::<FlashClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Invalid flash cookie")?;
    Ok(token_data.claims.flash)
}

pub fn push_flash(jar: CookieJar, secret: &str, flash: &Flash) -> Result<CookieJar> {
    let token = encode_flash(flash, secret)?;
    Ok(jar.add(
        Cookie::build((FLASH_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    ))
}

/// Remove the pending flash message from the jar, returning it if it was valid
pub fn take_flash(jar: CookieJar, secret: &str) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = decode_flash(cookie.value(), secret).ok();
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash)
}

/// Redirect to `to`, showing `message` on the next rendered page
pub fn redirect_with_flash(
    state: &AppState,
    jar: CookieJar,
    level: FlashLevel,
    message: impl Into<String>,
    to: &str,
) -> Result<Response, AppError> {
    let jar = push_flash(jar, state.session_secret(), &Flash::new(level, message))?;
    Ok((jar, Redirect::to(to)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    #[test]
    fn test_flash_encode_decode() {
        let flash = Flash::new(FlashLevel::Success, "Record updated successfully!");
        let token = encode_flash(&flash, "secret").unwrap();
        assert_eq!(decode_flash(&token, "secret").unwrap(), flash);
    }

    #[test]
    fn test_flash_wrong_secret_rejected() {
        let token = encode_flash(&Flash::new(FlashLevel::Info, "hi"), "secret-1").unwrap();
        assert!(decode_flash(&token, "secret-2").is_err());
    }

    #[test]
    fn test_take_flash_from_request_cookie() {
        let token = encode_flash(&Flash::new(FlashLevel::Danger, "Invalid credentials"), "s").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{}={}", FLASH_COOKIE, token)).unwrap(),
        );
        let jar = CookieJar::from_headers(&headers);

        let (jar, flash) = take_flash(jar, "s");
        let flash = flash.unwrap();
        assert_eq!(flash.level, FlashLevel::Danger);
        assert_eq!(flash.message, "Invalid credentials");
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn test_take_flash_ignores_forged_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("vitals_flash=not-a-token"),
        );
        let jar = CookieJar::from_headers(&headers);
        let (_jar, flash) = take_flash(jar, "s");
        assert!(flash.is_none());
    }

    #[test]
    fn test_take_flash_without_cookie() {
        let (_jar, flash) = take_flash(CookieJar::new(), "s");
        assert!(flash.is_none());
    }
}
