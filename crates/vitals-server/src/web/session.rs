//! Cookie-backed login session and the request extractors built on it.

use crate::auth::validate_session_token;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;
use vitals_common::models::User;
use vitals_db::UserRepo;

pub const SESSION_COOKIE: &str = "vitals_session";

/// Attach a freshly issued session token to the jar
pub fn start_session(jar: CookieJar, token: String) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Revoke the session carried by the jar, if any, and clear the cookie.
///
/// Bumping the account's session version also invalidates copies of the
/// token held elsewhere.
pub async fn end_session(state: &AppState, jar: CookieJar) -> anyhow::Result<CookieJar> {
    let claims = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| validate_session_token(cookie.value(), state.session_secret()).ok());
    if let Some(user_id) = claims.as_ref().and_then(|c| c.user_id()) {
        UserRepo::bump_session_version(&state.pool, user_id).await?;
        tracing::info!(user_id, "Session revoked");
    }
    Ok(clear_session(jar))
}

fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

fn login_redirect(jar: CookieJar) -> Response {
    (clear_session(jar), Redirect::to("/login")).into_response()
}

/// Extractor for the logged-in user.
/// Requests without a valid session are redirected to `/login`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = match jar.get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return Err(Redirect::to("/login").into_response()),
        };

        let claims = match validate_session_token(&token, state.session_secret()) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Rejected session cookie: {:#}", e);
                return Err(login_redirect(jar));
            }
        };

        let Some(user_id) = claims.user_id() else {
            return Err(login_redirect(jar));
        };

        // Re-read the account so name and role are current
        let row = match UserRepo::get_by_id(&state.pool, user_id).await {
            Ok(Some(row)) => row,
            Ok(None) => return Err(login_redirect(jar)),
            Err(e) => return Err(AppError::Internal(e).into_response()),
        };

        if row.session_version != claims.ver {
            tracing::debug!(user_id, "Rejected revoked session");
            return Err(login_redirect(jar));
        }

        Ok(CurrentUser(row.to_user()))
    }
}

/// Extractor for a logged-in admin; other users get 403
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            tracing::warn!(user_id = user.user_id, "Non-admin denied admin access");
            return Err(AppError::Forbidden.into_response());
        }
        Ok(AdminUser(user))
    }
}
