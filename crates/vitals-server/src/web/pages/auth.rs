use crate::access::{self, LoginForm, RegisterForm};
use crate::auth::create_session_token;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::flash::{FlashLevel, redirect_with_flash};
use crate::web::pages::render;
use crate::web::session::{end_session, start_session};
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::json;
use std::sync::Arc;

/// GET /
pub async fn index() -> Redirect {
    Redirect::to("/login")
}

/// GET /register
pub async fn register_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    render(&state, jar, None, "register.html", &json!({}))
}

/// POST /register
#[tracing::instrument(skip(state, jar, form))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match access::register(&state.pool, &state.config.auth, &form).await {
        Ok(_) => redirect_with_flash(
            &state,
            jar,
            FlashLevel::Success,
            "Registration successful! Please login.",
            "/login",
        ),
        Err(AppError::Validation(message)) => {
            redirect_with_flash(&state, jar, FlashLevel::Danger, message, "/register")
        }
        Err(e) => Err(e),
    }
}

/// GET /login
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    render(&state, jar, None, "login.html", &json!({}))
}

/// POST /login
#[tracing::instrument(skip(state, jar, form))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let row = match access::authenticate(&state.pool, &form).await {
        Ok(row) => row,
        Err(AppError::Authentication) => {
            return redirect_with_flash(
                &state,
                jar,
                FlashLevel::Danger,
                AppError::Authentication.to_string(),
                "/login",
            );
        }
        Err(e) => return Err(e),
    };

    let user = row.to_user();
    let token = create_session_token(
        &user,
        row.session_version,
        state.session_secret(),
        state.config.auth.session_ttl_secs,
    )?;
    tracing::info!(user_id = user.user_id, "User logged in");

    let target = if user.role.is_admin() {
        "/admin"
    } else {
        "/dashboard"
    };
    Ok((start_session(jar, token), Redirect::to(target)).into_response())
}

/// GET /logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let jar = end_session(&state, jar).await?;
    redirect_with_flash(
        &state,
        jar,
        FlashLevel::Info,
        "Logged out successfully!",
        "/login",
    )
}
