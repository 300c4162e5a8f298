pub mod admin;
pub mod auth;
pub mod records;
pub mod report;

use crate::error::AppError;
use crate::state::AppState;
use crate::web::flash::{Flash, take_flash};
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use vitals_common::models::User;

/// Context shared by every page: the viewer, a pending flash message and the page's own data
#[derive(Serialize)]
struct Page<'a, T: Serialize> {
    user: Option<&'a User>,
    flash: Option<Flash>,
    #[serde(flatten)]
    view: &'a T,
}

/// Render a template, consuming any pending flash message
pub(crate) fn render<T: Serialize>(
    state: &AppState,
    jar: CookieJar,
    user: Option<&User>,
    template: &str,
    view: &T,
) -> Result<Response, AppError> {
    let (jar, flash) = take_flash(jar, state.session_secret());
    let page = Page { user, flash, view };
    let body = state.templates.render(template, &page)?;
    Ok((jar, Html(body)).into_response())
}
