pub mod flash;
pub mod pages;
pub mod session;

use crate::state::AppState;
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

async fn health() -> &'static str {
    "ok"
}

pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", get(pages::auth::index))
        .route("/health", get(health))
        // Access
        .route(
            "/register",
            get(pages::auth::register_page).post(pages::auth::register),
        )
        .route("/login", get(pages::auth::login_page).post(pages::auth::login))
        .route("/logout", get(pages::auth::logout))
        // Records
        .route("/dashboard", get(pages::records::dashboard))
        .route(
            "/add",
            get(pages::records::add_page).post(pages::records::add),
        )
        .route(
            "/edit/{id}",
            get(pages::records::edit_page).post(pages::records::edit),
        )
        .route("/delete/{id}", get(pages::records::delete))
        // Report and admin
        .route("/download-report", get(pages::report::download_report))
        .route("/admin", get(pages::admin::admin_dashboard))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
