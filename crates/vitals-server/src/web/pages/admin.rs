use crate::error::AppError;
use crate::state::AppState;
use crate::web::pages::records::RecordView;
use crate::web::pages::render;
use crate::web::session::AdminUser;
use axum::{extract::State, response::Response};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use vitals_common::models::{HealthRecord, User};
use vitals_db::{HealthRecordRepo, UserRepo};

#[derive(Serialize)]
struct OwnedRecordView {
    owner: String,
    record: RecordView,
}

#[derive(Serialize)]
struct AdminView {
    users: Vec<User>,
    records: Vec<OwnedRecordView>,
}

/// GET /admin - every account and every record
#[tracing::instrument(skip_all, fields(admin_id = admin.user_id))]
pub async fn admin_dashboard(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let users: Vec<User> = UserRepo::list(&state.pool)
        .await?
        .iter()
        .map(|row| row.to_user())
        .collect();
    let emails: HashMap<i64, &str> = users
        .iter()
        .map(|u| (u.user_id, u.email.as_str()))
        .collect();

    let records: Vec<OwnedRecordView> = HealthRecordRepo::list_all(&state.pool)
        .await?
        .into_iter()
        .map(|row| {
            let record = HealthRecord::from(row);
            OwnedRecordView {
                owner: emails
                    .get(&record.user_id)
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| format!("#{}", record.user_id)),
                record: RecordView::from(&record),
            }
        })
        .collect();

    let view = AdminView { users, records };
    render(&state, jar, Some(&admin), "admin.html", &view)
}
