use crate::error::AppError;
use crate::records;
use crate::state::AppState;
use crate::web::flash::{FlashLevel, redirect_with_flash};
use crate::web::pages::render;
use crate::web::session::CurrentUser;
use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use std::sync::Arc;
use vitals_common::models::{HealthRecord, RecordForm};

/// A record formatted for display
#[derive(Debug, Serialize)]
pub(crate) struct RecordView {
    pub record_id: i64,
    pub recorded_at: String,
    pub weight: String,
    pub height: String,
    pub bmi: String,
    pub blood_pressure: String,
    pub sugar: String,
    pub water: String,
}

impl From<&HealthRecord> for RecordView {
    fn from(record: &HealthRecord) -> Self {
        Self {
            record_id: record.record_id,
            recorded_at: record.recorded_at.format("%Y-%m-%d %H:%M").to_string(),
            weight: record.weight.to_string(),
            height: record.height.to_string(),
            bmi: record
                .bmi
                .map(|b| b.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            blood_pressure: record.blood_pressure(),
            sugar: record.sugar.to_string(),
            water: record.water.to_string(),
        }
    }
}

#[derive(Serialize)]
struct DashboardView {
    score: Option<u8>,
    alerts: Vec<&'static str>,
    records: Vec<RecordView>,
}

#[derive(Serialize)]
struct RecordFormView {
    heading: &'static str,
    action: String,
    form: RecordForm,
}

/// GET /dashboard
#[tracing::instrument(skip_all, fields(user_id = user.user_id))]
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let dashboard = records::dashboard(&state.pool, &user).await?;
    let view = DashboardView {
        score: dashboard.assessment.as_ref().map(|a| a.score),
        alerts: dashboard
            .assessment
            .as_ref()
            .map(|a| a.alert_labels())
            .unwrap_or_default(),
        records: dashboard.records.iter().map(RecordView::from).collect(),
    };
    render(&state, jar, Some(&user), "dashboard.html", &view)
}

/// GET /add
pub async fn add_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let view = RecordFormView {
        heading: "Add Health Record",
        action: "/add".to_string(),
        form: RecordForm::default(),
    };
    render(&state, jar, Some(&user), "record_form.html", &view)
}

/// POST /add
#[tracing::instrument(skip_all, fields(user_id = user.user_id))]
pub async fn add(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Form(form): Form<RecordForm>,
) -> Result<Response, AppError> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            return redirect_with_flash(&state, jar, FlashLevel::Danger, e.to_string(), "/add");
        }
    };

    records::create_record(&state.pool, &user, &input).await?;
    redirect_with_flash(
        &state,
        jar,
        FlashLevel::Success,
        "Health record added successfully!",
        "/dashboard",
    )
}

/// GET /edit/{id}
#[tracing::instrument(skip(state, user, jar), fields(user_id = user.user_id))]
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let record = records::get_owned_record(&state.pool, &user, id).await?;
    let view = RecordFormView {
        heading: "Edit Health Record",
        action: format!("/edit/{}", id),
        form: RecordForm::from(&record),
    };
    render(&state, jar, Some(&user), "record_form.html", &view)
}

/// POST /edit/{id}
#[tracing::instrument(skip(state, user, jar, form), fields(user_id = user.user_id))]
pub async fn edit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<RecordForm>,
) -> Result<Response, AppError> {
    // Ownership is checked before the form so a foreign id is always 403
    records::get_owned_record(&state.pool, &user, id).await?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            let back = format!("/edit/{}", id);
            return redirect_with_flash(&state, jar, FlashLevel::Danger, e.to_string(), &back);
        }
    };

    records::update_record(&state.pool, &user, id, &input).await?;
    redirect_with_flash(
        &state,
        jar,
        FlashLevel::Success,
        "Record updated successfully!",
        "/dashboard",
    )
}

/// GET /delete/{id}
#[tracing::instrument(skip(state, user, jar), fields(user_id = user.user_id))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    records::delete_record(&state.pool, &user, id).await?;
    redirect_with_flash(
        &state,
        jar,
        FlashLevel::Success,
        "Record deleted successfully!",
        "/dashboard",
    )
}
