use crate::error::AppError;
use crate::records::latest_snapshot;
use crate::report::ReportData;
use crate::state::AppState;
use crate::web::flash::{FlashLevel, redirect_with_flash};
use crate::web::session::CurrentUser;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

/// GET /download-report - the latest record as a document attachment
#[tracing::instrument(skip_all, fields(user_id = user.user_id))]
pub async fn download_report(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let Some((record, assessment)) = latest_snapshot(&state.pool, &user).await? else {
        return redirect_with_flash(
            &state,
            jar,
            FlashLevel::Danger,
            "No records found!",
            "/dashboard",
        );
    };

    let report = ReportData::new(&user, &record, &assessment);
    let bytes = state.exporter.export(&report)?;
    tracing::info!(
        record_id = record.record_id,
        size = bytes.len(),
        "Exported health report"
    );

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.exporter.file_name()
    );
    Ok((
        [
            (header::CONTENT_TYPE, state.exporter.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
