//! Owner-checked record lifecycle on top of the record store.

use serde::Serialize;
use sqlx::SqlitePool;
use vitals_common::models::{HealthRecord, RecordInput, User};
use vitals_common::scoring::{HealthAssessment, assess, assess_latest};
use vitals_db::{HealthRecordRepo, RecordOrder};

use crate::error::AppError;

/// Everything the dashboard shows for one user
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// Oldest first
    pub records: Vec<HealthRecord>,
    pub latest: Option<HealthRecord>,
    /// `None` when the user has no records yet
    pub assessment: Option<HealthAssessment>,
}

fn ensure_owner(caller: &User, record: &HealthRecord) -> Result<(), AppError> {
    if record.user_id != caller.user_id {
        tracing::warn!(
            caller = caller.user_id,
            owner = record.user_id,
            record_id = record.record_id,
            "Rejected access to another user's record"
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub async fn create_record(
    pool: &SqlitePool,
    owner: &User,
    input: &RecordInput,
) -> Result<HealthRecord, AppError> {
    let row = HealthRecordRepo::create(pool, owner.user_id, input).await?;
    tracing::info!(
        user_id = owner.user_id,
        record_id = row.record_id,
        "Created health record"
    );
    Ok(row.into())
}

/// Fetch a record the caller owns. Unknown ids are `NotFound`, foreign ones `Forbidden`.
pub async fn get_owned_record(
    pool: &SqlitePool,
    caller: &User,
    record_id: i64,
) -> Result<HealthRecord, AppError> {
    let record: HealthRecord = HealthRecordRepo::get(pool, record_id)
        .await?
        .ok_or(AppError::NotFound)?
        .into();
    ensure_owner(caller, &record)?;
    Ok(record)
}

pub async fn update_record(
    pool: &SqlitePool,
    caller: &User,
    record_id: i64,
    input: &RecordInput,
) -> Result<HealthRecord, AppError> {
    get_owned_record(pool, caller, record_id).await?;
    let row = HealthRecordRepo::update(pool, record_id, input)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(user_id = caller.user_id, record_id, "Updated health record");
    Ok(row.into())
}

pub async fn delete_record(
    pool: &SqlitePool,
    caller: &User,
    record_id: i64,
) -> Result<(), AppError> {
    get_owned_record(pool, caller, record_id).await?;
    if !HealthRecordRepo::delete(pool, record_id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(user_id = caller.user_id, record_id, "Deleted health record");
    Ok(())
}

pub async fn dashboard(pool: &SqlitePool, user: &User) -> Result<Dashboard, AppError> {
    let records: Vec<HealthRecord> =
        HealthRecordRepo::list_for_user(pool, user.user_id, RecordOrder::Ascending)
            .await?
            .into_iter()
            .map(HealthRecord::from)
            .collect();
    let assessment = assess_latest(&records);
    let latest = records.last().cloned();
    Ok(Dashboard {
        records,
        latest,
        assessment,
    })
}

/// Most recent record (newest-first ordering) and its assessment, as printed on the report
pub async fn latest_snapshot(
    pool: &SqlitePool,
    user: &User,
) -> Result<Option<(HealthRecord, HealthAssessment)>, AppError> {
    let latest = HealthRecordRepo::latest_for_user(pool, user.user_id).await?;
    Ok(latest.map(|row| {
        let record = HealthRecord::from(row);
        let assessment = assess(&record);
        (record, assessment)
    }))
}
