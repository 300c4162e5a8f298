use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use vitals_common::models::{HealthRecord, RecordInput};

const RECORD_COLUMNS: &str =
    "record_id, user_id, weight, height, bmi, systolic, diastolic, sugar, water, recorded_at";

/// Health record row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HealthRecordRow {
    pub record_id: i64,
    pub user_id: i64,
    pub weight: f64,
    pub height: f64,
    pub bmi: Option<f64>,
    pub systolic: i32,
    pub diastolic: i32,
    pub sugar: f64,
    pub water: f64,
    pub recorded_at: DateTime<Utc>,
}

impl From<HealthRecordRow> for HealthRecord {
    fn from(row: HealthRecordRow) -> Self {
        HealthRecord {
            record_id: row.record_id,
            user_id: row.user_id,
            weight: row.weight,
            height: row.height,
            bmi: row.bmi,
            systolic: row.systolic,
            diastolic: row.diastolic,
            sugar: row.sugar,
            water: row.water,
            recorded_at: row.recorded_at,
        }
    }
}

/// Timestamp ordering for a user's history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrder {
    /// Oldest first (dashboard)
    Ascending,
    /// Newest first (report)
    Descending,
}

impl RecordOrder {
    fn sql(self) -> &'static str {
        match self {
            RecordOrder::Ascending => "recorded_at ASC, record_id ASC",
            RecordOrder::Descending => "recorded_at DESC, record_id DESC",
        }
    }
}

/// Repository for health record operations.
///
/// BMI is computed here from weight and height on every write. Ownership is
/// not checked at this layer.
pub struct HealthRecordRepo;

impl HealthRecordRepo {
    /// Create a record stamped with the current time
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        input: &RecordInput,
    ) -> Result<HealthRecordRow> {
        Self::create_at(pool, user_id, input, Utc::now()).await
    }

    /// Create a record with an explicit timestamp
    pub async fn create_at(
        pool: &SqlitePool,
        user_id: i64,
        input: &RecordInput,
        recorded_at: DateTime<Utc>,
    ) -> Result<HealthRecordRow> {
        let row = sqlx::query_as::<_, HealthRecordRow>(&format!(
            r#"
            INSERT INTO health_record
                (user_id, weight, height, bmi, systolic, diastolic, sugar, water, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(user_id)
        .bind(input.weight)
        .bind(input.height)
        .bind(input.bmi())
        .bind(input.systolic)
        .bind(input.diastolic)
        .bind(input.sugar)
        .bind(input.water)
        .bind(recorded_at)
        .fetch_one(pool)
        .await
        .context("Failed to create health record")?;
        Ok(row)
    }

    pub async fn get(pool: &SqlitePool, record_id: i64) -> Result<Option<HealthRecordRow>> {
        let row = sqlx::query_as::<_, HealthRecordRow>(&format!(
            "SELECT {} FROM health_record WHERE record_id = ?",
            RECORD_COLUMNS
        ))
        .bind(record_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get health record")?;
        Ok(row)
    }

    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: i64,
        order: RecordOrder,
    ) -> Result<Vec<HealthRecordRow>> {
        let rows = sqlx::query_as::<_, HealthRecordRow>(&format!(
            "SELECT {} FROM health_record WHERE user_id = ? ORDER BY {}",
            RECORD_COLUMNS,
            order.sql()
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list health records")?;
        Ok(rows)
    }

    pub async fn latest_for_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<HealthRecordRow>> {
        let row = sqlx::query_as::<_, HealthRecordRow>(&format!(
            "SELECT {} FROM health_record WHERE user_id = ? ORDER BY {} LIMIT 1",
            RECORD_COLUMNS,
            RecordOrder::Descending.sql()
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get latest health record")?;
        Ok(row)
    }

    /// Every record in the store, oldest first
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<HealthRecordRow>> {
        let rows = sqlx::query_as::<_, HealthRecordRow>(&format!(
            "SELECT {} FROM health_record ORDER BY {}",
            RECORD_COLUMNS,
            RecordOrder::Ascending.sql()
        ))
        .fetch_all(pool)
        .await
        .context("Failed to list all health records")?;
        Ok(rows)
    }

    /// Overwrite the measurements of a record and recompute its BMI.
    /// `recorded_at` and `user_id` are left untouched. Returns `None` if the record is gone.
    pub async fn update(
        pool: &SqlitePool,
        record_id: i64,
        input: &RecordInput,
    ) -> Result<Option<HealthRecordRow>> {
        let row = sqlx::query_as::<_, HealthRecordRow>(&format!(
            r#"
            UPDATE health_record
            SET weight = ?, height = ?, bmi = ?, systolic = ?, diastolic = ?, sugar = ?, water = ?
            WHERE record_id = ?
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(input.weight)
        .bind(input.height)
        .bind(input.bmi())
        .bind(input.systolic)
        .bind(input.diastolic)
        .bind(input.sugar)
        .bind(input.water)
        .bind(record_id)
        .fetch_optional(pool)
        .await
        .context("Failed to update health record")?;
        Ok(row)
    }

    /// Returns whether a row was deleted
    pub async fn delete(pool: &SqlitePool, record_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM health_record WHERE record_id = ?")
            .bind(record_id)
            .execute(pool)
            .await
            .context("Failed to delete health record")?;
        Ok(result.rows_affected() > 0)
    }
}
