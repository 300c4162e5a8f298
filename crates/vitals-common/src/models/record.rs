use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bmi::calculate_bmi;

/// A stored health measurement owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
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

impl HealthRecord {
    /// Blood pressure in the usual `systolic/diastolic` notation
    pub fn blood_pressure(&self) -> String {
        format!("{}/{}", self.systolic, self.diastolic)
    }
}

/// Heaviest weight (kg) accepted from the form
pub const MAX_WEIGHT_KG: f64 = 700.0;

/// Tallest height (m) accepted from the form
pub const MAX_HEIGHT_M: f64 = 3.0;

/// Validated measurement fields supplied by a user on add/edit.
///
/// Carries no `bmi`: that is always derived from weight and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordInput {
    pub weight: f64,
    pub height: f64,
    pub systolic: i32,
    pub diastolic: i32,
    pub sugar: f64,
    pub water: f64,
}

impl RecordInput {
    pub fn bmi(&self) -> Option<f64> {
        calculate_bmi(self.weight, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be a number")]
    NotANumber { field: &'static str },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: f64 },
}

/// Raw add/edit form as submitted by the browser.
///
/// Fields are kept as strings so malformed numbers become a [`ValidationError`]
/// shown on the form instead of a framework rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordForm {
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub systolic: String,
    #[serde(default)]
    pub diastolic: String,
    #[serde(default)]
    pub sugar: String,
    #[serde(default)]
    pub water: String,
}

impl RecordForm {
    pub fn validate(&self) -> Result<RecordInput, ValidationError> {
        let weight = parse_float("weight", &self.weight)?;
        let height = parse_float("height", &self.height)?;
        let systolic = parse_int("systolic", &self.systolic)?;
        let diastolic = parse_int("diastolic", &self.diastolic)?;
        let sugar = parse_float("sugar", &self.sugar)?;
        let water = parse_float("water", &self.water)?;

        if weight <= 0.0 {
            return Err(ValidationError::NotPositive { field: "weight" });
        }
        if height <= 0.0 {
            return Err(ValidationError::NotPositive { field: "height" });
        }
        if weight > MAX_WEIGHT_KG {
            return Err(ValidationError::TooLarge {
                field: "weight",
                max: MAX_WEIGHT_KG,
            });
        }
        if height > MAX_HEIGHT_M {
            return Err(ValidationError::TooLarge {
                field: "height",
                max: MAX_HEIGHT_M,
            });
        }
        for (field, value) in [("sugar", sugar), ("water", water)] {
            if value < 0.0 {
                return Err(ValidationError::Negative { field });
            }
        }
        for (field, value) in [("systolic", systolic), ("diastolic", diastolic)] {
            if value < 0 {
                return Err(ValidationError::Negative { field });
            }
        }

        Ok(RecordInput {
            weight,
            height,
            systolic,
            diastolic,
            sugar,
            water,
        })
    }
}

impl From<&HealthRecord> for RecordForm {
    /// Prefill an edit form from a stored record
    fn from(record: &HealthRecord) -> Self {
        RecordForm {
            weight: record.weight.to_string(),
            height: record.height.to_string(),
            systolic: record.systolic.to_string(),
            diastolic: record.diastolic.to_string(),
            sugar: record.sugar.to_string(),
            water: record.water.to_string(),
        }
    }
}

fn required<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    Ok(trimmed)
}

fn parse_float(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = required(field, raw)?
        .parse()
        .map_err(|_| ValidationError::NotANumber { field })?;
    if !value.is_finite() {
        return Err(ValidationError::NotANumber { field });
    }
    Ok(value)
}

fn parse_int(field: &'static str, raw: &str) -> Result<i32, ValidationError> {
    required(field, raw)?
        .parse()
        .map_err(|_| ValidationError::NotANumber { field })
}
