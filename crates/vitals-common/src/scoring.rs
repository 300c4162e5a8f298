//! Rule-based health score and alerts.
//!
//! A score starts at [`MAX_SCORE`] and each triggered rule deducts a fixed
//! amount. Rules are evaluated independently except the two BMI rules, which
//! are mutually exclusive.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bmi::BmiCategory;
use crate::models::HealthRecord;

pub const MAX_SCORE: u8 = 100;

pub const SYSTOLIC_LIMIT: i32 = 140;
pub const SUGAR_LIMIT: f64 = 180.0;
pub const WATER_MINIMUM: f64 = 1.5;

pub const BLOOD_PRESSURE_PENALTY: u8 = 20;
pub const SUGAR_PENALTY: u8 = 20;
pub const WATER_PENALTY: u8 = 10;
pub const BMI_PENALTY: u8 = 15;

/// A triggered health rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    HighBloodPressure,
    HighSugar,
    LowWaterIntake,
    UnderweightBmi,
    OverweightBmi,
}

impl Alert {
    pub fn label(&self) -> &'static str {
        match self {
            Alert::HighBloodPressure => "High Blood Pressure",
            Alert::HighSugar => "High Sugar Level",
            Alert::LowWaterIntake => "Low Water Intake",
            Alert::UnderweightBmi => "Underweight BMI",
            Alert::OverweightBmi => "Overweight BMI",
        }
    }

    pub fn penalty(&self) -> u8 {
        match self {
            Alert::HighBloodPressure => BLOOD_PRESSURE_PENALTY,
            Alert::HighSugar => SUGAR_PENALTY,
            Alert::LowWaterIntake => WATER_PENALTY,
            Alert::UnderweightBmi | Alert::OverweightBmi => BMI_PENALTY,
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score and alerts derived from a single record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub score: u8,
    pub alerts: Vec<Alert>,
}

impl HealthAssessment {
    pub fn alert_labels(&self) -> Vec<&'static str> {
        self.alerts.iter().map(Alert::label).collect()
    }
}

/// Alerts triggered by a record, in rule order
pub fn alerts_for(record: &HealthRecord) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if record.systolic > SYSTOLIC_LIMIT {
        alerts.push(Alert::HighBloodPressure);
    }
    if record.sugar > SUGAR_LIMIT {
        alerts.push(Alert::HighSugar);
    }
    if record.water < WATER_MINIMUM {
        alerts.push(Alert::LowWaterIntake);
    }
    match record.bmi.map(BmiCategory::of) {
        Some(BmiCategory::Underweight) => alerts.push(Alert::UnderweightBmi),
        Some(BmiCategory::Overweight) => alerts.push(Alert::OverweightBmi),
        Some(BmiCategory::Normal) | None => {}
    }

    alerts
}

/// Score a single record
pub fn assess(record: &HealthRecord) -> HealthAssessment {
    let alerts = alerts_for(record);
    let deducted: u32 = alerts.iter().map(|a| u32::from(a.penalty())).sum();
    let score = u32::from(MAX_SCORE).saturating_sub(deducted) as u8;
    HealthAssessment { score, alerts }
}

/// Score the most recent record of a history, or `None` if there is no data.
///
/// "Most recent" is the latest `recorded_at`; ties go to the higher record id.
pub fn assess_latest(records: &[HealthRecord]) -> Option<HealthAssessment> {
    records
        .iter()
        .max_by(|a, b| {
            a.recorded_at
                .cmp(&b.recorded_at)
                .then(a.record_id.cmp(&b.record_id))
        })
        .map(assess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(systolic: i32, sugar: f64, water: f64, bmi: Option<f64>) -> HealthRecord {
        HealthRecord {
            record_id: 1,
            user_id: 1,
            weight: 70.0,
            height: 1.75,
            bmi,
            systolic,
            diastolic: 80,
            sugar,
            water,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_healthy_record_scores_full() {
        let result = assess(&record(120, 100.0, 2.0, Some(22.0)));
        assert_eq!(result.score, 100);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_high_blood_pressure_only() {
        let result = assess(&record(150, 100.0, 2.0, Some(22.0)));
        assert_eq!(result.score, 80);
        assert_eq!(result.alert_labels(), vec!["High Blood Pressure"]);
    }

    #[test]
    fn test_sugar_water_underweight() {
        let result = assess(&record(120, 200.0, 1.0, Some(17.0)));
        assert_eq!(result.score, 55);
        assert_eq!(
            result.alert_labels(),
            vec!["High Sugar Level", "Low Water Intake", "Underweight BMI"]
        );
    }

    #[test]
    fn test_every_rule_triggered() {
        let result = assess(&record(190, 300.0, 0.2, Some(40.0)));
        assert_eq!(result.score, 35);
        assert_eq!(
            result.alerts,
            vec![
                Alert::HighBloodPressure,
                Alert::HighSugar,
                Alert::LowWaterIntake,
                Alert::OverweightBmi,
            ]
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        // Exactly on the limit does not trigger
        let result = assess(&record(140, 180.0, 1.5, Some(18.5)));
        assert_eq!(result.score, 100);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_overweight_boundary_is_inclusive() {
        let result = assess(&record(120, 100.0, 2.0, Some(25.0)));
        assert_eq!(result.alerts, vec![Alert::OverweightBmi]);
        assert_eq!(result.score, 85);
    }

    #[test]
    fn test_bmi_alerts_mutually_exclusive() {
        for tenth in 0..600 {
            let bmi = f64::from(tenth) / 10.0;
            let alerts = alerts_for(&record(120, 100.0, 2.0, Some(bmi)));
            let bmi_alerts = alerts
                .iter()
                .filter(|a| matches!(a, Alert::UnderweightBmi | Alert::OverweightBmi))
                .count();
            assert!(bmi_alerts <= 1, "bmi {} produced {} BMI alerts", bmi, bmi_alerts);
        }
    }

    #[test]
    fn test_missing_bmi_skips_bmi_rules() {
        let result = assess(&record(120, 100.0, 2.0, None));
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_assess_is_pure() {
        let r = record(150, 200.0, 1.0, Some(30.0));
        assert_eq!(assess(&r), assess(&r));
    }

    #[test]
    fn test_assess_latest_empty_is_none() {
        assert!(assess_latest(&[]).is_none());
    }

    #[test]
    fn test_assess_latest_picks_newest() {
        let now = Utc::now();
        let mut old = record(150, 100.0, 2.0, Some(22.0));
        old.recorded_at = now - Duration::days(2);
        let mut new = record(120, 100.0, 2.0, Some(22.0));
        new.record_id = 2;
        new.recorded_at = now;

        let result = assess_latest(&[new.clone(), old.clone()]).unwrap();
        assert_eq!(result.score, 100);
        let result = assess_latest(&[old, new]).unwrap();
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_assess_latest_tie_breaks_on_id() {
        let now = Utc::now();
        let mut first = record(150, 100.0, 2.0, Some(22.0));
        first.recorded_at = now;
        let mut second = record(120, 100.0, 2.0, Some(22.0));
        second.record_id = 2;
        second.recorded_at = now;

        assert_eq!(assess_latest(&[second, first]).unwrap().score, 100);
    }
}
