use chrono::Utc;
use vitals_common::bmi::calculate_bmi;
use vitals_common::models::{HealthRecord, RecordForm};
use vitals_common::scoring::{assess, Alert, MAX_SCORE};

fn record_from_form(form: &RecordForm) -> HealthRecord {
    let input = form.validate().expect("form should validate");
    HealthRecord {
        record_id: 7,
        user_id: 3,
        weight: input.weight,
        height: input.height,
        bmi: input.bmi(),
        systolic: input.systolic,
        diastolic: input.diastolic,
        sugar: input.sugar,
        water: input.water,
        recorded_at: Utc::now(),
    }
}

fn form(weight: &str, height: &str, systolic: &str, sugar: &str, water: &str) -> RecordForm {
    RecordForm {
        weight: weight.to_string(),
        height: height.to_string(),
        systolic: systolic.to_string(),
        diastolic: "80".to_string(),
        sugar: sugar.to_string(),
        water: water.to_string(),
    }
}

#[test]
fn test_form_to_assessment_overweight_hypertensive() {
    // 95 / 1.8^2 = 29.32
    let record = record_from_form(&form("95", "1.8", "155", "110", "2.5"));
    assert_eq!(record.bmi, Some(29.32));

    let result = assess(&record);
    assert_eq!(result.alerts, vec![Alert::HighBloodPressure, Alert::OverweightBmi]);
    assert_eq!(result.score, 65);
}

#[test]
fn test_form_to_assessment_underweight() {
    // 45 / 1.7^2 = 15.57
    let record = record_from_form(&form("45", "1.7", "110", "90", "3"));
    assert_eq!(record.bmi, Some(15.57));
    let result = assess(&record);
    assert_eq!(result.alert_labels(), vec!["Underweight BMI"]);
    assert_eq!(result.score, 85);
}

#[test]
fn test_bmi_matches_formula_over_a_grid() {
    for w in [40.0_f64, 55.5, 72.3, 101.0, 150.0] {
        for h in [1.2_f64, 1.55, 1.7, 1.93, 2.1] {
            let expected = (w / (h * h) * 100.0).round() / 100.0;
            assert_eq!(calculate_bmi(w, h), Some(expected));
        }
    }
}

#[test]
fn test_recomputation_is_idempotent() {
    let record = record_from_form(&form("82.4", "1.77", "142", "181", "1.2"));
    let first = assess(&record);

    let recomputed = HealthRecord {
        bmi: calculate_bmi(record.weight, record.height),
        ..record.clone()
    };
    assert_eq!(recomputed.bmi, record.bmi);
    assert_eq!(assess(&recomputed), first);
}

#[test]
fn test_score_never_exceeds_bounds() {
    for systolic in [100, 141, 200] {
        for sugar in [80.0, 181.0, 400.0] {
            for water in [0.0, 1.49, 3.0] {
                for bmi in [None, Some(10.0), Some(22.0), Some(45.0)] {
                    let record = HealthRecord {
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
                    };
                    let result = assess(&record);
                    assert!(result.score <= MAX_SCORE);
                    let deducted: u32 = result.alerts.iter().map(|a| u32::from(a.penalty())).sum();
                    assert_eq!(u32::from(result.score), 100 - deducted);
                }
            }
        }
    }
}
