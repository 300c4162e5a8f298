use serde::{Deserialize, Serialize};

/// BMI below this value is considered underweight
pub const UNDERWEIGHT_BELOW: f64 = 18.5;

/// BMI at or above this value is considered overweight
pub const OVERWEIGHT_FROM: f64 = 25.0;

/// Compute body mass index from weight (kg) and height (m), rounded to 2 decimals.
///
/// Returns `None` when height is not a positive finite number, when weight is
/// not finite, or when the quotient overflows. Callers store whatever this returns; a client-supplied BMI is never used.
pub fn calculate_bmi(weight: f64, height: f64) -> Option<f64> {
    if !weight.is_finite() || !height.is_finite() || height <= 0.0 {
        return None;
    }
    let bmi = (weight / (height * height) * 100.0).round() / 100.0;
    bmi.is_finite().then_some(bmi)
}

/// Coarse BMI band used by the scoring rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
}

impl BmiCategory {
    pub fn of(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_BELOW {
            BmiCategory::Underweight
        } else if bmi >= OVERWEIGHT_FROM {
            BmiCategory::Overweight
        } else {
            BmiCategory::Normal
        }
    }
}
