use super::measurement::Measurement;
use super::sex::Sex;
use super::status::NutritionStatus;
use crate::growth::Indicator;
use serde::{Deserialize, Serialize};

/// Z-scores outside ±5 SD are treated as data-entry or generation errors.
pub const IMPLAUSIBLE_Z: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScoreTriple {
    pub weight_for_age: f64,
    pub height_for_age: f64,
    pub weight_for_height: f64,
}

impl ZScoreTriple {
    pub fn new(weight_for_age: f64, height_for_age: f64, weight_for_height: f64) -> Self {
        Self { weight_for_age, height_for_age, weight_for_height }
    }

    pub fn get(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::WeightForAge => self.weight_for_age,
            Indicator::HeightForAge => self.height_for_age,
            Indicator::WeightForHeight => self.weight_for_height,
        }
    }

    /// Indicators whose score is beyond ±5 SD (or not a number).
    pub fn implausible_indicators(&self) -> Vec<Indicator> {
        Indicator::ALL
            .into_iter()
            .filter(|&i| {
                let z = self.get(i);
                !z.is_finite() || z.abs() > IMPLAUSIBLE_Z
            })
            .collect()
    }

    pub fn is_plausible(&self) -> bool {
        self.implausible_indicators().is_empty()
    }
}

/// One generated (or assessed) child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub measurement: Measurement,
    pub z_scores: ZScoreTriple,
    /// Status re-derived from the Z-scores.
    pub status: NutritionStatus,
    /// Status the generator aimed for. Audit only.
    pub target_status: Option<NutritionStatus>,
}

impl Record {
    /// True when the generator aimed for one status and the rules derived another.
    pub fn is_mismatch(&self) -> bool {
        matches!(self.target_status, Some(target) if target != self.status)
    }

    pub fn to_handoff(&self) -> HandoffRow {
        HandoffRow {
            sex: self.measurement.sex,
            age_months: self.measurement.age_months,
            weight_kg: self.measurement.weight_kg,
            height_cm: self.measurement.height_cm,
            arm_circumference_cm: self.measurement.arm_circumference_cm,
            z_weight_age: self.z_scores.weight_for_age,
            z_height_age: self.z_scores.height_for_age,
            z_weight_height: self.z_scores.weight_for_height,
            status: self.status,
        }
    }
}

/// Flat row handed to the external training collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffRow {
    pub sex: Sex,
    pub age_months: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub arm_circumference_cm: Option<f64>,
    pub z_weight_age: f64,
    pub z_height_age: f64,
    pub z_weight_height: f64,
    pub status: NutritionStatus,
}
