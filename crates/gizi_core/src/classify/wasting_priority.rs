//! Wasting-first rules.
//!
//! Weight-for-height is checked before height-for-age, which is checked
//! before weight-for-age; overweight is only considered once no deficit
//! applies. The first matching rule wins.

use super::indicator::{MODERATE_Z, SEVERE_Z};
use super::StatusClassifier;
use crate::models::NutritionStatus;
use serde::{Deserialize, Serialize};

pub const OBESE_Z: f64 = 3.0;
pub const OVERWEIGHT_Z: f64 = 2.0;

/// Which rule fired, in rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WastingFinding {
    SeverelyWasted,
    Wasted,
    SeverelyStunted,
    Stunted,
    SeverelyUnderweight,
    Underweight,
    Obese,
    Overweight,
    Normal,
}

impl WastingFinding {
    pub fn status(&self) -> NutritionStatus {
        match self {
            WastingFinding::SeverelyWasted
            | WastingFinding::SeverelyStunted
            | WastingFinding::SeverelyUnderweight => NutritionStatus::GiziBuruk,
            WastingFinding::Wasted | WastingFinding::Stunted | WastingFinding::Underweight => {
                NutritionStatus::GiziKurang
            }
            WastingFinding::Obese => NutritionStatus::Obesitas,
            WastingFinding::Overweight => NutritionStatus::GiziLebih,
            WastingFinding::Normal => NutritionStatus::GiziBaik,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WastingPriorityRules;

const VOCABULARY: [NutritionStatus; 5] = [
    NutritionStatus::GiziBaik,
    NutritionStatus::GiziKurang,
    NutritionStatus::GiziBuruk,
    NutritionStatus::GiziLebih,
    NutritionStatus::Obesitas,
];

impl WastingPriorityRules {
    pub fn finding(&self, weight_for_age: f64, height_for_age: f64, weight_for_height: f64) -> WastingFinding {
        if weight_for_height < SEVERE_Z {
            return WastingFinding::SeverelyWasted;
        }
        if weight_for_height < MODERATE_Z {
            return WastingFinding::Wasted;
        }

        if height_for_age < SEVERE_Z {
            return WastingFinding::SeverelyStunted;
        }
        if height_for_age < MODERATE_Z {
            return WastingFinding::Stunted;
        }

        if weight_for_age < SEVERE_Z {
            return WastingFinding::SeverelyUnderweight;
        }
        if weight_for_age < MODERATE_Z {
            return WastingFinding::Underweight;
        }

        if weight_for_height > OBESE_Z {
            return WastingFinding::Obese;
        }
        if weight_for_height > OVERWEIGHT_Z {
            return WastingFinding::Overweight;
        }

        WastingFinding::Normal
    }
}

impl StatusClassifier for WastingPriorityRules {
    fn name(&self) -> &'static str {
        "wasting_priority"
    }

    fn vocabulary(&self) -> &'static [NutritionStatus] {
        &VOCABULARY
    }

    fn classify(&self, weight_for_age: f64, height_for_age: f64, weight_for_height: f64) -> NutritionStatus {
        self.finding(weight_for_age, height_for_age, weight_for_height).status()
    }
}
