//! Category-composition rules.
//!
//! Each indicator is categorised on its own, then the categories are
//! resolved by priority: severe deficit, moderate deficit, stunting,
//! overweight, normal.

use super::indicator::{IndicatorCategories, WeightForAgeCategory, WeightForHeightCategory};
use super::StatusClassifier;
use crate::models::NutritionStatus;

#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeRules;

const VOCABULARY: [NutritionStatus; 5] = [
    NutritionStatus::GiziBaik,
    NutritionStatus::GiziKurang,
    NutritionStatus::GiziBuruk,
    NutritionStatus::Stunting,
    NutritionStatus::GiziLebih,
];

impl CompositeRules {
    pub fn assess_indicators(
        &self,
        weight_for_age: f64,
        height_for_age: f64,
        weight_for_height: f64,
    ) -> IndicatorCategories {
        IndicatorCategories::from_scores(weight_for_age, height_for_age, weight_for_height)
    }

    pub fn resolve(&self, categories: &IndicatorCategories) -> NutritionStatus {
        let wfa = categories.weight_for_age;
        let hfa = categories.height_for_age;
        let wfh = categories.weight_for_height;

        if wfa == WeightForAgeCategory::SeverelyUnderweight
            || wfh == WeightForHeightCategory::SeverelyWasted
        {
            NutritionStatus::GiziBuruk
        } else if wfa == WeightForAgeCategory::Underweight || wfh == WeightForHeightCategory::Wasted {
            NutritionStatus::GiziKurang
        } else if hfa.is_stunted() {
            NutritionStatus::Stunting
        } else if wfa == WeightForAgeCategory::Overweight
            || matches!(wfh, WeightForHeightCategory::Overweight | WeightForHeightCategory::Obese)
        {
            NutritionStatus::GiziLebih
        } else {
            NutritionStatus::GiziBaik
        }
    }
}

impl StatusClassifier for CompositeRules {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn vocabulary(&self) -> &'static [NutritionStatus] {
        &VOCABULARY
    }

    fn classify(&self, weight_for_age: f64, height_for_age: f64, weight_for_height: f64) -> NutritionStatus {
        let categories = self.assess_indicators(weight_for_age, height_for_age, weight_for_height);
        self.resolve(&categories)
    }
}
