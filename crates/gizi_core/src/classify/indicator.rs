//! Per-indicator categories with the Indonesian clinical labels used on the
//! assessment form.

use crate::models::ZScoreTriple;
use serde::{Deserialize, Serialize};

pub const SEVERE_Z: f64 = -3.0;
pub const MODERATE_Z: f64 = -2.0;
/// Upper edge of the normal band for weight-based indicators.
pub const WEIGHT_NORMAL_MAX_Z: f64 = 1.0;
/// Upper edge of the at-risk / overweight band for weight-based indicators.
pub const WEIGHT_RISK_MAX_Z: f64 = 2.0;
/// Upper edge of the normal band for height-for-age.
pub const HEIGHT_NORMAL_MAX_Z: f64 = 3.0;

/// BB/U category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightForAgeCategory {
    SeverelyUnderweight,
    Underweight,
    Normal,
    AtRiskOverweight,
    Overweight,
}

impl WeightForAgeCategory {
    pub fn from_z(z: f64) -> Self {
        if z < SEVERE_Z {
            WeightForAgeCategory::SeverelyUnderweight
        } else if z < MODERATE_Z {
            WeightForAgeCategory::Underweight
        } else if z <= WEIGHT_NORMAL_MAX_Z {
            WeightForAgeCategory::Normal
        } else if z <= WEIGHT_RISK_MAX_Z {
            WeightForAgeCategory::AtRiskOverweight
        } else {
            WeightForAgeCategory::Overweight
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeightForAgeCategory::SeverelyUnderweight => "Gizi Buruk",
            WeightForAgeCategory::Underweight => "Gizi Kurang",
            WeightForAgeCategory::Normal => "Gizi Baik",
            WeightForAgeCategory::AtRiskOverweight => "Berisiko Gizi Lebih",
            WeightForAgeCategory::Overweight => "Gizi Lebih",
        }
    }
}

/// TB/U category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeightForAgeCategory {
    SeverelyStunted,
    Stunted,
    Normal,
    Tall,
}

impl HeightForAgeCategory {
    pub fn from_z(z: f64) -> Self {
        if z < SEVERE_Z {
            HeightForAgeCategory::SeverelyStunted
        } else if z < MODERATE_Z {
            HeightForAgeCategory::Stunted
        } else if z <= HEIGHT_NORMAL_MAX_Z {
            HeightForAgeCategory::Normal
        } else {
            HeightForAgeCategory::Tall
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HeightForAgeCategory::SeverelyStunted => "Sangat Pendek",
            HeightForAgeCategory::Stunted => "Pendek",
            HeightForAgeCategory::Normal => "Normal",
            HeightForAgeCategory::Tall => "Tinggi",
        }
    }

    pub fn is_stunted(&self) -> bool {
        matches!(self, HeightForAgeCategory::SeverelyStunted | HeightForAgeCategory::Stunted)
    }
}

/// BB/TB category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightForHeightCategory {
    SeverelyWasted,
    Wasted,
    Normal,
    Overweight,
    Obese,
}

impl WeightForHeightCategory {
    pub fn from_z(z: f64) -> Self {
        if z < SEVERE_Z {
            WeightForHeightCategory::SeverelyWasted
        } else if z < MODERATE_Z {
            WeightForHeightCategory::Wasted
        } else if z <= WEIGHT_NORMAL_MAX_Z {
            WeightForHeightCategory::Normal
        } else if z <= WEIGHT_RISK_MAX_Z {
            WeightForHeightCategory::Overweight
        } else {
            WeightForHeightCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeightForHeightCategory::SeverelyWasted => "Sangat Kurus",
            WeightForHeightCategory::Wasted => "Kurus",
            WeightForHeightCategory::Normal => "Normal",
            WeightForHeightCategory::Overweight => "Gemuk",
            WeightForHeightCategory::Obese => "Obesitas",
        }
    }
}

/// The three categories of one child, side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorCategories {
    pub weight_for_age: WeightForAgeCategory,
    pub height_for_age: HeightForAgeCategory,
    pub weight_for_height: WeightForHeightCategory,
}

impl IndicatorCategories {
    pub fn from_scores(weight_for_age: f64, height_for_age: f64, weight_for_height: f64) -> Self {
        Self {
            weight_for_age: WeightForAgeCategory::from_z(weight_for_age),
            height_for_age: HeightForAgeCategory::from_z(height_for_age),
            weight_for_height: WeightForHeightCategory::from_z(weight_for_height),
        }
    }

    pub fn from_triple(z: &ZScoreTriple) -> Self {
        Self::from_scores(z.weight_for_age, z.height_for_age, z.weight_for_height)
    }
}
