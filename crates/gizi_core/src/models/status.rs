//! Overall nutritional status labels.
//!
//! The workspace uses a single closed set. Each classifier emits a subset of
//! it (see [`crate::classify::StatusClassifier::vocabulary`]); the wasting
//! priority rules never emit `Stunting`, the composite rules never emit
//! `Obesitas`.

use crate::error::{GiziError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Overall status. Declaration order is the generation order used by the
/// dataset assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NutritionStatus {
    /// Normal / well nourished.
    #[serde(rename = "Gizi Baik", alias = "Normal", alias = "GiziBaik")]
    GiziBaik,
    /// Undernourished (wasted, stunted or underweight below −2 SD).
    #[serde(rename = "Gizi Kurang", alias = "GiziKurang")]
    GiziKurang,
    /// Severely malnourished (below −3 SD).
    #[serde(rename = "Gizi Buruk", alias = "GiziBuruk")]
    GiziBuruk,
    #[serde(rename = "Stunting")]
    Stunting,
    /// Overweight.
    #[serde(rename = "Gizi Lebih", alias = "GiziLebih")]
    GiziLebih,
    #[serde(rename = "Obesitas")]
    Obesitas,
}

impl NutritionStatus {
    pub const ALL: [NutritionStatus; 6] = [
        NutritionStatus::GiziBaik,
        NutritionStatus::GiziKurang,
        NutritionStatus::GiziBuruk,
        NutritionStatus::Stunting,
        NutritionStatus::GiziLebih,
        NutritionStatus::Obesitas,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NutritionStatus::GiziBaik => "Gizi Baik",
            NutritionStatus::GiziKurang => "Gizi Kurang",
            NutritionStatus::GiziBuruk => "Gizi Buruk",
            NutritionStatus::Stunting => "Stunting",
            NutritionStatus::GiziLebih => "Gizi Lebih",
            NutritionStatus::Obesitas => "Obesitas",
        }
    }

    /// Severe tier (below −3 SD on some indicator).
    pub fn is_severe(&self) -> bool {
        matches!(self, NutritionStatus::GiziBuruk)
    }

    /// Any status other than normal.
    pub fn needs_attention(&self) -> bool {
        !matches!(self, NutritionStatus::GiziBaik)
    }
}

impl fmt::Display for NutritionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NutritionStatus {
    type Err = GiziError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String =
            s.chars().filter(|c| !c.is_whitespace() && *c != '_').collect::<String>().to_lowercase();
        match normalized.as_str() {
            "gizibaik" | "normal" => Ok(NutritionStatus::GiziBaik),
            "gizikurang" => Ok(NutritionStatus::GiziKurang),
            "giziburuk" => Ok(NutritionStatus::GiziBuruk),
            "stunting" => Ok(NutritionStatus::Stunting),
            "gizilebih" => Ok(NutritionStatus::GiziLebih),
            "obesitas" => Ok(NutritionStatus::Obesitas),
            _ => Err(GiziError::domain(format!("unknown nutrition status '{}'", s))),
        }
    }
}
