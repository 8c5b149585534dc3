//! Status classification.
//!
//! Two rule sets with different clinical priorities sit behind
//! [`StatusClassifier`]. They disagree on some inputs (severe stunting is
//! "Gizi Buruk" for one and "Stunting" for the other), so callers pick one
//! explicitly through [`RuleSet`].
//!
//! | Rule set | Priority | Vocabulary |
//! |----------|----------|------------|
//! | `wasting_priority` | BB/TB, then TB/U, then BB/U, then overweight | no `Stunting` |
//! | `composite` | severe, moderate, stunting, overweight | no `Obesitas` |

pub mod composite;
pub mod indicator;
pub mod recommendation;
pub mod wasting_priority;

pub use composite::CompositeRules;
pub use indicator::{
    HeightForAgeCategory, IndicatorCategories, WeightForAgeCategory, WeightForHeightCategory,
};
pub use recommendation::recommendations;
pub use wasting_priority::{WastingFinding, WastingPriorityRules};

use crate::error::{GiziError, Result};
use crate::models::{NutritionStatus, ZScoreTriple};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Maps a Z-score triple to one overall status. Implementations are pure.
pub trait StatusClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Closed set of statuses this classifier can return.
    fn vocabulary(&self) -> &'static [NutritionStatus];

    fn classify(&self, weight_for_age: f64, height_for_age: f64, weight_for_height: f64) -> NutritionStatus;

    fn classify_triple(&self, z: &ZScoreTriple) -> NutritionStatus {
        self.classify(z.weight_for_age, z.height_for_age, z.weight_for_height)
    }
}

static WASTING_PRIORITY: WastingPriorityRules = WastingPriorityRules;
static COMPOSITE: CompositeRules = CompositeRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    WastingPriority,
    Composite,
}

impl RuleSet {
    pub const ALL: [RuleSet; 2] = [RuleSet::WastingPriority, RuleSet::Composite];

    pub fn classifier(&self) -> &'static dyn StatusClassifier {
        match self {
            RuleSet::WastingPriority => &WASTING_PRIORITY,
            RuleSet::Composite => &COMPOSITE,
        }
    }

    /// `GIZI_RULE_SET` = `wasting_priority` | `composite`; defaults to composite.
    pub fn from_env_or_default() -> Self {
        env::var("GIZI_RULE_SET")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(RuleSet::Composite)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.classifier().name())
    }
}

impl FromStr for RuleSet {
    type Err = GiziError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "wasting_priority" | "wasting" | "a" => Ok(RuleSet::WastingPriority),
            "composite" | "b" => Ok(RuleSet::Composite),
            other => Err(GiziError::config(format!("unknown rule set '{}'", other))),
        }
    }
}
