//! Assessment of a measured child.
//!
//! Scores a measurement against a growth table, classifies it with the
//! selected rule set and attaches per-indicator categories and follow-up
//! advice. Defaults mirror the intake form: linear table, age-indexed
//! weight-for-height, composite rules.

use crate::classify::{recommendations, IndicatorCategories, RuleSet};
use crate::error::Result;
use crate::growth::{GrowthStandardTable, Indicator, TableVariant, WeightForHeightMethod, ZScoreCalculator};
use crate::models::{Measurement, NutritionStatus, ZScoreTriple};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentOptions {
    pub rule_set: RuleSet,
    pub weight_for_height: WeightForHeightMethod,
}

impl Default for AssessmentOptions {
    fn default() -> Self {
        Self { rule_set: RuleSet::Composite, weight_for_height: WeightForHeightMethod::AgeIndexed }
    }
}

impl AssessmentOptions {
    /// Rule set from `GIZI_RULE_SET`; weight-for-height stays age-indexed.
    pub fn from_env_or_default() -> Self {
        Self { rule_set: RuleSet::from_env_or_default(), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub measurement: Measurement,
    pub table: Option<TableVariant>,
    pub rule_set: RuleSet,
    pub z_scores: ZScoreTriple,
    pub indicators: IndicatorCategories,
    pub status: NutritionStatus,
    pub recommendations: Vec<String>,
    /// Indicators beyond ±5 SD; usually a data-entry error.
    pub implausible: Vec<Indicator>,
}

impl Assessment {
    pub fn needs_attention(&self) -> bool {
        self.status.needs_attention()
    }
}

pub fn assess(
    measurement: &Measurement,
    table: &GrowthStandardTable,
    options: AssessmentOptions,
) -> Result<Assessment> {
    measurement.validate()?;
    let z_scores = ZScoreCalculator::new(table).score_measurement(measurement, options.weight_for_height)?;
    let status = options.rule_set.classifier().classify_triple(&z_scores);
    let implausible = z_scores.implausible_indicators();
    if !implausible.is_empty() {
        warn!(?implausible, age_months = measurement.age_months, "assessment has implausible z-scores");
    }

    Ok(Assessment {
        measurement: *measurement,
        table: table.variant(),
        rule_set: options.rule_set,
        z_scores,
        indicators: IndicatorCategories::from_triple(&z_scores),
        status,
        recommendations: recommendations(status).iter().map(|s| s.to_string()).collect(),
        implausible,
    })
}
