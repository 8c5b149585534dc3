//! Z-score calculator.
//!
//! `z = (observed − median) / spread`. Every classification downstream
//! depends on the sign convention here: a child lighter than the median has
//! a negative weight-for-age score.

use super::reference::{GrowthStandardTable, Indicator};
use crate::error::{GiziError, Result};
use crate::models::{Measurement, Sex, ZScoreTriple};
use serde::{Deserialize, Serialize};

pub fn score(observed: f64, median: f64, spread: f64) -> Result<f64> {
    if !(spread.is_finite() && spread > 0.0) {
        return Err(GiziError::InvalidSpread { spread });
    }
    Ok((observed - median) / spread)
}

/// Inverse of [`score`]: the raw value that sits `z` spreads from the median.
pub fn raw_value(z: f64, median: f64, spread: f64) -> Result<f64> {
    if !(spread.is_finite() && spread > 0.0) {
        return Err(GiziError::InvalidSpread { spread });
    }
    Ok(median + z * spread)
}

/// How the weight-for-height score is obtained from raw weight and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightForHeightMethod {
    /// Weight against the table's age-indexed weight-for-height row.
    AgeIndexed,
    /// Weight against the weight-for-age median scaled by observed height
    /// over the height-for-age median, with the weight-for-age spread.
    HeightProportional,
}

/// Scores measurements against one growth table.
#[derive(Debug, Clone, Copy)]
pub struct ZScoreCalculator<'t> {
    table: &'t GrowthStandardTable,
}

impl<'t> ZScoreCalculator<'t> {
    pub fn new(table: &'t GrowthStandardTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t GrowthStandardTable {
        self.table
    }

    pub fn weight_for_age(&self, age_months: u32, sex: Sex, weight_kg: f64) -> Result<f64> {
        let r = self.table.lookup(age_months, sex, Indicator::WeightForAge)?;
        score(weight_kg, r.median, r.spread)
    }

    pub fn height_for_age(&self, age_months: u32, sex: Sex, height_cm: f64) -> Result<f64> {
        let r = self.table.lookup(age_months, sex, Indicator::HeightForAge)?;
        score(height_cm, r.median, r.spread)
    }

    pub fn weight_for_height(
        &self,
        age_months: u32,
        sex: Sex,
        weight_kg: f64,
        height_cm: f64,
        method: WeightForHeightMethod,
    ) -> Result<f64> {
        match method {
            WeightForHeightMethod::AgeIndexed => {
                let r = self.table.lookup(age_months, sex, Indicator::WeightForHeight)?;
                score(weight_kg, r.median, r.spread)
            }
            WeightForHeightMethod::HeightProportional => {
                let weight = self.table.lookup(age_months, sex, Indicator::WeightForAge)?;
                let height = self.table.lookup(age_months, sex, Indicator::HeightForAge)?;
                let expected = weight.median * (height_cm / height.median);
                score(weight_kg, expected, weight.spread)
            }
        }
    }

    pub fn score_measurement(
        &self,
        measurement: &Measurement,
        method: WeightForHeightMethod,
    ) -> Result<ZScoreTriple> {
        let Measurement { sex, age_months, weight_kg, height_cm, .. } = *measurement;
        Ok(ZScoreTriple {
            weight_for_age: self.weight_for_age(age_months, sex, weight_kg)?,
            height_for_age: self.height_for_age(age_months, sex, height_cm)?,
            weight_for_height: self.weight_for_height(age_months, sex, weight_kg, height_cm, method)?,
        })
    }
}
