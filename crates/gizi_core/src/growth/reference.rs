//! Growth Standard Table
//!
//! Reference median and spread per (age month, sex, indicator), built from
//! the curves in [`super::constants`] or from externally supplied
//! references.

use super::constants::{self, GrowthBand, SexCurves, BAND_JUMP_TOLERANCE};
use crate::error::{GiziError, Result};
use crate::models::{Sex, MAX_AGE_MONTHS};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

const AGE_SLOTS: usize = MAX_AGE_MONTHS as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Indicator {
    /// BB/U
    #[serde(rename = "BB/U", alias = "weight_for_age")]
    WeightForAge,
    /// TB/U
    #[serde(rename = "TB/U", alias = "height_for_age")]
    HeightForAge,
    /// BB/TB
    #[serde(rename = "BB/TB", alias = "weight_for_height")]
    WeightForHeight,
}

impl Indicator {
    pub const ALL: [Indicator; 3] =
        [Indicator::WeightForAge, Indicator::HeightForAge, Indicator::WeightForHeight];

    pub fn code(&self) -> &'static str {
        match self {
            Indicator::WeightForAge => "BB/U",
            Indicator::HeightForAge => "TB/U",
            Indicator::WeightForHeight => "BB/TB",
        }
    }

    fn index(&self) -> usize {
        match self {
            Indicator::WeightForAge => 0,
            Indicator::HeightForAge => 1,
            Indicator::WeightForHeight => 2,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Indicator {
    type Err = GiziError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bb/u" | "weight_for_age" | "wfa" => Ok(Indicator::WeightForAge),
            "tb/u" | "height_for_age" | "hfa" => Ok(Indicator::HeightForAge),
            "bb/tb" | "weight_for_height" | "wfh" => Ok(Indicator::WeightForHeight),
            other => Err(GiziError::domain(format!("unknown indicator '{}'", other))),
        }
    }
}

/// Which built-in curve set a table is constructed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableVariant {
    /// Five age bands with distinct coefficients (field-survey generator).
    Banded,
    /// One straight line per sex (training generator, assessment form).
    Linear,
}

impl TableVariant {
    /// `GIZI_TABLE` = `banded` | `linear`; anything else falls back to linear.
    pub fn from_env_or_default() -> Self {
        env::var("GIZI_TABLE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(TableVariant::Linear)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableVariant::Banded => "banded",
            TableVariant::Linear => "linear",
        }
    }

    fn curves(&self, indicator: Indicator) -> SexCurves {
        match (self, indicator) {
            (TableVariant::Banded, Indicator::WeightForAge) => constants::banded::WEIGHT_FOR_AGE,
            (TableVariant::Banded, Indicator::HeightForAge) => constants::banded::HEIGHT_FOR_AGE,
            (TableVariant::Linear, Indicator::WeightForAge) => constants::linear::WEIGHT_FOR_AGE,
            (TableVariant::Linear, Indicator::HeightForAge) => constants::linear::HEIGHT_FOR_AGE,
            (_, Indicator::WeightForHeight) => constants::weight_for_height::CURVES,
        }
    }
}

impl fmt::Display for TableVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TableVariant {
    type Err = GiziError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "banded" => Ok(TableVariant::Banded),
            "linear" => Ok(TableVariant::Linear),
            other => Err(GiziError::config(format!("unknown table variant '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthReference {
    pub age_months: u32,
    pub sex: Sex,
    pub indicator: Indicator,
    pub median: f64,
    pub spread: f64,
}

impl GrowthReference {
    /// Value at `k` standard deviations from the median (−3SD … +3SD lines).
    pub fn sd_line(&self, k: i32) -> f64 {
        self.median + k as f64 * self.spread
    }

    /// The seven reference lines from −3SD to +3SD.
    pub fn sd_lines(&self) -> [f64; 7] {
        [-3, -2, -1, 0, 1, 2, 3].map(|k| self.sd_line(k))
    }
}

/// Discontinuity of a banded curve at a band edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandEdgeJump {
    /// Last month of the earlier band.
    pub edge_month: u32,
    /// Earlier band's median at the edge.
    pub median_before: f64,
    /// Later band's line evaluated at the same month.
    pub median_after: f64,
    pub relative_jump: f64,
    pub flagged: bool,
}

#[derive(Debug, Clone)]
pub struct GrowthStandardTable {
    variant: Option<TableVariant>,
    entries: Vec<GrowthReference>,
}

fn slot(age_months: u32, sex: Sex, indicator: Indicator) -> usize {
    (age_months as usize * 2 + sex.index()) * 3 + indicator.index()
}

fn band_for(bands: &[GrowthBand], month: u32) -> Option<&GrowthBand> {
    bands.iter().find(|b| month <= b.last_month)
}

impl GrowthStandardTable {
    pub fn new(variant: TableVariant) -> Self {
        let mut entries = Vec::with_capacity(AGE_SLOTS * 6);
        for age_months in 0..=MAX_AGE_MONTHS {
            for sex in Sex::ALL {
                for indicator in Indicator::ALL {
                    let curves = variant.curves(indicator);
                    let bands = match sex {
                        Sex::Male => curves.male,
                        Sex::Female => curves.female,
                    };
                    // Every curve ends at MAX_AGE_MONTHS.
                    let band = band_for(bands, age_months).unwrap_or(&bands[bands.len() - 1]);
                    entries.push(GrowthReference {
                        age_months,
                        sex,
                        indicator,
                        median: band.median_at(age_months),
                        spread: band.spread_at(age_months),
                    });
                }
            }
        }
        Self { variant: Some(variant), entries }
    }

    pub fn banded() -> Self {
        Self::new(TableVariant::Banded)
    }

    pub fn linear() -> Self {
        Self::new(TableVariant::Linear)
    }

    /// Build from externally supplied references, e.g. medians derived from
    /// the official WHO tables. Every (age, sex, indicator) must appear once.
    pub fn from_references(references: Vec<GrowthReference>) -> Result<Self> {
        let mut slots: Vec<Option<GrowthReference>> = vec![None; AGE_SLOTS * 6];

        for reference in references {
            if reference.age_months > MAX_AGE_MONTHS {
                return Err(GiziError::domain(format!(
                    "reference age {} months outside 0..={}",
                    reference.age_months, MAX_AGE_MONTHS
                )));
            }
            if !(reference.spread.is_finite() && reference.spread > 0.0) {
                return Err(GiziError::InvalidSpread { spread: reference.spread });
            }
            if !(reference.median.is_finite() && reference.median > 0.0) {
                return Err(GiziError::domain(format!(
                    "non-positive median {} for {} {} at {} months",
                    reference.median, reference.sex, reference.indicator, reference.age_months
                )));
            }
            let idx = slot(reference.age_months, reference.sex, reference.indicator);
            if slots[idx].is_some() {
                return Err(GiziError::domain(format!(
                    "duplicate reference for {} {} at {} months",
                    reference.sex, reference.indicator, reference.age_months
                )));
            }
            slots[idx] = Some(reference);
        }

        let mut entries = Vec::with_capacity(slots.len());
        for (idx, entry) in slots.into_iter().enumerate() {
            match entry {
                Some(reference) => entries.push(reference),
                None => {
                    let age = idx / 6;
                    let sex = Sex::ALL[(idx / 3) % 2];
                    let indicator = Indicator::ALL[idx % 3];
                    return Err(GiziError::domain(format!(
                        "missing reference for {} {} at {} months",
                        sex, indicator, age
                    )));
                }
            }
        }

        Ok(Self { variant: None, entries })
    }

    /// Built-in variant, or `None` for tables loaded from references.
    pub fn variant(&self) -> Option<TableVariant> {
        self.variant
    }

    pub fn lookup(&self, age_months: u32, sex: Sex, indicator: Indicator) -> Result<GrowthReference> {
        if age_months > MAX_AGE_MONTHS {
            return Err(GiziError::domain(format!(
                "age {} months outside supported range 0..={}",
                age_months, MAX_AGE_MONTHS
            )));
        }
        Ok(self.entries[slot(age_months, sex, indicator)])
    }

    /// All references in (age, sex, indicator) order.
    pub fn references(&self) -> &[GrowthReference] {
        &self.entries
    }

    /// Medians of one curve, indexed by age month.
    pub fn medians(&self, sex: Sex, indicator: Indicator) -> Vec<f64> {
        (0..=MAX_AGE_MONTHS)
            .map(|age| self.entries[slot(age, sex, indicator)].median)
            .collect()
    }

    /// Months where the median decreases compared with the previous month.
    pub fn median_decreases(&self, sex: Sex, indicator: Indicator) -> Vec<u32> {
        let medians = self.medians(sex, indicator);
        medians
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[1] < w[0])
            .map(|(i, _)| i as u32 + 1)
            .collect()
    }

    /// Jumps at the band edges of a built-in curve. Empty for single-band
    /// curves and for tables loaded from references.
    pub fn band_edge_jumps(&self, sex: Sex, indicator: Indicator) -> Vec<BandEdgeJump> {
        let Some(variant) = self.variant else {
            return Vec::new();
        };
        let curves = variant.curves(indicator);
        let bands = match sex {
            Sex::Male => curves.male,
            Sex::Female => curves.female,
        };

        bands
            .windows(2)
            .map(|pair| {
                let edge_month = pair[0].last_month;
                let median_before = pair[0].median_at(edge_month);
                let median_after = pair[1].median_at(edge_month);
                let relative_jump = (median_after - median_before).abs() / median_before;
                BandEdgeJump {
                    edge_month,
                    median_before,
                    median_after,
                    relative_jump,
                    flagged: relative_jump > BAND_JUMP_TOLERANCE,
                }
            })
            .collect()
    }
}
