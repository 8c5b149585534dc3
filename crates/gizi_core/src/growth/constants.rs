//! Reference coefficients for the simplified WHO growth curves.
//!
//! Every number that shapes a reference median or spread lives here. The
//! curves are linear approximations of the WHO Child Growth Standards, not
//! the official LMS tables; replacing them with real tables only touches
//! this module (or bypasses it via `GrowthStandardTable::from_references`).
//!
//! A curve is a list of [`GrowthBand`]s ordered by `last_month`. Inside a
//! band the value is `intercept + slope * (month - anchor_month)`.

/// `intercept + slope * t`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub intercept: f64,
    pub slope: f64,
}

impl Line {
    pub const fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    pub const fn flat(value: f64) -> Self {
        Self { intercept: value, slope: 0.0 }
    }

    pub fn at(&self, t: f64) -> f64 {
        self.intercept + self.slope * t
    }
}

/// One age band of a reference curve, covering `(previous.last_month, last_month]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthBand {
    pub last_month: u32,
    pub anchor_month: u32,
    pub median: Line,
    pub spread: Line,
}

impl GrowthBand {
    pub const fn new(last_month: u32, anchor_month: u32, median: Line, spread: Line) -> Self {
        Self { last_month, anchor_month, median, spread }
    }

    pub fn median_at(&self, month: u32) -> f64 {
        self.median.at(month as f64 - self.anchor_month as f64)
    }

    pub fn spread_at(&self, month: u32) -> f64 {
        self.spread.at(month as f64 - self.anchor_month as f64)
    }
}

/// Per-sex curve pair for one indicator.
#[derive(Debug, Clone, Copy)]
pub struct SexCurves {
    pub male: &'static [GrowthBand],
    pub female: &'static [GrowthBand],
}

/// Weight-for-height median grows with age only (15 kg + 0.05 kg/month,
/// spread 1.2 kg), identical for both sexes. True WHO weight-for-height is
/// indexed by height; the age-indexed form is kept because generated class
/// balance depends on it.
pub mod weight_for_height {
    use super::{GrowthBand, Line, SexCurves};

    pub const MEDIAN_KG_AT_BIRTH: f64 = 15.0;
    pub const MEDIAN_KG_PER_MONTH: f64 = 0.05;
    pub const SPREAD_KG: f64 = 1.2;

    pub const CURVE: [GrowthBand; 1] = [GrowthBand::new(
        60,
        0,
        Line::new(MEDIAN_KG_AT_BIRTH, MEDIAN_KG_PER_MONTH),
        Line::flat(SPREAD_KG),
    )];

    pub const CURVES: SexCurves = SexCurves { male: &CURVE, female: &CURVE };
}

/// Single-band curves used by the training generator and the assessment form.
pub mod linear {
    use super::{GrowthBand, Line, SexCurves};

    pub const WEIGHT_KG_PER_MONTH_MALE: f64 = 0.15;
    pub const WEIGHT_KG_PER_MONTH_FEMALE: f64 = 0.14;
    pub const HEIGHT_CM_PER_MONTH_MALE: f64 = 1.1;
    pub const HEIGHT_CM_PER_MONTH_FEMALE: f64 = 1.0;

    pub const WEIGHT_FOR_AGE_MALE: [GrowthBand; 1] = [GrowthBand::new(
        60,
        0,
        Line::new(3.3, WEIGHT_KG_PER_MONTH_MALE),
        Line::new(0.4, 0.01),
    )];
    pub const WEIGHT_FOR_AGE_FEMALE: [GrowthBand; 1] = [GrowthBand::new(
        60,
        0,
        Line::new(3.2, WEIGHT_KG_PER_MONTH_FEMALE),
        Line::new(0.4, 0.01),
    )];
    pub const HEIGHT_FOR_AGE_MALE: [GrowthBand; 1] = [GrowthBand::new(
        60,
        0,
        Line::new(49.9, HEIGHT_CM_PER_MONTH_MALE),
        Line::new(1.9, 0.02),
    )];
    pub const HEIGHT_FOR_AGE_FEMALE: [GrowthBand; 1] = [GrowthBand::new(
        60,
        0,
        Line::new(49.1, HEIGHT_CM_PER_MONTH_FEMALE),
        Line::new(1.9, 0.02),
    )];

    pub const WEIGHT_FOR_AGE: SexCurves =
        SexCurves { male: &WEIGHT_FOR_AGE_MALE, female: &WEIGHT_FOR_AGE_FEMALE };
    pub const HEIGHT_FOR_AGE: SexCurves =
        SexCurves { male: &HEIGHT_FOR_AGE_MALE, female: &HEIGHT_FOR_AGE_FEMALE };
}

/// Piecewise curves used by the field-survey generator: birth, (0,12],
/// (12,24], (24,36] and (36,60] months.
pub mod banded {
    use super::{GrowthBand, Line, SexCurves};

    pub const WEIGHT_FOR_AGE_MALE: [GrowthBand; 5] = [
        GrowthBand::new(0, 0, Line::flat(3.3), Line::flat(0.4)),
        GrowthBand::new(12, 0, Line::new(3.3, 0.6), Line::new(0.5, 0.05)),
        GrowthBand::new(24, 12, Line::new(10.5, 0.25), Line::flat(1.2)),
        GrowthBand::new(36, 24, Line::new(13.5, 0.22), Line::flat(1.4)),
        GrowthBand::new(60, 36, Line::new(16.0, 0.18), Line::flat(1.6)),
    ];
    pub const WEIGHT_FOR_AGE_FEMALE: [GrowthBand; 5] = [
        GrowthBand::new(0, 0, Line::flat(3.2), Line::flat(0.4)),
        GrowthBand::new(12, 0, Line::new(3.2, 0.55), Line::new(0.5, 0.05)),
        GrowthBand::new(24, 12, Line::new(9.8, 0.23), Line::flat(1.2)),
        GrowthBand::new(36, 24, Line::new(12.8, 0.20), Line::flat(1.4)),
        GrowthBand::new(60, 36, Line::new(15.2, 0.17), Line::flat(1.6)),
    ];
    pub const HEIGHT_FOR_AGE_MALE: [GrowthBand; 5] = [
        GrowthBand::new(0, 0, Line::flat(49.9), Line::flat(1.9)),
        GrowthBand::new(12, 0, Line::new(49.9, 2.8), Line::new(2.0, 0.1)),
        GrowthBand::new(24, 12, Line::new(77.0, 1.2), Line::flat(2.8)),
        GrowthBand::new(36, 24, Line::new(91.0, 1.0), Line::flat(3.0)),
        GrowthBand::new(60, 36, Line::new(103.0, 0.85), Line::flat(3.2)),
    ];
    pub const HEIGHT_FOR_AGE_FEMALE: [GrowthBand; 5] = [
        GrowthBand::new(0, 0, Line::flat(49.1), Line::flat(1.9)),
        GrowthBand::new(12, 0, Line::new(49.1, 2.6), Line::new(2.0, 0.1)),
        GrowthBand::new(24, 12, Line::new(75.0, 1.1), Line::flat(2.8)),
        GrowthBand::new(36, 24, Line::new(89.0, 0.95), Line::flat(3.0)),
        GrowthBand::new(60, 36, Line::new(101.0, 0.80), Line::flat(3.2)),
    ];

    pub const WEIGHT_FOR_AGE: SexCurves =
        SexCurves { male: &WEIGHT_FOR_AGE_MALE, female: &WEIGHT_FOR_AGE_FEMALE };
    pub const HEIGHT_FOR_AGE: SexCurves =
        SexCurves { male: &HEIGHT_FOR_AGE_MALE, female: &HEIGHT_FOR_AGE_FEMALE };
}

/// Relative median jump at a band edge above which the edge is flagged.
pub const BAND_JUMP_TOLERANCE: f64 = 0.05;
