//! Growth reference tables and Z-score computation.

pub mod constants;
pub mod reference;
pub mod zscore;

pub use reference::{BandEdgeJump, GrowthReference, GrowthStandardTable, Indicator, TableVariant};
pub use zscore::{raw_value, score, WeightForHeightMethod, ZScoreCalculator};
