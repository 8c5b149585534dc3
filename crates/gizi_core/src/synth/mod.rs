//! Synthetic dataset generation.
//!
//! - [`profile`]: the two generator profiles and their Z-score draw tables
//! - [`generator`]: one record per call, status re-derived from raw values
//! - [`assembler`]: class-proportioned, shuffled datasets from a single seed

pub mod assembler;
pub mod generator;
pub mod profile;

pub use assembler::{
    AssemblyReport, ClassProportions, Dataset, DatasetAssembler, QualitySummary,
    MAX_TOTAL_COUNT, PROPORTION_SUM_TOLERANCE,
};
pub use generator::SyntheticRecordGenerator;
pub use profile::{GeneratorProfile, StatusDrawPlan, ZDraw};
