//! Data model: measurements, Z-score triples, statuses and records.

pub mod measurement;
pub mod record;
pub mod sex;
pub mod status;

pub use measurement::{age_in_months, bounds, resolve_age_months, Measurement, MAX_AGE_MONTHS};
pub use record::{HandoffRow, Record, ZScoreTriple, IMPLAUSIBLE_Z};
pub use sex::Sex;
pub use status::NutritionStatus;
