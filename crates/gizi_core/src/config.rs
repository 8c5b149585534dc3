//! Dataset generation requests.
//!
//! A request names a seed, a total and either explicit proportions or a
//! profile preset. Requests load from JSON or YAML; anything left out falls
//! back to the profile defaults (`GIZI_PROFILE` when no profile is given).

use crate::error::{GiziError, Result};
use crate::synth::assembler::checked_total;
use crate::synth::{ClassProportions, Dataset, DatasetAssembler, GeneratorProfile};
use serde::{Deserialize, Serialize};

/// Request schema understood by this build.
pub const SCHEMA_VERSION: u8 = 1;

fn default_schema_version() -> u8 {
    SCHEMA_VERSION
}

fn default_balanced() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    pub seed: u64,
    pub total_count: i64,
    #[serde(default)]
    pub profile: Option<GeneratorProfile>,
    /// Selects the balanced preset when no proportions are given.
    #[serde(default = "default_balanced")]
    pub balanced: bool,
    #[serde(default)]
    pub proportions: Option<ClassProportions>,
}

/// A request with every default filled in and validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRequest {
    pub profile: GeneratorProfile,
    pub seed: u64,
    pub total_count: i64,
    pub proportions: ClassProportions,
}

impl DatasetRequest {
    pub fn new(profile: GeneratorProfile, seed: u64, total_count: i64) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            seed,
            total_count,
            profile: Some(profile),
            balanced: true,
            proportions: None,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| GiziError::config(format!("invalid JSON request: {}", e)))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| GiziError::config(format!("invalid YAML request: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }

    pub fn resolve(&self) -> Result<ResolvedRequest> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(GiziError::config(format!(
                "unsupported schema version: {}",
                self.schema_version
            )));
        }
        checked_total(self.total_count)?;
        let profile = self.profile.unwrap_or_else(GeneratorProfile::from_env_or_default);
        let proportions = self
            .proportions
            .clone()
            .unwrap_or_else(|| ClassProportions::preset(profile, self.balanced));
        proportions.validate(profile)?;

        Ok(ResolvedRequest { profile, seed: self.seed, total_count: self.total_count, proportions })
    }

    pub fn assemble(&self) -> Result<Dataset> {
        let resolved = self.resolve()?;
        DatasetAssembler::new(resolved.profile, resolved.seed)
            .assemble(resolved.total_count, &resolved.proportions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutritionStatus;

    #[test]
    fn test_json_defaults() {
        let request =
            DatasetRequest::from_json(r#"{"seed": 42, "total_count": 100, "profile": "training"}"#).unwrap();
        assert_eq!(request.schema_version, SCHEMA_VERSION);
        assert!(request.balanced);
        let resolved = request.resolve().unwrap();
        assert_eq!(resolved.proportions, ClassProportions::preset(GeneratorProfile::Training, true));
    }

    #[test]
    fn test_yaml_with_explicit_proportions() {
        let yaml = "\
seed: 7
total_count: 20
profile: field_survey
proportions:
  Gizi Baik: 0.5
  Gizi Kurang: 0.3
  Obesitas: 0.2
";
        let request = DatasetRequest::from_yaml(yaml).unwrap();
        let resolved = request.resolve().unwrap();
        assert_eq!(resolved.profile, GeneratorProfile::FieldSurvey);
        assert_eq!(resolved.proportions.get(NutritionStatus::Obesitas), Some(0.2));
        let dataset = request.assemble().unwrap();
        assert_eq!(dataset.len() as u64 + dataset.report.truncated, 20);
    }

    #[test]
    fn test_realistic_preset() {
        let mut request = DatasetRequest::new(GeneratorProfile::FieldSurvey, 1, 10);
        request.balanced = false;
        let resolved = request.resolve().unwrap();
        assert_eq!(resolved.proportions.get(NutritionStatus::GiziBaik), Some(0.60));
    }

    #[test]
    fn test_rejections() {
        let mut request = DatasetRequest::new(GeneratorProfile::Training, 1, -5);
        assert!(request.validate().is_err());

        request.total_count = i64::MAX;
        assert_eq!(request.validate().unwrap_err().code(), "CONFIG_ERROR");

        request.total_count = 5;
        request.schema_version = 9;
        assert!(request.validate().is_err());

        request.schema_version = SCHEMA_VERSION;
        request.proportions = Some(ClassProportions::from_pairs(&[(NutritionStatus::Obesitas, 1.0)]));
        assert_eq!(request.validate().unwrap_err().code(), "CONFIG_ERROR");

        assert!(DatasetRequest::from_json("{").is_err());
        assert!(DatasetRequest::from_yaml("seed: [").is_err());
    }
}
