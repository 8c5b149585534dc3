use serde::{Deserialize, Serialize};

use crate::assessment::{assess, Assessment, AssessmentOptions};
use crate::classify::RuleSet;
use crate::config::{DatasetRequest, SCHEMA_VERSION};
use crate::error::GiziError;
use crate::growth::{GrowthStandardTable, Indicator, TableVariant, WeightForHeightMethod};
use crate::models::{resolve_age_months, HandoffRow, Measurement, NutritionStatus, Sex};
use crate::synth::{AssemblyReport, GeneratorProfile, QualitySummary};
use chrono::NaiveDate;

/// Structured error returned (serialised) in the `Err` side of every JSON call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self { code: code.to_string(), message: message.into() }
    }

    fn invalid_json(error: serde_json::Error) -> Self {
        Self::new("INVALID_JSON", format!("Invalid JSON request: {}", error))
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{}: {}", self.code, self.message))
    }
}

impl From<GiziError> for ApiError {
    fn from(error: GiziError) -> Self {
        Self::new(error.code(), error.to_string())
    }
}

fn fail<E: Into<ApiError>>(error: E) -> String {
    error.into().to_json()
}

fn to_response<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| fail(ApiError::new("SERIALIZATION_ERROR", e.to_string())))
}

// ============================================================================
// Dataset assembly
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetResponse {
    pub schema_version: u8,
    pub profile: GeneratorProfile,
    pub seed: u64,
    pub report: AssemblyReport,
    pub quality: QualitySummary,
    pub rows: Vec<HandoffRow>,
    /// Target status per row, aligned with `rows`.
    pub targets: Vec<Option<NutritionStatus>>,
}

/// Assemble a synthetic dataset from a [`DatasetRequest`] in JSON.
pub fn assemble_dataset_json(request_json: &str) -> Result<String, String> {
    let request: DatasetRequest = serde_json::from_str(request_json).map_err(|e| fail(ApiError::invalid_json(e)))?;
    let dataset = request.assemble().map_err(fail)?;

    let response = DatasetResponse {
        schema_version: SCHEMA_VERSION,
        profile: dataset.profile,
        seed: request.seed,
        report: dataset.report.clone(),
        quality: dataset.quality(),
        rows: dataset.handoff_rows(),
        targets: dataset.records.iter().map(|r| r.target_status).collect(),
    };
    to_response(&response)
}

// ============================================================================
// Assessment
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub schema_version: Option<u8>,
    pub sex: Sex,
    /// Either `age_months` or `birth_date` (with optional `measured_on`, default today).
    #[serde(default)]
    pub age_months: Option<u32>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub measured_on: Option<NaiveDate>,
    pub weight_kg: f64,
    pub height_cm: f64,
    #[serde(default)]
    pub arm_circumference_cm: Option<f64>,
    #[serde(default)]
    pub table: Option<TableVariant>,
    #[serde(default)]
    pub rule_set: Option<RuleSet>,
    #[serde(default)]
    pub weight_for_height: Option<WeightForHeightMethod>,
}

/// Assess one measured child.
pub fn assess_json(request_json: &str) -> Result<String, String> {
    let request: AssessmentRequest =
        serde_json::from_str(request_json).map_err(|e| fail(ApiError::invalid_json(e)))?;
    if let Some(version) = request.schema_version {
        if version != SCHEMA_VERSION {
            return Err(fail(GiziError::config(format!("unsupported schema version: {}", version))));
        }
    }

    let age_months =
        resolve_age_months(request.age_months, request.birth_date, request.measured_on).map_err(fail)?;
    let measurement = Measurement::new(
        request.sex,
        age_months,
        request.weight_kg,
        request.height_cm,
        request.arm_circumference_cm,
    )
    .map_err(fail)?;

    let table = GrowthStandardTable::new(request.table.unwrap_or_else(TableVariant::from_env_or_default));
    let defaults = AssessmentOptions::from_env_or_default();
    let options = AssessmentOptions {
        rule_set: request.rule_set.unwrap_or(defaults.rule_set),
        weight_for_height: request.weight_for_height.unwrap_or(defaults.weight_for_height),
    };
    let assessment: Assessment = assess(&measurement, &table, options).map_err(fail)?;
    to_response(&assessment)
}

// ============================================================================
// Reference table
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceRequest {
    #[serde(default)]
    pub table: Option<TableVariant>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub indicator: Option<Indicator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub age_months: u32,
    pub sex: Sex,
    pub indicator: Indicator,
    pub median: f64,
    pub spread: f64,
    /// −3SD … +3SD.
    pub sd_lines: [f64; 7],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceResponse {
    pub table: TableVariant,
    pub rows: Vec<ReferenceRow>,
}

/// Dump (a filtered slice of) a built-in reference table with its SD lines.
pub fn reference_table_json(request_json: &str) -> Result<String, String> {
    let request: ReferenceRequest = if request_json.trim().is_empty() {
        ReferenceRequest::default()
    } else {
        serde_json::from_str(request_json).map_err(|e| fail(ApiError::invalid_json(e)))?
    };

    let variant = request.table.unwrap_or_else(TableVariant::from_env_or_default);
    let table = GrowthStandardTable::new(variant);
    let rows = table
        .references()
        .iter()
        .filter(|r| request.sex.map_or(true, |sex| r.sex == sex))
        .filter(|r| request.indicator.map_or(true, |indicator| r.indicator == indicator))
        .map(|r| ReferenceRow {
            age_months: r.age_months,
            sex: r.sex,
            indicator: r.indicator,
            median: r.median,
            spread: r.spread,
            sd_lines: r.sd_lines(),
        })
        .collect();
    to_response(&ReferenceResponse { table: variant, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn error_code(err: &str) -> String {
        let parsed: ApiError = serde_json::from_str(err).unwrap();
        parsed.code
    }

    #[test]
    fn test_assemble_dataset_json_is_deterministic() {
        let request = r#"{
            "schema_version": 1,
            "seed": 42,
            "total_count": 200,
            "profile": "field_survey",
            "proportions": {"Gizi Baik": 0.5, "Gizi Kurang": 0.2, "Gizi Buruk": 0.1, "Gizi Lebih": 0.1, "Obesitas": 0.1}
        }"#;
        let a = assemble_dataset_json(request).unwrap();
        let b = assemble_dataset_json(request).unwrap();
        assert_eq!(a, b);

        let response: DatasetResponse = serde_json::from_str(&a).unwrap();
        assert_eq!(response.rows.len(), response.targets.len());
        assert_eq!(response.quality.records, response.rows.len());
        assert_eq!(response.profile, GeneratorProfile::FieldSurvey);
    }

    #[test]
    fn test_assemble_rejects_bad_sum() {
        let request = r#"{"seed": 1, "total_count": 10, "profile": "training",
            "proportions": {"Gizi Baik": 0.9, "Gizi Kurang": 0.07}}"#;
        assert_eq!(error_code(&assemble_dataset_json(request).unwrap_err()), "CONFIG_ERROR");
        assert_eq!(error_code(&assemble_dataset_json("not json").unwrap_err()), "INVALID_JSON");

        let oversized = r#"{"seed": 1, "total_count": 9223372036854775807, "profile": "training"}"#;
        assert_eq!(error_code(&assemble_dataset_json(oversized).unwrap_err()), "CONFIG_ERROR");
    }

    #[test]
    fn test_assess_json_with_birth_date() {
        let request = r#"{
            "sex": "L",
            "birth_date": "2022-01-15",
            "measured_on": "2024-01-15",
            "weight_kg": 6.9,
            "height_cm": 76.3,
            "table": "linear",
            "rule_set": "composite",
            "weight_for_height": "height_proportional"
        }"#;
        let value: Value = serde_json::from_str(&assess_json(request).unwrap()).unwrap();
        assert_eq!(value["measurement"]["age_months"], 24);
        assert_eq!(value["status"], "Gizi Baik");
        assert_eq!(value["recommendations"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_assess_json_errors() {
        let missing_age = r#"{"sex": "P", "weight_kg": 8.0, "height_cm": 70.0}"#;
        assert_eq!(error_code(&assess_json(missing_age).unwrap_err()), "CONFIG_ERROR");

        let too_old = r#"{"sex": "P", "age_months": 72, "weight_kg": 8.0, "height_cm": 70.0}"#;
        assert_eq!(error_code(&assess_json(too_old).unwrap_err()), "DOMAIN_ERROR");

        let bad_sex = r#"{"sex": "X", "age_months": 12, "weight_kg": 8.0, "height_cm": 70.0}"#;
        assert_eq!(error_code(&assess_json(bad_sex).unwrap_err()), "INVALID_JSON");
    }

    #[test]
    fn test_reference_table_json_filters() {
        let out = reference_table_json(r#"{"table": "banded", "sex": "P", "indicator": "TB/U"}"#).unwrap();
        let response: ReferenceResponse = serde_json::from_str(&out).unwrap();
        assert_eq!(response.table, TableVariant::Banded);
        assert_eq!(response.rows.len(), 61);
        assert!(response.rows.iter().all(|r| r.sex == Sex::Female && r.indicator == Indicator::HeightForAge));
        let birth = &response.rows[0];
        assert_eq!(birth.sd_lines[3], birth.median);
        assert!(birth.sd_lines.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_reference_table_json_full_linear() {
        let out = reference_table_json(r#"{"table": "linear"}"#).unwrap();
        let response: ReferenceResponse = serde_json::from_str(&out).unwrap();
        assert_eq!(response.rows.len(), 61 * 2 * 3);
    }
}
