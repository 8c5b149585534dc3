//! Dataset Builder Library
//!
//! Request (JSON/YAML) → synthetic dataset → handoff CSV + SHA256 checksum.
//! Reference tables are exported as CSV with their SD lines.

pub mod handoff_csv;

use anyhow::{Context, Result};
use gizi_core::growth::{GrowthStandardTable, Indicator};
use gizi_core::synth::{AssemblyReport, GeneratorProfile, QualitySummary};
use gizi_core::{DatasetRequest, Sex};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub use handoff_csv::{read_records, read_records_from_path, CsvRecord, ParseStats, HANDOFF_HEADER};

/// Metadata written next to a generated dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub schema_version: u8,
    pub generator_version: String,
    pub profile: GeneratorProfile,
    pub seed: u64,
    /// SHA256 of the CSV bytes (hex)
    pub checksum: String,
    /// RFC3339
    pub created_at: String,
    pub size_bytes: u64,
    pub with_targets: bool,
    pub report: AssemblyReport,
    pub quality: QualitySummary,
}

/// Load a request file; `.yaml`/`.yml` are parsed as YAML, everything else as JSON.
pub fn load_request(path: &Path) -> Result<DatasetRequest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref(),
        Some("yaml") | Some("yml")
    );
    let request = if is_yaml { DatasetRequest::from_yaml(&text) } else { DatasetRequest::from_json(&text) };
    request.with_context(|| format!("Invalid request file: {}", path.display()))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Assemble the requested dataset and write it as a handoff CSV.
pub fn build_dataset(
    request: &DatasetRequest,
    output_csv: &Path,
    with_targets: bool,
) -> Result<DatasetMetadata> {
    let resolved = request.resolve().context("Invalid dataset request")?;
    let dataset = request.assemble().context("Failed to assemble dataset")?;

    let records: Vec<CsvRecord> = dataset
        .records
        .iter()
        .map(|r| CsvRecord::new(r.to_handoff(), r.target_status))
        .collect();
    let bytes = handoff_csv::to_csv_bytes(&records, with_targets)?;
    let checksum = sha256_hex(&bytes);

    if let Some(parent) = output_csv.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
    }
    fs::write(output_csv, &bytes)
        .with_context(|| format!("Failed to write output file: {}", output_csv.display()))?;

    info!(
        path = %output_csv.display(),
        rows = records.len(),
        checksum = %checksum,
        "dataset written"
    );

    Ok(DatasetMetadata {
        schema_version: gizi_core::SCHEMA_VERSION,
        generator_version: gizi_core::VERSION.to_string(),
        profile: resolved.profile,
        seed: resolved.seed,
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        size_bytes: bytes.len() as u64,
        with_targets,
        report: dataset.report.clone(),
        quality: dataset.quality(),
    })
}

/// Check a dataset file against its recorded checksum.
pub fn verify_dataset(csv_file: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(csv_file)
        .with_context(|| format!("Failed to read dataset file: {}", csv_file.display()))?;
    Ok(sha256_hex(&bytes) == expected_checksum)
}

pub fn save_metadata(path: &Path, metadata: &DatasetMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(path, json).with_context(|| format!("Failed to write metadata: {}", path.display()))?;
    Ok(())
}

/// Write a reference table as CSV: one row per (age, sex, indicator) with
/// median, spread and the −3SD … +3SD lines.
pub fn write_reference_csv<W: Write>(
    writer: W,
    table: &GrowthStandardTable,
    sex: Option<Sex>,
    indicator: Option<Indicator>,
) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "age_months", "sex", "indicator", "median", "spread", "sd_minus_3", "sd_minus_2", "sd_minus_1",
        "sd_0", "sd_plus_1", "sd_plus_2", "sd_plus_3",
    ])?;

    let mut rows = 0;
    for reference in table.references() {
        if sex.is_some_and(|s| s != reference.sex) || indicator.is_some_and(|i| i != reference.indicator) {
            continue;
        }
        let mut fields = vec![
            reference.age_months.to_string(),
            reference.sex.code().to_string(),
            reference.indicator.code().to_string(),
            reference.median.to_string(),
            reference.spread.to_string(),
        ];
        fields.extend(reference.sd_lines().iter().map(|v| format!("{:.2}", v)));
        csv_writer.write_record(&fields)?;
        rows += 1;
    }
    csv_writer.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gizi_core::growth::TableVariant;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_build_and_verify_dataset() -> Result<()> {
        let dir = TempDir::new()?;
        let output = dir.path().join("out").join("dataset.csv");
        let request = DatasetRequest::new(GeneratorProfile::FieldSurvey, 42, 100);

        let metadata = build_dataset(&request, &output, true)?;

        assert_eq!(metadata.profile, GeneratorProfile::FieldSurvey);
        assert_eq!(metadata.seed, 42);
        assert_eq!(metadata.checksum.len(), 64);
        assert!(verify_dataset(&output, &metadata.checksum)?);
        assert!(!verify_dataset(&output, "deadbeef")?);

        let (records, stats) = read_records_from_path(&output)?;
        assert_eq!(records.len(), metadata.report.generated);
        assert_eq!(stats.failed + stats.out_of_range, 0);
        Ok(())
    }

    #[test]
    fn test_same_seed_same_checksum() -> Result<()> {
        let dir = TempDir::new()?;
        let request = DatasetRequest::new(GeneratorProfile::Training, 7, 250);
        let a = build_dataset(&request, &dir.path().join("a.csv"), false)?;
        let b = build_dataset(&request, &dir.path().join("b.csv"), false)?;
        assert_eq!(a.checksum, b.checksum);
        assert_eq!(fs::read(dir.path().join("a.csv"))?, fs::read(dir.path().join("b.csv"))?);
        Ok(())
    }

    #[test]
    fn test_load_request_yaml_and_json() -> Result<()> {
        let dir = TempDir::new()?;
        let yaml_path = dir.path().join("request.yaml");
        fs::write(&yaml_path, "seed: 3\ntotal_count: 10\nprofile: training\n")?;
        let yaml = load_request(&yaml_path)?;
        assert_eq!(yaml.profile, Some(GeneratorProfile::Training));

        let mut json_file = NamedTempFile::new()?;
        json_file.write_all(br#"{"seed": 3, "total_count": 10, "profile": "field_survey", "balanced": false}"#)?;
        let json = load_request(json_file.path())?;
        assert!(!json.balanced);

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{")?;
        assert!(load_request(&bad).is_err());
        Ok(())
    }

    #[test]
    fn test_metadata_saved_as_json() -> Result<()> {
        let dir = TempDir::new()?;
        let request = DatasetRequest::new(GeneratorProfile::Training, 1, 20);
        let metadata = build_dataset(&request, &dir.path().join("d.csv"), false)?;
        let meta_path = dir.path().join("d.meta.json");
        save_metadata(&meta_path, &metadata)?;
        let loaded: DatasetMetadata = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;
        assert_eq!(loaded.checksum, metadata.checksum);
        assert!(chrono::DateTime::parse_from_rfc3339(&loaded.created_at).is_ok());
        Ok(())
    }

    #[test]
    fn test_reference_csv() -> Result<()> {
        let table = GrowthStandardTable::new(TableVariant::Linear);
        let mut bytes = Vec::new();
        let rows = write_reference_csv(&mut bytes, &table, Some(Sex::Male), Some(Indicator::WeightForAge))?;
        assert_eq!(rows, 61);
        let text = String::from_utf8(bytes)?;
        let mut lines = text.lines();
        assert!(lines.next().unwrap_or_default().starts_with("age_months,sex,indicator"));
        // Birth row: median 3.3, spread 0.4.
        assert_eq!(lines.next(), Some("0,L,BB/U,3.3,0.4,2.10,2.50,2.90,3.30,3.70,4.10,4.50"));
        Ok(())
    }

    #[test]
    fn test_invalid_request_fails_before_writing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("never.csv");
        let request = DatasetRequest::new(GeneratorProfile::Training, 1, -3);
        assert!(build_dataset(&request, &output, false).is_err());
        assert!(!output.exists());
    }
}
