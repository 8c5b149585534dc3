//! Handoff CSV
//!
//! Flat rows for the external training step:
//! `sex, age_months, weight_kg, height_cm, arm_circumference_cm,
//! z_weight_age, z_height_age, z_weight_height, status`, optionally followed
//! by a `target_status` audit column.
//!
//! Reading applies the same range checks as data cleaning: rows that fail
//! to parse or fall outside the physiological bounds are skipped and
//! counted in [`ParseStats`].

use anyhow::{bail, Context, Result};
use gizi_core::models::{HandoffRow, Measurement, NutritionStatus};
use serde::Deserialize;
use std::io::{Read, Write};
use std::path::Path;
use tracing::warn;

pub const HANDOFF_HEADER: [&str; 9] = [
    "sex",
    "age_months",
    "weight_kg",
    "height_cm",
    "arm_circumference_cm",
    "z_weight_age",
    "z_height_age",
    "z_weight_height",
    "status",
];

pub const TARGET_COLUMN: &str = "target_status";

/// One CSV row with its optional audit column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CsvRecord {
    pub sex: gizi_core::Sex,
    pub age_months: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub arm_circumference_cm: Option<f64>,
    pub z_weight_age: f64,
    pub z_height_age: f64,
    pub z_weight_height: f64,
    pub status: NutritionStatus,
    #[serde(default)]
    pub target_status: Option<NutritionStatus>,
}

impl CsvRecord {
    pub fn new(row: HandoffRow, target_status: Option<NutritionStatus>) -> Self {
        Self {
            sex: row.sex,
            age_months: row.age_months,
            weight_kg: row.weight_kg,
            height_cm: row.height_cm,
            arm_circumference_cm: row.arm_circumference_cm,
            z_weight_age: row.z_weight_age,
            z_height_age: row.z_height_age,
            z_weight_height: row.z_weight_height,
            status: row.status,
            target_status,
        }
    }

    pub fn handoff(&self) -> HandoffRow {
        HandoffRow {
            sex: self.sex,
            age_months: self.age_months,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            arm_circumference_cm: self.arm_circumference_cm,
            z_weight_age: self.z_weight_age,
            z_height_age: self.z_height_age,
            z_weight_height: self.z_weight_height,
            status: self.status,
        }
    }

    pub fn measurement(&self) -> Measurement {
        Measurement {
            sex: self.sex,
            age_months: self.age_months,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            arm_circumference_cm: self.arm_circumference_cm,
        }
    }

    fn fields(&self, with_target: bool) -> Vec<String> {
        let mut fields = vec![
            self.sex.code().to_string(),
            self.age_months.to_string(),
            self.weight_kg.to_string(),
            self.height_cm.to_string(),
            self.arm_circumference_cm.map(|v| v.to_string()).unwrap_or_default(),
            self.z_weight_age.to_string(),
            self.z_height_age.to_string(),
            self.z_weight_height.to_string(),
            self.status.label().to_string(),
        ];
        if with_target {
            fields.push(self.target_status.map(|s| s.label().to_string()).unwrap_or_default());
        }
        fields
    }
}

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
    pub out_of_range: u32,
    pub has_target_column: bool,
}

/// Write records to `writer`. The audit column is only emitted when `with_target` is set.
pub fn write_records<W: Write>(writer: W, records: &[CsvRecord], with_target: bool) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = HANDOFF_HEADER.to_vec();
    if with_target {
        header.push(TARGET_COLUMN);
    }
    csv_writer.write_record(&header).context("Failed to write CSV header")?;

    for record in records {
        csv_writer
            .write_record(record.fields(with_target))
            .context("Failed to write CSV row")?;
    }
    csv_writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Serialize records into an in-memory CSV document.
pub fn to_csv_bytes(records: &[CsvRecord], with_target: bool) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_records(&mut bytes, records, with_target)?;
    Ok(bytes)
}

/// Parse a handoff CSV. The header must start with the nine handoff columns.
pub fn read_records<R: Read>(reader: R) -> Result<(Vec<CsvRecord>, ParseStats)> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers().context("Failed to read CSV header")?.clone();

    let names: Vec<&str> = headers.iter().collect();
    let expected_len = HANDOFF_HEADER.len();
    let has_target = names.len() == expected_len + 1 && names[expected_len] == TARGET_COLUMN;
    if names.len() < expected_len || names[..expected_len] != HANDOFF_HEADER || (names.len() > expected_len && !has_target) {
        bail!("Unexpected CSV header: {}", names.join(","));
    }

    let mut stats = ParseStats { has_target_column: has_target, ..ParseStats::default() };
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<CsvRecord>().enumerate() {
        stats.total_rows += 1;
        // Header is line 1
        let line = index + 2;
        let record = match row {
            Ok(record) => record,
            Err(e) => {
                stats.failed += 1;
                warn!(line, error = %e, "skipping unparseable CSV row");
                continue;
            }
        };

        let out_of_range = record.measurement().out_of_range_fields();
        if !out_of_range.is_empty() {
            stats.out_of_range += 1;
            warn!(line, fields = ?out_of_range, "skipping CSV row outside physiological bounds");
            continue;
        }

        stats.parsed += 1;
        records.push(record);
    }

    Ok((records, stats))
}

pub fn read_records_from_path(path: &Path) -> Result<(Vec<CsvRecord>, ParseStats)> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    read_records(file)
}
