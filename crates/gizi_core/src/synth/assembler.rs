//! Dataset assembler.
//!
//! Splits a requested total across statuses, generates each quota with
//! random age and sex, and shuffles the result. All randomness comes from a
//! single seeded source so the same seed, profile and proportions always
//! produce the same dataset.

use super::generator::SyntheticRecordGenerator;
use super::profile::GeneratorProfile;
use crate::error::{GiziError, Result};
use crate::models::{HandoffRow, NutritionStatus, Record, Sex, MAX_AGE_MONTHS};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Allowed distance of the proportion sum from 1.0.
pub const PROPORTION_SUM_TOLERANCE: f64 = 0.01;

/// Largest dataset one request may ask for.
pub const MAX_TOTAL_COUNT: i64 = 10_000_000;

/// Checks a requested record count against `[0, MAX_TOTAL_COUNT]`.
pub(crate) fn checked_total(total_count: i64) -> Result<u64> {
    if !(0..=MAX_TOTAL_COUNT).contains(&total_count) {
        return Err(GiziError::config(format!(
            "total_count must be within [0, {}], got {}",
            MAX_TOTAL_COUNT, total_count
        )));
    }
    Ok(total_count as u64)
}

/// Status → fraction of the dataset. Ordered by status declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassProportions(BTreeMap<NutritionStatus, f64>);

impl ClassProportions {
    pub fn new(fractions: BTreeMap<NutritionStatus, f64>) -> Self {
        Self(fractions)
    }

    pub fn from_pairs(pairs: &[(NutritionStatus, f64)]) -> Self {
        Self(pairs.iter().copied().collect())
    }

    /// Preset distribution of a profile. `balanced` only matters for the field survey.
    pub fn preset(profile: GeneratorProfile, balanced: bool) -> Self {
        Self::from_pairs(profile.preset(balanced))
    }

    pub fn get(&self, status: NutritionStatus) -> Option<f64> {
        self.0.get(&status).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NutritionStatus, f64)> + '_ {
        self.0.iter().map(|(&status, &fraction)| (status, fraction))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn validate(&self, profile: GeneratorProfile) -> Result<()> {
        for (status, fraction) in self.iter() {
            if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
                return Err(GiziError::config(format!(
                    "proportion for '{}' must be within [0, 1], got {}",
                    status, fraction
                )));
            }
            if !profile.vocabulary().contains(&status) {
                return Err(GiziError::config(format!(
                    "status '{}' is not produced by the {} profile",
                    status, profile
                )));
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > PROPORTION_SUM_TOLERANCE {
            return Err(GiziError::config(format!(
                "proportions must sum to 1.0 (±{}), got {:.4}",
                PROPORTION_SUM_TOLERANCE, total
            )));
        }
        Ok(())
    }
}

/// What was asked for versus what was generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyReport {
    pub requested_total: u64,
    pub generated: usize,
    /// `floor(total × fraction)` per status.
    pub quotas: BTreeMap<NutritionStatus, usize>,
    /// Records lost to flooring.
    pub truncated: u64,
}

/// Aggregate quality figures for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub records: usize,
    pub status_counts: BTreeMap<NutritionStatus, usize>,
    pub sex_counts: BTreeMap<Sex, usize>,
    pub mismatches: usize,
    pub mismatch_rate: f64,
    pub implausible_records: usize,
    pub out_of_range_records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub profile: GeneratorProfile,
    pub seed: Option<u64>,
    pub records: Vec<Record>,
    pub report: AssemblyReport,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counts of the derived status.
    pub fn status_counts(&self) -> BTreeMap<NutritionStatus, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn sex_counts(&self) -> BTreeMap<Sex, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.measurement.sex).or_insert(0) += 1;
        }
        counts
    }

    pub fn mismatches(&self) -> usize {
        self.records.iter().filter(|r| r.is_mismatch()).count()
    }

    pub fn mismatch_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.mismatches() as f64 / self.records.len() as f64
    }

    /// Records with any Z-score beyond ±5 SD.
    pub fn implausible_records(&self) -> Vec<&Record> {
        self.records.iter().filter(|r| !r.z_scores.is_plausible()).collect()
    }

    /// Records with a raw measurement outside its physiological bounds.
    pub fn out_of_range_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.measurement.out_of_range_fields().is_empty())
            .count()
    }

    pub fn quality(&self) -> QualitySummary {
        QualitySummary {
            records: self.len(),
            status_counts: self.status_counts(),
            sex_counts: self.sex_counts(),
            mismatches: self.mismatches(),
            mismatch_rate: self.mismatch_rate(),
            implausible_records: self.implausible_records().len(),
            out_of_range_records: self.out_of_range_count(),
        }
    }

    pub fn handoff_rows(&self) -> Vec<HandoffRow> {
        self.records.iter().map(Record::to_handoff).collect()
    }
}

pub struct DatasetAssembler {
    generator: SyntheticRecordGenerator,
    seed: u64,
}

impl DatasetAssembler {
    pub fn new(profile: GeneratorProfile, seed: u64) -> Self {
        Self { generator: SyntheticRecordGenerator::new(profile), seed }
    }

    pub fn profile(&self) -> GeneratorProfile {
        self.generator.profile()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Assembles with a fresh `ChaCha8Rng` seeded from the assembler's seed.
    /// Repeated calls return identical datasets.
    pub fn assemble(&self, total_count: i64, proportions: &ClassProportions) -> Result<Dataset> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut dataset = self.assemble_with_rng(total_count, proportions, &mut rng)?;
        dataset.seed = Some(self.seed);
        Ok(dataset)
    }

    /// Assembles with the profile's preset distribution.
    pub fn assemble_preset(&self, total_count: i64, balanced: bool) -> Result<Dataset> {
        self.assemble(total_count, &ClassProportions::preset(self.profile(), balanced))
    }

    /// Assembles from a caller-supplied source. Inputs are validated before any draw.
    pub fn assemble_with_rng<R: Rng + ?Sized>(
        &self,
        total_count: i64,
        proportions: &ClassProportions,
        rng: &mut R,
    ) -> Result<Dataset> {
        let profile = self.profile();
        let total = checked_total(total_count)?;
        proportions.validate(profile)?;

        let quotas: BTreeMap<NutritionStatus, usize> = proportions
            .iter()
            .map(|(status, fraction)| (status, (total as f64 * fraction).floor() as usize))
            .collect();
        let planned: u64 = quotas.values().map(|&n| n as u64).sum();
        let truncated = total.saturating_sub(planned);

        let mut records = Vec::with_capacity(planned as usize);
        for (&status, &quota) in &quotas {
            for _ in 0..quota {
                let age_months = rng.gen_range(0..=MAX_AGE_MONTHS);
                let sex = if rng.gen_bool(0.5) { Sex::Male } else { Sex::Female };
                records.push(self.generator.generate(age_months, sex, Some(status), rng)?);
            }
        }
        records.shuffle(rng);

        if truncated > 0 {
            warn!(requested = total, generated = records.len(), truncated, "proportions floored below requested total");
        }

        let dataset = Dataset {
            profile,
            seed: None,
            report: AssemblyReport {
                requested_total: total,
                generated: records.len(),
                quotas,
                truncated,
            },
            records,
        };
        info!(
            profile = %profile,
            records = dataset.len(),
            mismatches = dataset.mismatches(),
            "assembled synthetic dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey_mix() -> ClassProportions {
        ClassProportions::from_pairs(&[
            (NutritionStatus::GiziBaik, 0.5),
            (NutritionStatus::GiziKurang, 0.2),
            (NutritionStatus::GiziBuruk, 0.1),
            (NutritionStatus::GiziLebih, 0.1),
            (NutritionStatus::Obesitas, 0.1),
        ])
    }

    #[test]
    fn test_same_seed_same_bytes() {
        let a = DatasetAssembler::new(GeneratorProfile::FieldSurvey, 42)
            .assemble(1000, &survey_mix())
            .unwrap();
        let b = DatasetAssembler::new(GeneratorProfile::FieldSurvey, 42)
            .assemble(1000, &survey_mix())
            .unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_different_seed_different_records() {
        let a = DatasetAssembler::new(GeneratorProfile::Training, 1)
            .assemble(50, &ClassProportions::preset(GeneratorProfile::Training, true))
            .unwrap();
        let b = DatasetAssembler::new(GeneratorProfile::Training, 2)
            .assemble(50, &ClassProportions::preset(GeneratorProfile::Training, true))
            .unwrap();
        assert_ne!(a.records, b.records);
    }

    #[test]
    fn test_quotas_follow_floor() {
        let proportions = ClassProportions::from_pairs(&[
            (NutritionStatus::GiziBaik, 0.5),
            (NutritionStatus::GiziKurang, 0.25),
            (NutritionStatus::GiziBuruk, 0.125),
            (NutritionStatus::Stunting, 0.125),
        ]);
        let dataset = DatasetAssembler::new(GeneratorProfile::Training, 7)
            .assemble(10, &proportions)
            .unwrap();
        let report = &dataset.report;
        assert_eq!(report.quotas[&NutritionStatus::GiziBaik], 5);
        assert_eq!(report.quotas[&NutritionStatus::GiziKurang], 2);
        assert_eq!(report.quotas[&NutritionStatus::GiziBuruk], 1);
        assert_eq!(report.quotas[&NutritionStatus::Stunting], 1);
        assert_eq!(report.generated, 9);
        assert_eq!(report.truncated, 1);
        assert_eq!(dataset.len(), 9);
    }

    #[test]
    fn test_target_counts_match_quotas() {
        let dataset = DatasetAssembler::new(GeneratorProfile::FieldSurvey, 3)
            .assemble(200, &ClassProportions::preset(GeneratorProfile::FieldSurvey, false))
            .unwrap();
        for (&status, &quota) in &dataset.report.quotas {
            let targeted = dataset
                .records
                .iter()
                .filter(|r| r.target_status == Some(status))
                .count();
            assert_eq!(targeted, quota);
        }
    }

    #[test]
    fn test_records_are_shuffled() {
        let dataset = DatasetAssembler::new(GeneratorProfile::Training, 11)
            .assemble(100, &ClassProportions::preset(GeneratorProfile::Training, true))
            .unwrap();
        let targets: Vec<_> = dataset.records.iter().map(|r| r.target_status).collect();
        let mut sorted = targets.clone();
        sorted.sort();
        assert_ne!(targets, sorted);
    }

    #[test]
    fn test_ages_and_sexes_in_range() {
        let dataset = DatasetAssembler::new(GeneratorProfile::Training, 5)
            .assemble(300, &ClassProportions::preset(GeneratorProfile::Training, true))
            .unwrap();
        assert!(dataset.records.iter().all(|r| r.measurement.age_months <= MAX_AGE_MONTHS));
        let sexes = dataset.sex_counts();
        assert!(sexes[&Sex::Male] > 0 && sexes[&Sex::Female] > 0);
        assert_eq!(dataset.out_of_range_count(), 0);
    }

    #[test]
    fn test_preset_assembly_matches_explicit_preset() {
        let assembler = DatasetAssembler::new(GeneratorProfile::FieldSurvey, 21);
        let preset = assembler.assemble_preset(100, false).unwrap();
        let explicit = assembler
            .assemble(100, &ClassProportions::preset(GeneratorProfile::FieldSurvey, false))
            .unwrap();
        assert_eq!(preset, explicit);
        assert!(preset.report.quotas[&NutritionStatus::GiziBaik] > preset.report.quotas[&NutritionStatus::GiziKurang]);
    }

    #[test]
    fn test_sum_tolerance() {
        let assembler = DatasetAssembler::new(GeneratorProfile::FieldSurvey, 42);
        let short = ClassProportions::from_pairs(&[
            (NutritionStatus::GiziBaik, 0.5),
            (NutritionStatus::GiziKurang, 0.2),
            (NutritionStatus::GiziBuruk, 0.1),
            (NutritionStatus::GiziLebih, 0.1),
            (NutritionStatus::Obesitas, 0.07),
        ]);
        let err = assembler.assemble(100, &short).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(assembler.assemble(100, &survey_mix()).is_ok());
    }

    #[test]
    fn test_invalid_requests_rejected() {
        let assembler = DatasetAssembler::new(GeneratorProfile::FieldSurvey, 42);
        assert!(assembler.assemble(-1, &survey_mix()).is_err());
        let oversized = assembler.assemble(MAX_TOTAL_COUNT + 1, &survey_mix()).unwrap_err();
        assert_eq!(oversized.code(), "CONFIG_ERROR");
        assert!(assembler.assemble(i64::MAX, &survey_mix()).is_err());

        let negative = ClassProportions::from_pairs(&[
            (NutritionStatus::GiziBaik, 1.2),
            (NutritionStatus::GiziKurang, -0.2),
        ]);
        assert!(assembler.assemble(10, &negative).is_err());

        let foreign = ClassProportions::from_pairs(&[
            (NutritionStatus::GiziBaik, 0.9),
            (NutritionStatus::Stunting, 0.1),
        ]);
        assert!(assembler.assemble(10, &foreign).is_err());

        let nan = ClassProportions::from_pairs(&[(NutritionStatus::GiziBaik, f64::NAN)]);
        assert!(assembler.assemble(10, &nan).is_err());

        assert!(assembler.assemble(10, &ClassProportions::default()).is_err());
    }

    #[test]
    fn test_zero_total_is_empty() {
        let dataset = DatasetAssembler::new(GeneratorProfile::Training, 1)
            .assemble(0, &ClassProportions::preset(GeneratorProfile::Training, true))
            .unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.report.truncated, 0);
        assert_eq!(dataset.mismatch_rate(), 0.0);
    }

    #[test]
    fn test_quality_summary_is_consistent() {
        let dataset = DatasetAssembler::new(GeneratorProfile::FieldSurvey, 42)
            .assemble(500, &survey_mix())
            .unwrap();
        let quality = dataset.quality();
        assert_eq!(quality.records, 500);
        assert_eq!(quality.status_counts.values().sum::<usize>(), 500);
        assert_eq!(quality.sex_counts.values().sum::<usize>(), 500);
        assert!(quality.mismatches > 0);
        assert!((quality.mismatch_rate - quality.mismatches as f64 / 500.0).abs() < 1e-12);
        let vocabulary = GeneratorProfile::FieldSurvey.vocabulary();
        assert!(quality.status_counts.keys().all(|s| vocabulary.contains(s)));
    }

    #[test]
    fn test_proportions_serialize_by_label() {
        let json = serde_json::to_string(&ClassProportions::from_pairs(&[(NutritionStatus::GiziBaik, 1.0)])).unwrap();
        assert_eq!(json, r#"{"Gizi Baik":1.0}"#);
        let parsed: ClassProportions = serde_json::from_str(r#"{"Normal":0.6,"Gizi Kurang":0.4}"#).unwrap();
        assert_eq!(parsed.get(NutritionStatus::GiziBaik), Some(0.6));
    }
}
