//! Generator profiles.
//!
//! A profile fixes everything that differs between the two synthetic
//! generators: growth table, rule set, how weight-for-height is obtained,
//! the per-status Z-score draw table and the preset class distributions.
//! The two draw tables are kept side by side; neither is derived from the
//! other.

use crate::classify::RuleSet;
use crate::error::{GiziError, Result};
use crate::growth::TableVariant;
use crate::models::NutritionStatus;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// One Z-score draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZDraw {
    /// Uniform on `[low, high)`.
    Uniform { low: f64, high: f64 },
    Normal { mean: f64, std_dev: f64 },
}

impl ZDraw {
    pub const STANDARD_NORMAL: ZDraw = ZDraw::Normal { mean: 0.0, std_dev: 1.0 };

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        match *self {
            ZDraw::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low >= high {
                    return Err(GiziError::config(format!("empty uniform range [{}, {})", low, high)));
                }
                Ok(rng.gen_range(low..high))
            }
            ZDraw::Normal { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || std_dev <= 0.0 {
                    return Err(GiziError::config(format!(
                        "invalid normal N({}, {}): std_dev must be positive and finite",
                        mean, std_dev
                    )));
                }
                let normal = Normal::new(mean, std_dev).map_err(|e| {
                    GiziError::config(format!("invalid normal N({}, {}): {}", mean, std_dev, e))
                })?;
                Ok(normal.sample(rng))
            }
        }
    }
}

/// Draws for one target status. `weight_for_height: None` means the score
/// is derived from the back-converted weight and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusDrawPlan {
    pub weight_for_age: ZDraw,
    pub height_for_age: ZDraw,
    pub weight_for_height: Option<ZDraw>,
}

const fn uniform(low: f64, high: f64) -> ZDraw {
    ZDraw::Uniform { low, high }
}

const fn normal(mean: f64, std_dev: f64) -> ZDraw {
    ZDraw::Normal { mean, std_dev }
}

const fn derived(weight_for_age: ZDraw, height_for_age: ZDraw) -> StatusDrawPlan {
    StatusDrawPlan { weight_for_age, height_for_age, weight_for_height: None }
}

const fn drawn(weight_for_age: ZDraw, height_for_age: ZDraw, weight_for_height: ZDraw) -> StatusDrawPlan {
    StatusDrawPlan { weight_for_age, height_for_age, weight_for_height: Some(weight_for_height) }
}

/// Plan used when no target status is requested.
pub const UNTARGETED_PLAN: StatusDrawPlan = derived(ZDraw::STANDARD_NORMAL, ZDraw::STANDARD_NORMAL);

/// Field-survey draws: weight-for-age and height-for-age only.
mod field_survey {
    use super::*;

    pub const GIZI_BURUK: StatusDrawPlan = derived(uniform(-4.0, -2.5), uniform(-4.0, -2.5));
    pub const GIZI_KURANG: StatusDrawPlan = derived(uniform(-2.5, -1.5), uniform(-2.5, -1.5));
    pub const GIZI_BAIK: StatusDrawPlan = derived(uniform(-1.5, 1.5), uniform(-1.5, 1.5));
    pub const GIZI_LEBIH: StatusDrawPlan = derived(uniform(2.0, 2.5), uniform(-1.0, 1.0));
    pub const OBESITAS: StatusDrawPlan = derived(uniform(2.5, 4.0), uniform(-1.0, 1.0));

    pub const BALANCED: [(NutritionStatus, f64); 5] = [
        (NutritionStatus::GiziBaik, 0.35),
        (NutritionStatus::GiziKurang, 0.25),
        (NutritionStatus::GiziBuruk, 0.15),
        (NutritionStatus::GiziLebih, 0.15),
        (NutritionStatus::Obesitas, 0.10),
    ];

    /// Closer to national survey prevalence.
    pub const REALISTIC: [(NutritionStatus, f64); 5] = [
        (NutritionStatus::GiziBaik, 0.60),
        (NutritionStatus::GiziKurang, 0.20),
        (NutritionStatus::GiziBuruk, 0.08),
        (NutritionStatus::GiziLebih, 0.08),
        (NutritionStatus::Obesitas, 0.04),
    ];
}

/// Training-set draws: all three indicators.
mod training {
    use super::*;

    pub const GIZI_BAIK: StatusDrawPlan = drawn(normal(0.0, 0.8), normal(0.0, 0.8), normal(0.0, 0.8));
    pub const GIZI_KURANG: StatusDrawPlan =
        drawn(uniform(-3.0, -2.0), normal(0.0, 1.0), uniform(-2.5, -1.5));
    pub const GIZI_BURUK: StatusDrawPlan =
        drawn(uniform(-4.0, -3.0), normal(-1.0, 1.0), uniform(-4.0, -3.0));
    pub const STUNTING: StatusDrawPlan = drawn(normal(-1.0, 0.8), uniform(-3.5, -2.0), normal(0.0, 0.8));
    pub const GIZI_LEBIH: StatusDrawPlan = drawn(uniform(2.0, 3.5), normal(0.0, 1.0), uniform(2.0, 3.5));

    pub const DISTRIBUTION: [(NutritionStatus, f64); 5] = [
        (NutritionStatus::GiziBaik, 0.50),
        (NutritionStatus::GiziKurang, 0.15),
        (NutritionStatus::GiziBuruk, 0.10),
        (NutritionStatus::Stunting, 0.15),
        (NutritionStatus::GiziLebih, 0.10),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorProfile {
    /// Banded table, wasting-first rules, weight-for-height derived.
    FieldSurvey,
    /// Linear table, composite rules, weight-for-height drawn.
    Training,
}

impl GeneratorProfile {
    pub const ALL: [GeneratorProfile; 2] = [GeneratorProfile::FieldSurvey, GeneratorProfile::Training];

    pub fn name(&self) -> &'static str {
        match self {
            GeneratorProfile::FieldSurvey => "field_survey",
            GeneratorProfile::Training => "training",
        }
    }

    pub fn table_variant(&self) -> TableVariant {
        match self {
            GeneratorProfile::FieldSurvey => TableVariant::Banded,
            GeneratorProfile::Training => TableVariant::Linear,
        }
    }

    pub fn rule_set(&self) -> RuleSet {
        match self {
            GeneratorProfile::FieldSurvey => RuleSet::WastingPriority,
            GeneratorProfile::Training => RuleSet::Composite,
        }
    }

    /// Statuses this profile can target and emit.
    pub fn vocabulary(&self) -> &'static [NutritionStatus] {
        self.rule_set().classifier().vocabulary()
    }

    /// Draw plan for a target status, or `None` if the profile has no row for it.
    pub fn plan(&self, target: NutritionStatus) -> Option<StatusDrawPlan> {
        use NutritionStatus::*;
        match (self, target) {
            (GeneratorProfile::FieldSurvey, GiziBuruk) => Some(field_survey::GIZI_BURUK),
            (GeneratorProfile::FieldSurvey, GiziKurang) => Some(field_survey::GIZI_KURANG),
            (GeneratorProfile::FieldSurvey, GiziBaik) => Some(field_survey::GIZI_BAIK),
            (GeneratorProfile::FieldSurvey, GiziLebih) => Some(field_survey::GIZI_LEBIH),
            (GeneratorProfile::FieldSurvey, Obesitas) => Some(field_survey::OBESITAS),
            (GeneratorProfile::Training, GiziBaik) => Some(training::GIZI_BAIK),
            (GeneratorProfile::Training, GiziKurang) => Some(training::GIZI_KURANG),
            (GeneratorProfile::Training, GiziBuruk) => Some(training::GIZI_BURUK),
            (GeneratorProfile::Training, Stunting) => Some(training::STUNTING),
            (GeneratorProfile::Training, GiziLebih) => Some(training::GIZI_LEBIH),
            _ => None,
        }
    }

    /// Preset class distribution. The training profile has a single preset.
    pub fn preset(&self, balanced: bool) -> &'static [(NutritionStatus, f64)] {
        match (self, balanced) {
            (GeneratorProfile::FieldSurvey, true) => &field_survey::BALANCED,
            (GeneratorProfile::FieldSurvey, false) => &field_survey::REALISTIC,
            (GeneratorProfile::Training, _) => &training::DISTRIBUTION,
        }
    }

    /// `GIZI_PROFILE` = `field_survey` | `training`; defaults to training.
    pub fn from_env_or_default() -> Self {
        env::var("GIZI_PROFILE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(GeneratorProfile::Training)
    }
}

impl fmt::Display for GeneratorProfile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorProfile {
    type Err = GiziError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "field_survey" | "survey" => Ok(GeneratorProfile::FieldSurvey),
            "training" => Ok(GeneratorProfile::Training),
            other => Err(GiziError::config(format!("unknown generator profile '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_every_vocabulary_status_has_a_plan() {
        for profile in GeneratorProfile::ALL {
            for &status in profile.vocabulary() {
                assert!(profile.plan(status).is_some(), "{} lacks {}", profile, status);
            }
            for status in NutritionStatus::ALL {
                if !profile.vocabulary().contains(&status) {
                    assert!(profile.plan(status).is_none());
                }
            }
        }
    }

    #[test]
    fn test_presets_sum_to_one_and_stay_in_vocabulary() {
        for profile in GeneratorProfile::ALL {
            for balanced in [true, false] {
                let preset = profile.preset(balanced);
                let total: f64 = preset.iter().map(|(_, p)| p).sum();
                assert!((total - 1.0).abs() < 1e-9);
                assert!(preset.iter().all(|(s, _)| profile.vocabulary().contains(s)));
            }
        }
    }

    #[test]
    fn test_severe_ranges_differ_between_profiles() {
        let survey = GeneratorProfile::FieldSurvey.plan(NutritionStatus::GiziBuruk).unwrap();
        let train = GeneratorProfile::Training.plan(NutritionStatus::GiziBuruk).unwrap();
        assert_eq!(survey.weight_for_age, ZDraw::Uniform { low: -4.0, high: -2.5 });
        assert_eq!(train.weight_for_age, ZDraw::Uniform { low: -4.0, high: -3.0 });
        assert!(survey.weight_for_height.is_none());
        assert_eq!(train.weight_for_height, Some(ZDraw::Uniform { low: -4.0, high: -3.0 }));
    }

    #[test]
    fn test_uniform_draws_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let draw = ZDraw::Uniform { low: -2.5, high: -1.5 };
        for _ in 0..1000 {
            let z = draw.sample(&mut rng).unwrap();
            assert!((-2.5..-1.5).contains(&z));
        }
    }

    #[test]
    fn test_normal_draws_centre_on_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let draw = ZDraw::Normal { mean: -1.0, std_dev: 1.0 };
        let n = 5000;
        let mean: f64 = (0..n).map(|_| draw.sample(&mut rng).unwrap()).sum::<f64>() / n as f64;
        assert!((mean + 1.0).abs() < 0.1);
    }

    #[test]
    fn test_invalid_draws_are_config_errors() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(ZDraw::Uniform { low: 1.0, high: 1.0 }.sample(&mut rng).is_err());
        assert!(ZDraw::Normal { mean: 0.0, std_dev: -1.0 }.sample(&mut rng).is_err());
        assert!(ZDraw::Normal { mean: 0.0, std_dev: 0.0 }.sample(&mut rng).is_err());
        assert!(ZDraw::Normal { mean: f64::NAN, std_dev: 1.0 }.sample(&mut rng).is_err());
        let err = ZDraw::Normal { mean: 0.0, std_dev: -1.0 }.sample(&mut rng).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("field-survey".parse::<GeneratorProfile>().unwrap(), GeneratorProfile::FieldSurvey);
        assert_eq!("TRAINING".parse::<GeneratorProfile>().unwrap(), GeneratorProfile::Training);
        assert!("lab".parse::<GeneratorProfile>().is_err());
    }
}
