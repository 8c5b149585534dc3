//! Anthropometric measurement of one child.

use super::sex::Sex;
use crate::error::{GiziError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Oldest supported age in completed months.
pub const MAX_AGE_MONTHS: u32 = 60;

/// Physiological bounds (inclusive) accepted for measured and synthesized children.
pub mod bounds {
    pub const WEIGHT_KG: (f64, f64) = (2.0, 30.0);
    pub const HEIGHT_CM: (f64, f64) = (45.0, 120.0);
    pub const ARM_CIRCUMFERENCE_CM: (f64, f64) = (10.0, 25.0);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub sex: Sex,
    pub age_months: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// Mid-upper-arm circumference. Optional on the intake form.
    pub arm_circumference_cm: Option<f64>,
}

impl Measurement {
    pub fn new(
        sex: Sex,
        age_months: u32,
        weight_kg: f64,
        height_cm: f64,
        arm_circumference_cm: Option<f64>,
    ) -> Result<Self> {
        let measurement = Self { sex, age_months, weight_kg, height_cm, arm_circumference_cm };
        measurement.validate()?;
        Ok(measurement)
    }

    pub fn validate(&self) -> Result<()> {
        if self.age_months > MAX_AGE_MONTHS {
            return Err(GiziError::domain(format!(
                "age {} months outside supported range 0..={}",
                self.age_months, MAX_AGE_MONTHS
            )));
        }
        check_range("weight_kg", self.weight_kg, bounds::WEIGHT_KG)?;
        check_range("height_cm", self.height_cm, bounds::HEIGHT_CM)?;
        if let Some(arm) = self.arm_circumference_cm {
            check_range("arm_circumference_cm", arm, bounds::ARM_CIRCUMFERENCE_CM)?;
        }
        Ok(())
    }

    /// Names of fields outside their physiological range. Empty for a valid measurement.
    pub fn out_of_range_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.age_months > MAX_AGE_MONTHS {
            fields.push("age_months");
        }
        if !in_range(self.weight_kg, bounds::WEIGHT_KG) {
            fields.push("weight_kg");
        }
        if !in_range(self.height_cm, bounds::HEIGHT_CM) {
            fields.push("height_cm");
        }
        if let Some(arm) = self.arm_circumference_cm {
            if !in_range(arm, bounds::ARM_CIRCUMFERENCE_CM) {
                fields.push("arm_circumference_cm");
            }
        }
        fields
    }
}

fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    value.is_finite() && value >= min && value <= max
}

fn check_range(name: &str, value: f64, range: (f64, f64)) -> Result<()> {
    if in_range(value, range) {
        Ok(())
    } else {
        Err(GiziError::domain(format!(
            "{} = {} outside [{}, {}]",
            name, value, range.0, range.1
        )))
    }
}

/// Age in completed months between `birth` and `on`.
///
/// Counts whole years and remaining whole months, so a child born on the
/// 31st is one month old on the 30th of the following month only once the
/// day of month has been reached.
pub fn age_in_months(birth: NaiveDate, on: NaiveDate) -> Result<u32> {
    if birth > on {
        return Err(GiziError::domain(format!("birth date {} is after {}", birth, on)));
    }

    let mut months = (on.year() - birth.year()) * 12 + on.month() as i32 - birth.month() as i32;
    if on.day() < birth.day() {
        months -= 1;
    }

    let months = months.max(0) as u32;
    if months > MAX_AGE_MONTHS {
        return Err(GiziError::domain(format!(
            "age {} months outside supported range 0..={}",
            months, MAX_AGE_MONTHS
        )));
    }
    Ok(months)
}

/// Age from either an explicit month count or a birth date.
///
/// An explicit age wins. A birth date is measured against `measured_on`,
/// or today's local date when that is absent.
pub fn resolve_age_months(
    age_months: Option<u32>,
    birth_date: Option<NaiveDate>,
    measured_on: Option<NaiveDate>,
) -> Result<u32> {
    match (age_months, birth_date) {
        (Some(age), _) => Ok(age),
        (None, Some(birth)) => {
            let on = measured_on.unwrap_or_else(|| chrono::Local::now().date_naive());
            age_in_months(birth, on)
        }
        (None, None) => Err(GiziError::config("either age_months or birth_date is required")),
    }
}
