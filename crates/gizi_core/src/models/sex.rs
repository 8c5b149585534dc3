use crate::error::{GiziError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sex of the child. Serialized with the single-letter codes used in the
/// field forms: `L` (laki-laki) and `P` (perempuan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "L", alias = "Male", alias = "M")]
    Male,
    #[serde(rename = "P", alias = "Female", alias = "F")]
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "L",
            Sex::Female => "P",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Sex::Male => 0,
            Sex::Female => 1,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Sex {
    type Err = GiziError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "M" | "MALE" => Ok(Sex::Male),
            "P" | "F" | "FEMALE" => Ok(Sex::Female),
            other => Err(GiziError::domain(format!("unknown sex code '{}'", other))),
        }
    }
}
