use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GiziError {
    /// Input outside the supported domain (age, sex code, measurement range).
    #[error("Domain error: {0}")]
    Domain(String),

    /// Non-positive or non-finite spread handed to the Z-score formula.
    #[error("Invalid spread: {spread} (must be finite and > 0)")]
    InvalidSpread { spread: f64 },

    /// Rejected generation request or configuration.
    #[error("Config error: {0}")]
    Config(String),
}

impl GiziError {
    pub fn domain(msg: impl Into<String>) -> Self {
        GiziError::Domain(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        GiziError::Config(msg.into())
    }

    /// Stable code used by the JSON API.
    pub fn code(&self) -> &'static str {
        match self {
            GiziError::Domain(_) => "DOMAIN_ERROR",
            GiziError::InvalidSpread { .. } => "INVALID_SPREAD",
            GiziError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Every operation in the core is pure, so a failure never goes away on retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            GiziError::Domain(_) => false,
            GiziError::InvalidSpread { .. } => false,
            GiziError::Config(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GiziError>;
