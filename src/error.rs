//! Unified error types for the bet proxy.

use std::fmt;

use rust_decimal::Decimal;
use strum::{EnumIter, IntoStaticStr};
use thiserror::Error;

/// Unified error type for startup, configuration and CLI paths.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Bet validation or remote call error.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// Odds construction or conversion error.
    #[error("odds error: {0}")]
    Odds(#[from] OddsError),

    /// HTTP client construction error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The closed set of business-logic rejections shared with the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum BusinessError {
    /// Remote rejected the bet for a reason we do not recognise.
    Unknown,
    /// Submitted odds differ from the live odds.
    IncorrectOdds,
    /// Odds are malformed.
    InvalidOdds,
    /// No available bet carries the submitted id.
    InvalidBetId,
    /// Stake is out of range.
    InvalidStake,
}

impl BusinessError {
    /// Numeric code, stable across the wire.
    pub fn code(self) -> u8 {
        match self {
            BusinessError::Unknown => 0,
            BusinessError::IncorrectOdds => 1,
            BusinessError::InvalidOdds => 2,
            BusinessError::InvalidBetId => 3,
            BusinessError::InvalidStake => 4,
        }
    }

    /// Human-readable description, also the remote API's error string.
    pub fn description(self) -> &'static str {
        match self {
            BusinessError::Unknown => "Unknown",
            BusinessError::IncorrectOdds => "Incorrect Odds",
            BusinessError::InvalidOdds => "Invalid Odds",
            BusinessError::InvalidBetId => "Invalid Bet ID",
            BusinessError::InvalidStake => "Invalid Stake",
        }
    }

    /// Map a remote error string onto a kind. Unrecognised strings become `Unknown`.
    pub fn from_remote(message: &str) -> Self {
        match message {
            "Invalid Odds" => BusinessError::InvalidOdds,
            "Incorrect Odds" => BusinessError::IncorrectOdds,
            "Invalid Bet ID" => BusinessError::InvalidBetId,
            "Invalid Stake" => BusinessError::InvalidStake,
            _ => BusinessError::Unknown,
        }
    }

    /// Label used for metrics.
    pub fn as_label(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

impl std::error::Error for BusinessError {}

/// Error returned by every core operation.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The bet was semantically rejected.
    #[error("business logic error: {0}")]
    BusinessLogic(BusinessError),

    /// The remote service or transport failed. The message is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Build an internal error from anything displayable.
    pub fn internal(message: impl fmt::Display) -> Self {
        ServiceError::Internal(message.to_string())
    }

    /// Business kind, if this is a business rejection.
    pub fn business_kind(&self) -> Option<BusinessError> {
        match self {
            ServiceError::BusinessLogic(kind) => Some(*kind),
            ServiceError::Internal(_) => None,
        }
    }
}

impl From<BusinessError> for ServiceError {
    fn from(kind: BusinessError) -> Self {
        ServiceError::BusinessLogic(kind)
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Internal(format!("remote request timed out: {}", e))
        } else {
            ServiceError::Internal(format!("remote request failed: {}", e))
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Internal(format!("malformed remote payload: {}", e))
    }
}

// Odds from the remote side that we cannot convert mean the remote data is broken.
impl From<OddsError> for ServiceError {
    fn from(e: OddsError) -> Self {
        ServiceError::Internal(format!("unusable remote odds: {}", e))
    }
}

/// Odds construction and conversion errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OddsError {
    /// Numerator below 1 or outside the supported range.
    #[error("odds numerator must be a positive integer, got {0}")]
    InvalidNumerator(i64),

    /// Denominator below 1 or outside the supported range.
    #[error("odds denominator must be a positive integer, got {0}")]
    InvalidDenominator(i64),

    /// The fraction has no exact decimal expansion.
    #[error("{numerator}/{denominator} has no exact decimal representation")]
    NotRepresentable {
        /// Numerator of the rejected fraction.
        numerator: u32,
        /// Denominator of the rejected fraction.
        denominator: u32,
    },

    /// Decimal odds below 1.
    #[error("decimal odds must be at least 1, got {0}")]
    BelowOne(Decimal),

    /// Text could not be parsed as odds.
    #[error("cannot parse odds from {0:?}")]
    Parse(String),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, GatewayError>;
