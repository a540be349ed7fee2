//! Odds value types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OddsError;

/// British-style fractional odds, e.g. `10/1`.
///
/// Both parts are at least 1. On the wire this is
/// `{"numerator": n, "denominator": d}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFraction", into = "RawFraction")]
pub struct FractionalOdds {
    numerator: u32,
    denominator: u32,
}

/// Unchecked wire form, validated through `TryFrom`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawFraction {
    numerator: i64,
    denominator: i64,
}

impl FractionalOdds {
    /// Create fractional odds, rejecting parts below 1.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, OddsError> {
        let numerator = u32::try_from(numerator)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(OddsError::InvalidNumerator(numerator))?;
        let denominator = u32::try_from(denominator)
            .ok()
            .filter(|d| *d >= 1)
            .ok_or(OddsError::InvalidDenominator(denominator))?;

        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Construct from parts known to be positive.
    pub(crate) const fn from_parts(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Numerator.
    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    /// Denominator.
    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Convert to decimal odds (`1 + numerator/denominator`).
    pub fn to_decimal(&self) -> Result<DecimalOdds, OddsError> {
        super::convert::to_decimal(*self)
    }
}

impl TryFrom<RawFraction> for FractionalOdds {
    type Error = OddsError;

    fn try_from(raw: RawFraction) -> Result<Self, Self::Error> {
        FractionalOdds::new(raw.numerator, raw.denominator)
    }
}

impl From<FractionalOdds> for RawFraction {
    fn from(odds: FractionalOdds) -> Self {
        RawFraction {
            numerator: i64::from(odds.numerator),
            denominator: i64::from(odds.denominator),
        }
    }
}

impl fmt::Display for FractionalOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for FractionalOdds {
    type Err = OddsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (numerator, denominator) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| OddsError::Parse(s.to_string()))?;
        let numerator: i64 = numerator
            .trim()
            .parse()
            .map_err(|_| OddsError::Parse(s.to_string()))?;
        let denominator: i64 = denominator
            .trim()
            .parse()
            .map_err(|_| OddsError::Parse(s.to_string()))?;

        FractionalOdds::new(numerator, denominator)
    }
}

/// Decimal odds: the payout multiplier including the stake. Always at least 1.
///
/// Equality is by value, so `11`, `11.0` and `11.00` are the same odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DecimalOdds(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

impl DecimalOdds {
    /// Wrap a decimal, rejecting values below 1.
    pub fn new(value: Decimal) -> Result<Self, OddsError> {
        if value < Decimal::ONE {
            return Err(OddsError::BelowOne(value));
        }
        Ok(Self(value))
    }

    /// The underlying decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Whether a submitted decimal names these odds, ignoring scale.
    pub fn matches(&self, submitted: Decimal) -> bool {
        self.0 == submitted
    }
}

impl fmt::Display for DecimalOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<DecimalOdds> for Decimal {
    fn from(odds: DecimalOdds) -> Self {
        odds.0
    }
}
