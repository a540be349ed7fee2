//! Odds representations and conversion.
//!
//! The remote API speaks fractional odds (`10/1`); callers speak decimal
//! odds (`11`). Conversion goes through exact `Decimal` arithmetic only.

pub mod convert;
pub mod types;

pub use convert::{legacy_fractional, to_decimal};
pub use types::{DecimalOdds, FractionalOdds};
