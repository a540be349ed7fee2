//! Bet validation service.
//!
//! Sits between the HTTP surface and the remote catalog: converts odds to
//! decimal for callers, checks submitted odds against the live catalog and
//! forwards accepted bets with the catalog's fractional odds.

pub mod types;
pub mod validation;

pub use types::{BetReceipt, DecimalBet, PlaceBetRequest};
pub use validation::{check_odds, find_available_bet, BetValidationService, CallTimeouts};
