//! Caller-facing bet types, all with decimal odds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OddsError;
use crate::odds::DecimalOdds;
use crate::remote::{AvailableBet, PlacedBet};

/// An available bet as shown to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecimalBet {
    /// Remote bet identifier.
    pub bet_id: i64,
    /// Event the bet belongs to.
    pub event: String,
    /// Selection name.
    pub name: String,
    /// Decimal odds.
    pub odds: DecimalOdds,
}

impl TryFrom<AvailableBet> for DecimalBet {
    type Error = OddsError;

    fn try_from(bet: AvailableBet) -> Result<Self, Self::Error> {
        Ok(Self {
            odds: bet.odds.to_decimal()?,
            bet_id: bet.bet_id,
            event: bet.event,
            name: bet.name,
        })
    }
}

/// Inbound bet placement.
///
/// `odds` stays a raw decimal so any submitted value can be compared, and
/// rejected as incorrect, rather than failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceBetRequest {
    /// Bet to place.
    pub bet_id: i64,
    /// Decimal odds the caller expects.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub odds: Decimal,
    /// Amount wagered. Validated remotely.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub stake: Decimal,
}

/// Outbound confirmation of a placed bet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetReceipt {
    /// Bet placed.
    pub bet_id: i64,
    /// Event the bet belongs to.
    pub event: String,
    /// Selection name.
    pub name: String,
    /// Decimal odds the bet was accepted at.
    pub odds: DecimalOdds,
    /// Amount wagered.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub stake: Decimal,
    /// Remote transaction reference.
    pub transaction_id: i64,
}

impl TryFrom<PlacedBet> for BetReceipt {
    type Error = OddsError;

    fn try_from(placed: PlacedBet) -> Result<Self, Self::Error> {
        Ok(Self {
            odds: placed.odds.to_decimal()?,
            bet_id: placed.bet_id,
            event: placed.event,
            name: placed.name,
            stake: placed.stake,
            transaction_id: placed.transaction_id,
        })
    }
}
