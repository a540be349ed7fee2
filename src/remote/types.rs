//! Wire types of the remote betting API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::odds::FractionalOdds;

/// One entry of the remote `/available` catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableBet {
    /// Remote bet identifier.
    pub bet_id: i64,
    /// Event the bet belongs to.
    pub event: String,
    /// Selection name.
    pub name: String,
    /// Current odds.
    pub odds: FractionalOdds,
}

/// Body of a remote `POST /bets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractionalBetRequest {
    /// Bet to place.
    pub bet_id: i64,
    /// Odds taken from the catalog, never the caller's decimal.
    pub odds: FractionalOdds,
    /// Amount wagered.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub stake: Decimal,
}

/// Successful remote placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBet {
    /// Bet placed.
    pub bet_id: i64,
    /// Event the bet belongs to.
    pub event: String,
    /// Selection name.
    pub name: String,
    /// Odds the bet was accepted at.
    pub odds: FractionalOdds,
    /// Amount wagered.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub stake: Decimal,
    /// Remote transaction reference.
    pub transaction_id: i64,
}

/// JSON error body of a rejected remote call.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteErrorBody {
    /// Error string, e.g. `"Invalid Stake"`.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn available_bet_decodes_from_remote_json() {
        let json = r#"{"bet_id":1,"event":"World Cup 2018","name":"England","odds":{"numerator":10,"denominator":1}}"#;
        let bet: AvailableBet = serde_json::from_str(json).unwrap();

        assert_eq!(bet.bet_id, 1);
        assert_eq!(bet.name, "England");
        assert_eq!(bet.odds, FractionalOdds::new(10, 1).unwrap());
    }

    #[test]
    fn placed_bet_keeps_stake_exact() {
        let json = r#"{"bet_id":1,"event":"e","name":"n","odds":{"numerator":7,"denominator":4},"stake":10.10,"transaction_id":42}"#;
        let placed: PlacedBet = serde_json::from_str(json).unwrap();

        assert_eq!(placed.stake, dec!(10.10));
        assert_eq!(placed.stake.to_string(), "10.10");
        assert_eq!(placed.transaction_id, 42);
    }

    #[test]
    fn bet_request_encodes_stake_as_number() {
        let request = FractionalBetRequest {
            bet_id: 3,
            odds: FractionalOdds::new(3, 1).unwrap(),
            stake: dec!(2.5),
        };
        let json = serde_json::to_string(&request).unwrap();

        assert_eq!(
            json,
            r#"{"bet_id":3,"odds":{"numerator":3,"denominator":1},"stake":2.5}"#
        );
    }
}
