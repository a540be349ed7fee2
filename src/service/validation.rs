//! Bet validation against the live remote catalog.
//!
//! Placement is check-then-act: the catalog is fetched, the submitted odds
//! are checked against it, and only then is the bet forwarded. The remote
//! catalog can change between the fetch and the forward; that window is
//! accepted; the remote re-validates on its side and its rejection is
//! passed through unchanged.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{BusinessError, ServiceError};
use crate::metrics::{self, OP_CATALOG, OP_PLACEMENT};
use crate::odds::FractionalOdds;
use crate::remote::{AvailableBet, FractionalBetRequest, RemoteCatalog};

use super::types::{BetReceipt, DecimalBet, PlaceBetRequest};

/// Upper bounds on the two outbound calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTimeouts {
    /// Catalog fetch timeout.
    pub catalog: Duration,
    /// Placement timeout.
    pub placement: Duration,
}

impl Default for CallTimeouts {
    fn default() -> Self {
        Self {
            catalog: Duration::from_secs(5),
            placement: Duration::from_secs(5),
        }
    }
}

impl From<&Config> for CallTimeouts {
    fn from(config: &Config) -> Self {
        Self {
            catalog: config.catalog_timeout(),
            placement: config.placement_timeout(),
        }
    }
}

/// Validates bets against the remote catalog and forwards them.
#[derive(Clone)]
pub struct BetValidationService {
    catalog: Arc<dyn RemoteCatalog>,
    timeouts: CallTimeouts,
}

impl BetValidationService {
    /// Create a service with default timeouts.
    pub fn new(catalog: Arc<dyn RemoteCatalog>) -> Self {
        Self::with_timeouts(catalog, CallTimeouts::default())
    }

    /// Create a service with explicit timeouts.
    pub fn with_timeouts(catalog: Arc<dyn RemoteCatalog>, timeouts: CallTimeouts) -> Self {
        Self { catalog, timeouts }
    }

    /// Backend name.
    pub fn backend(&self) -> &str {
        self.catalog.name()
    }

    /// Available bets with decimal odds, in remote order.
    #[instrument(skip(self))]
    pub async fn list_available(&self) -> Result<Vec<DecimalBet>, ServiceError> {
        let available = self.fetch_catalog().await?;

        let bets = available
            .into_iter()
            .map(DecimalBet::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = bets.len(), "Converted available bets");
        Ok(bets)
    }

    /// Validate `request` against the live catalog and forward it.
    ///
    /// Fails with `InvalidBetId` if no bet carries the id and with
    /// `IncorrectOdds` if the odds differ; neither case reaches the remote
    /// placement endpoint. Remote errors are returned unchanged.
    #[instrument(skip(self, request), fields(bet_id = request.bet_id))]
    pub async fn place_bet(&self, request: &PlaceBetRequest) -> Result<BetReceipt, ServiceError> {
        let available = self.fetch_catalog().await?;

        let odds = match check_odds(&available, request) {
            Ok(odds) => odds,
            Err(e) => {
                if let Some(kind) = e.business_kind() {
                    warn!(submitted = %request.odds, error = %kind, "Bet rejected locally");
                }
                return Err(e);
            }
        };

        let forward = FractionalBetRequest {
            bet_id: request.bet_id,
            odds,
            stake: request.stake,
        };

        let start = Instant::now();
        let placed = with_timeout(
            self.timeouts.placement,
            OP_PLACEMENT,
            self.catalog.place_bet(&forward),
        )
        .await;
        metrics::record_remote_call_latency(OP_PLACEMENT, start);
        let placed = placed?;

        let receipt = BetReceipt::try_from(placed)?;
        metrics::record_bet_placed();
        info!(
            transaction_id = receipt.transaction_id,
            odds = %receipt.odds,
            stake = %receipt.stake,
            "Bet placed"
        );

        Ok(receipt)
    }

    async fn fetch_catalog(&self) -> Result<Vec<AvailableBet>, ServiceError> {
        let start = Instant::now();
        let result = with_timeout(
            self.timeouts.catalog,
            OP_CATALOG,
            self.catalog.list_available(),
        )
        .await;
        metrics::record_remote_call_latency(OP_CATALOG, start);
        result
    }
}

/// Bound a remote call; an elapsed timeout is an internal error.
async fn with_timeout<T>(
    limit: Duration,
    operation: &str,
    call: impl Future<Output = Result<T, ServiceError>>,
) -> Result<T, ServiceError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Internal(format!(
            "{} call timed out after {}ms",
            operation,
            limit.as_millis()
        ))),
    }
}

/// First bet in catalog order carrying `bet_id`. Uniqueness is not checked.
pub fn find_available_bet(available: &[AvailableBet], bet_id: i64) -> Option<&AvailableBet> {
    available.iter().find(|bet| bet.bet_id == bet_id)
}

/// Check submitted decimal odds against the catalog.
///
/// Returns the catalog's fractional odds to forward upstream. Comparison is
/// by decimal value, so `2` matches `2.00`. Catalog odds with no exact
/// decimal form are broken remote data and fail as `Internal`.
pub fn check_odds(
    available: &[AvailableBet],
    request: &PlaceBetRequest,
) -> Result<FractionalOdds, ServiceError> {
    let bet = find_available_bet(available, request.bet_id).ok_or(BusinessError::InvalidBetId)?;

    let current = bet.odds.to_decimal()?;

    if !current.matches(request.odds) {
        return Err(BusinessError::IncorrectOdds.into());
    }

    Ok(bet.odds)
}
