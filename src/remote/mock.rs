//! In-memory remote catalog for unit testing.
//!
//! Records every call so tests can assert that rejected bets were never
//! forwarded.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{BusinessError, ServiceError};
use crate::odds::FractionalOdds;

use super::types::{AvailableBet, FractionalBetRequest, PlacedBet};
use super::RemoteCatalog;

/// Failure a mock operation should produce.
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    /// Reject with a business error.
    Business(BusinessError),
    /// Fail as if the remote were down.
    Internal(String),
}

impl MockFailure {
    fn to_error(&self) -> ServiceError {
        match self {
            MockFailure::Business(kind) => ServiceError::BusinessLogic(*kind),
            MockFailure::Internal(message) => ServiceError::Internal(message.clone()),
        }
    }
}

/// Configuration for mock client behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Failure for `list_available`.
    pub catalog_failure: Option<MockFailure>,
    /// Failure for `place_bet`.
    pub placement_failure: Option<MockFailure>,
    /// Simulated latency in milliseconds, applied to both calls.
    pub latency_ms: u64,
}

/// Mock remote catalog for testing.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    /// Mock configuration.
    config: MockConfig,
    /// Catalog returned by `list_available`.
    bets: Arc<Mutex<Vec<AvailableBet>>>,
    /// Every request forwarded to `place_bet`.
    placements: Arc<Mutex<Vec<FractionalBetRequest>>>,
    /// Number of catalog fetches.
    catalog_calls: Arc<AtomicUsize>,
    /// Next transaction id handed out.
    next_transaction_id: Arc<AtomicI64>,
}

impl MockCatalog {
    /// Create a mock serving `bets`.
    pub fn new(bets: Vec<AvailableBet>) -> Self {
        Self::with_config(bets, MockConfig::default())
    }

    /// Create a mock with custom configuration.
    pub fn with_config(bets: Vec<AvailableBet>, config: MockConfig) -> Self {
        Self {
            config,
            bets: Arc::new(Mutex::new(bets)),
            placements: Arc::new(Mutex::new(Vec::new())),
            catalog_calls: Arc::new(AtomicUsize::new(0)),
            next_transaction_id: Arc::new(AtomicI64::new(1000)),
        }
    }

    /// Replace the served catalog, e.g. to move odds between fetch and placement.
    pub fn set_bets(&self, bets: Vec<AvailableBet>) {
        *self.bets.lock().unwrap() = bets;
    }

    /// Requests that reached `place_bet`.
    pub fn placements(&self) -> Vec<FractionalBetRequest> {
        self.placements.lock().unwrap().clone()
    }

    /// Number of `list_available` calls.
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

#[async_trait]
impl RemoteCatalog for MockCatalog {
    async fn list_available(&self) -> Result<Vec<AvailableBet>, ServiceError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if let Some(failure) = &self.config.catalog_failure {
            return Err(failure.to_error());
        }

        Ok(self.bets.lock().unwrap().clone())
    }

    async fn place_bet(&self, request: &FractionalBetRequest) -> Result<PlacedBet, ServiceError> {
        self.placements.lock().unwrap().push(request.clone());
        self.simulate_latency().await;

        if let Some(failure) = &self.config.placement_failure {
            return Err(failure.to_error());
        }

        // Mirror the remote's own checks against the current catalog.
        let bet = self
            .bets
            .lock()
            .unwrap()
            .iter()
            .find(|bet| bet.bet_id == request.bet_id)
            .cloned()
            .ok_or(ServiceError::BusinessLogic(BusinessError::InvalidBetId))?;
        if bet.odds != request.odds {
            return Err(ServiceError::BusinessLogic(BusinessError::IncorrectOdds));
        }

        Ok(PlacedBet {
            bet_id: bet.bet_id,
            event: bet.event,
            name: bet.name,
            odds: bet.odds,
            stake: request.stake,
            transaction_id: self.next_transaction_id.fetch_add(1, Ordering::SeqCst),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Builder for mock catalogs.
pub struct MockCatalogBuilder {
    bets: Vec<AvailableBet>,
    config: MockConfig,
}

impl MockCatalogBuilder {
    /// Start with an empty catalog.
    pub fn new() -> Self {
        Self {
            bets: Vec::new(),
            config: MockConfig::default(),
        }
    }

    /// Add a bet with `numerator/denominator` odds.
    ///
    /// Panics if either part is below 1.
    pub fn bet(mut self, bet_id: i64, name: &str, numerator: i64, denominator: i64) -> Self {
        let odds = FractionalOdds::new(numerator, denominator).expect("mock odds must be positive");
        self.bets.push(AvailableBet {
            bet_id,
            event: "World Cup 2018".to_string(),
            name: name.to_string(),
            odds,
        });
        self
    }

    /// Fail catalog fetches.
    pub fn fail_catalog(mut self, failure: MockFailure) -> Self {
        self.config.catalog_failure = Some(failure);
        self
    }

    /// Fail placements.
    pub fn fail_placement(mut self, failure: MockFailure) -> Self {
        self.config.placement_failure = Some(failure);
        self
    }

    /// Delay every call.
    pub fn latency_ms(mut self, latency_ms: u64) -> Self {
        self.config.latency_ms = latency_ms;
        self
    }

    /// Build the mock catalog.
    pub fn build(self) -> MockCatalog {
        MockCatalog::with_config(self.bets, self.config)
    }
}

impl Default for MockCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
