//! Remote betting API access.
//!
//! This module handles:
//! - Wire types of the remote API (fractional odds)
//! - The live HTTP client and its response classification
//! - A fixture-file stub for test environments
//! - Mock catalog for testing

pub mod client;
pub mod mock;
pub mod stub;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{Backend, Config};
use crate::error::{GatewayError, ServiceError};

pub use client::{classify_error, HttpCatalogClient};
pub use mock::{MockCatalog, MockCatalogBuilder, MockConfig, MockFailure};
pub use stub::{FixtureCodec, JsonCodec, StubCatalog};
pub use types::{AvailableBet, FractionalBetRequest, PlacedBet};

/// The two operations the gateway needs from the remote betting API.
///
/// Implementations classify every failure into [`ServiceError`]: business
/// rejections as `BusinessLogic`, transport and remote health problems as
/// `Internal`.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Fetch the current catalog of available bets, in remote order.
    async fn list_available(&self) -> Result<Vec<AvailableBet>, ServiceError>;

    /// Place a bet with fractional odds.
    async fn place_bet(&self, request: &FractionalBetRequest) -> Result<PlacedBet, ServiceError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Build the catalog backend selected by `config.backend`.
pub fn build_catalog(config: &Config) -> Result<Arc<dyn RemoteCatalog>, GatewayError> {
    let catalog: Arc<dyn RemoteCatalog> = match config.backend {
        Backend::Remote => {
            info!(url = %config.remote_service_url, "Using remote betting API");
            Arc::new(HttpCatalogClient::new(config)?)
        }
        Backend::Stub => {
            info!(folder = %config.stub_folder, "Using stub fixtures");
            Arc::new(StubCatalog::new(&config.stub_folder)?)
        }
    };
    Ok(catalog)
}
