//! File-backed stand-in for the remote betting API.
//!
//! Responses come from fixture files named after the operation
//! (`available`, `bets`) inside a configured folder. Every placement returns
//! the same `bets` fixture regardless of the request.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::{GatewayError, ServiceError};

use super::types::{AvailableBet, FractionalBetRequest, PlacedBet};
use super::RemoteCatalog;

/// Fixture file served for `list_available`.
pub const AVAILABLE_FIXTURE: &str = "available";
/// Fixture file served for `place_bet`.
pub const BETS_FIXTURE: &str = "bets";

/// Decodes fixture bytes into wire types.
pub trait FixtureCodec: Send + Sync {
    /// Decode `bytes` as `T`.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, ServiceError>;
}

/// JSON fixture decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl FixtureCodec for JsonCodec {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, ServiceError> {
        serde_json::from_slice(bytes).map_err(ServiceError::from)
    }
}

/// Remote catalog served from fixture files.
#[derive(Debug, Clone)]
pub struct StubCatalog<C = JsonCodec> {
    folder: PathBuf,
    codec: C,
}

impl StubCatalog<JsonCodec> {
    /// Serve JSON fixtures from `folder`, which must exist.
    pub fn new(folder: impl Into<PathBuf>) -> Result<Self, GatewayError> {
        Self::with_codec(folder, JsonCodec)
    }
}

impl<C: FixtureCodec> StubCatalog<C> {
    /// Serve fixtures from `folder` decoded by `codec`.
    pub fn with_codec(folder: impl Into<PathBuf>, codec: C) -> Result<Self, GatewayError> {
        let folder = folder.into();
        if !folder.is_dir() {
            return Err(GatewayError::InvalidConfig(format!(
                "stub folder {} does not exist",
                folder.display()
            )));
        }
        Ok(Self { folder, codec })
    }

    /// Folder fixtures are read from.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    async fn read_fixture<T: DeserializeOwned>(&self, name: &str) -> Result<T, ServiceError> {
        let path = self.folder.join(name);
        debug!(path = %path.display(), "Reading stub fixture");

        // Full paths are fine in messages here: this backend only runs in test setups.
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            ServiceError::Internal(format!("stub fixture {} unreadable: {}", path.display(), e))
        })?;

        self.codec.decode(&bytes)
    }
}

#[async_trait]
impl<C: FixtureCodec> RemoteCatalog for StubCatalog<C> {
    #[instrument(skip(self))]
    async fn list_available(&self) -> Result<Vec<AvailableBet>, ServiceError> {
        self.read_fixture(AVAILABLE_FIXTURE).await
    }

    #[instrument(skip(self, request), fields(bet_id = request.bet_id))]
    async fn place_bet(&self, request: &FractionalBetRequest) -> Result<PlacedBet, ServiceError> {
        self.read_fixture(BETS_FIXTURE).await
    }

    fn name(&self) -> &str {
        "stub"
    }
}
