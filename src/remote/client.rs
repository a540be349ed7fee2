//! HTTP client for the remote betting API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::error::{BusinessError, GatewayError, ServiceError};

use super::types::{AvailableBet, FractionalBetRequest, PlacedBet, RemoteErrorBody};
use super::RemoteCatalog;

/// Remote betting API client.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL, always ending in `/`.
    base_url: Url,
}

impl HttpCatalogClient {
    /// Create a client from config with its HTTP timeouts.
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Self::with_http(http, &config.remote_service_url)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Result<Self, GatewayError> {
        let mut base_url = Url::parse(base_url).map_err(|e| {
            GatewayError::InvalidConfig(format!("invalid remote base URL {:?}: {}", base_url, e))
        })?;

        // Url::join drops the last path segment unless it ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { http, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|e| ServiceError::internal(format!("cannot build URL for {}: {}", path, e)))
    }
}

#[async_trait]
impl RemoteCatalog for HttpCatalogClient {
    #[instrument(skip(self))]
    async fn list_available(&self) -> Result<Vec<AvailableBet>, ServiceError> {
        let url = self.endpoint("available")?;
        debug!(%url, "Fetching available bets");

        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let bets: Vec<AvailableBet> = decode_response(response).await?;
        debug!(count = bets.len(), "Fetched available bets");

        Ok(bets)
    }

    #[instrument(skip(self, request), fields(bet_id = request.bet_id))]
    async fn place_bet(&self, request: &FractionalBetRequest) -> Result<PlacedBet, ServiceError> {
        let url = self.endpoint("bets")?;
        debug!(%url, odds = %request.odds, stake = %request.stake, "Forwarding bet");

        let response = self
            .http
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let placed: PlacedBet = decode_response(response).await?;
        debug!(transaction_id = placed.transaction_id, "Bet placed remotely");

        Ok(placed)
    }

    fn name(&self) -> &str {
        "remote"
    }
}

/// Decode a 2xx body as `T`, or classify the failure.
async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&body).map_err(ServiceError::from);
    }

    Err(classify_error(status, &body))
}

/// Map a non-2xx remote response onto the error taxonomy.
///
/// Any 5xx is `Internal`: the remote sends plain-text bodies for those and
/// they mean the service itself is unhealthy. Other statuses must carry a
/// JSON `{"error": "..."}` body, mapped through [`BusinessError::from_remote`].
pub fn classify_error(status: StatusCode, body: &[u8]) -> ServiceError {
    if status.is_server_error() {
        let text = String::from_utf8_lossy(body);
        warn!(%status, body = %text.trim(), "Remote service error");
        return ServiceError::Internal(format!(
            "remote service returned {}: {}",
            status,
            text.trim()
        ));
    }

    match serde_json::from_slice::<RemoteErrorBody>(body) {
        Ok(error) => {
            let kind = BusinessError::from_remote(&error.error);
            if kind == BusinessError::Unknown {
                warn!(%status, error = %error.error, "Unrecognised remote error string");
            }
            ServiceError::BusinessLogic(kind)
        }
        Err(e) => ServiceError::Internal(format!(
            "remote service returned {} with unreadable error body: {}",
            status, e
        )),
    }
}
