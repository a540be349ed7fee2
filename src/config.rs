//! Application configuration loaded from environment variables.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use strum::{Display, EnumString};
use url::Url;

/// Which remote catalog implementation backs the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
    /// Live HTTP API at `remote_service_url`.
    #[default]
    Remote,
    /// Fixture files under `stub_folder`.
    Stub,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Remote Service ===
    /// Base URL of the remote betting API.
    #[serde(default = "default_remote_url")]
    pub remote_service_url: String,

    /// Catalog backend: `remote` or `stub`.
    #[serde(default)]
    pub backend: Backend,

    /// Folder holding `available` and `bets` fixtures for the stub backend.
    #[serde(default = "default_stub_folder")]
    pub stub_folder: String,

    // === Timeouts ===
    /// Overall HTTP client timeout in milliseconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_ms: u64,

    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Timeout on the catalog fetch in milliseconds.
    #[serde(default = "default_call_timeout")]
    pub catalog_timeout_ms: u64,

    /// Timeout on the forwarded placement in milliseconds.
    #[serde(default = "default_call_timeout")]
    pub placement_timeout_ms: u64,

    // === Server Configuration ===
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format: `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_remote_url() -> String {
    "http://skybettechtestapi.herokuapp.com".to_string()
}

fn default_stub_folder() -> String {
    "fixtures".to_string()
}

fn default_http_timeout() -> u64 {
    10_000
}

fn default_connect_timeout() -> u64 {
    1_000
}

fn default_call_timeout() -> u64 {
    5_000
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_service_url: default_remote_url(),
            backend: Backend::default(),
            stub_folder: default_stub_folder(),
            http_timeout_ms: default_http_timeout(),
            connect_timeout_ms: default_connect_timeout(),
            catalog_timeout_ms: default_call_timeout(),
            placement_timeout_ms: default_call_timeout(),
            port: default_port(),
            rust_log: default_log_level(),
            log_format: default_log_format(),
            metrics_enabled: true,
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.remote_service_url).map_err(|e| {
            format!(
                "REMOTE_SERVICE_URL must be a valid URL, was {:?}: {}",
                self.remote_service_url, e
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "REMOTE_SERVICE_URL must use http or https, was {:?}",
                url.scheme()
            ));
        }

        if self.http_timeout_ms == 0
            || self.connect_timeout_ms == 0
            || self.catalog_timeout_ms == 0
            || self.placement_timeout_ms == 0
        {
            return Err("timeouts must be greater than zero".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be greater than zero".to_string());
        }

        if self.backend == Backend::Stub && !Path::new(&self.stub_folder).is_dir() {
            return Err(format!(
                "STUB_FOLDER must be an existing folder, was {:?}",
                self.stub_folder
            ));
        }

        Ok(())
    }

    /// Timeout on the catalog fetch.
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }

    /// Timeout on the forwarded placement.
    pub fn placement_timeout(&self) -> Duration {
        Duration::from_millis(self.placement_timeout_ms)
    }

    /// Whether logs should be emitted as JSON.
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}
