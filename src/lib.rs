//! Betting proxy gateway.
//!
//! Fronts a remote betting API that speaks fractional odds and presents
//! decimal odds to callers. Submitted bets are validated against the live
//! catalog before being forwarded:
//!
//! ```text
//! caller  POST /bets {bet_id: 4, odds: 2.75, stake: 10}
//!   -> fetch catalog, bet 4 is 7/4
//!   -> 7/4 is 2.75 decimal, match
//!   -> remote POST /bets {bet_id: 4, odds: {numerator: 7, denominator: 4}, stake: 10}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`odds`]: Fractional and decimal odds, and conversion between them
//! - [`remote`]: Remote betting API client, fixture stub and mock
//! - [`service`]: Bet validation and forwarding
//! - [`api`]: HTTP surface
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod odds;
pub mod remote;
pub mod service;
pub mod utils;

pub use config::Config;
pub use error::{BusinessError, GatewayError, OddsError, Result, ServiceError};
