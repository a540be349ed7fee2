//! Betting proxy gateway entry point.

use std::net::SocketAddr;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bet_proxy::api::{create_router, AppState};
use bet_proxy::config::{Backend, Config};
use bet_proxy::metrics;
use bet_proxy::odds::{legacy_fractional, FractionalOdds};
use bet_proxy::remote::build_catalog;
use bet_proxy::service::{BetValidationService, CallTimeouts};
use bet_proxy::utils::shutdown_signal;

/// Betting proxy gateway.
#[derive(Parser, Debug)]
#[command(name = "bet-proxy")]
#[command(about = "Decimal-odds gateway in front of a fractional-odds betting API")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port, overriding PORT.
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP gateway (default).
    Serve {
        /// HTTP listen port, overriding PORT.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Fetch the catalog from the configured backend and print it.
    Available,

    /// Convert odds: `n/d` to decimal, or decimal to fractional.
    Odds {
        /// Fraction such as `7/4`, or decimal such as `2.75`.
        value: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let config = Config::load()?;
    init_logging(&config, args.verbose || config.verbose);

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config),
        Some(Command::Available) => cmd_available(config).await,
        Some(Command::Odds { value }) => cmd_odds(&value),
        Some(Command::Serve { port }) => cmd_serve(config, port.or(args.port)).await,
        None => cmd_serve(config, args.port).await,
    }
}

/// Install the tracing subscriber, pretty or JSON.
fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("bet_proxy=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log))
    };

    if config.json_logs() {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

/// Run the HTTP gateway until Ctrl-C or SIGTERM.
async fn cmd_serve(mut config: Config, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.port = port;
    }
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    metrics::init_metrics();
    let handle = if config.metrics_enabled {
        metrics::install_recorder()
    } else {
        None
    };

    let catalog = build_catalog(&config)?;
    let service = BetValidationService::with_timeouts(catalog, CallTimeouts::from(&config));
    info!(
        backend = service.backend(),
        catalog_timeout_ms = config.catalog_timeout_ms,
        placement_timeout_ms = config.placement_timeout_ms,
        "Bet validation service ready"
    );

    let mut state = AppState::new(service);
    if let Some(handle) = handle {
        state = state.with_metrics(handle);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config(config: Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("BET PROXY - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Backend: {}", config.backend);
    match config.backend {
        Backend::Remote => println!("  Remote URL: {}", config.remote_service_url),
        Backend::Stub => println!("  Stub Folder: {}", config.stub_folder),
    }
    println!("  Port: {}", config.port);
    println!(
        "  Timeouts: http {}ms, connect {}ms, catalog {}ms, placement {}ms",
        config.http_timeout_ms,
        config.connect_timeout_ms,
        config.catalog_timeout_ms,
        config.placement_timeout_ms
    );
    println!("  Log: {} ({})", config.rust_log, config.log_format);
    println!(
        "  Metrics: {}",
        if config.metrics_enabled { "Enabled" } else { "Disabled" }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the catalog with decimal odds.
async fn cmd_available(config: Config) -> anyhow::Result<()> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let catalog = build_catalog(&config)?;
    let service = BetValidationService::with_timeouts(catalog, CallTimeouts::from(&config));
    let bets = service.list_available().await?;

    println!("{:>6}  {:>8}  {:<20}  {}", "BET", "ODDS", "NAME", "EVENT");
    for bet in &bets {
        println!(
            "{:>6}  {:>8}  {:<20}  {}",
            bet.bet_id,
            bet.odds.to_string(),
            bet.name,
            bet.event
        );
    }
    println!("{} bets from {} backend", bets.len(), service.backend());

    Ok(())
}

/// Convert a fraction to decimal, or a decimal back through the legacy table.
fn cmd_odds(value: &str) -> anyhow::Result<()> {
    if value.contains('/') {
        let fraction = FractionalOdds::from_str(value)?;
        println!("{} = {}", fraction, fraction.to_decimal()?);
        return Ok(());
    }

    let decimal = Decimal::from_str(value.trim())
        .map_err(|e| anyhow::anyhow!("cannot parse {:?} as decimal odds: {}", value, e))?;
    match legacy_fractional(decimal) {
        Some(fraction) => println!("{} = {}", decimal.normalize(), fraction),
        None => println!("{} has no fractional equivalent", decimal.normalize()),
    }
    Ok(())
}
