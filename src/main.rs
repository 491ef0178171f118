//! Application entry point for the `sensordash` terminal dashboard.
//!
//! This binary orchestrates the startup sequence:
//! - Initializing structured logging/tracing
//! - Loading `.env` and CLI arguments
//! - Loading the persisted channel config (saving CLI-provided credentials)
//! - Launching the TUI event loop with the 30-second poller
//!
//! # Environment Variables
//! - `SENSORDASH_API_URL` (optional) – alternate telemetry API base URL
//! - `SENSORDASH_CONFIG` (optional) – path of the persisted config file
//! - `DASH_LOG_LEVEL` (optional) – log verbosity (default: `warn`; logs share
//!   the terminal with the TUI, so keep this quiet unless debugging)
//! - `DASH_SPAN_EVENTS` (optional) – span event mode for tracing

use std::{env, io::IsTerminal};

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use anyhow::Result;

use sensordash::{ConfigStore, TelemetryClient, DEFAULT_BASE_URL, POLL_INTERVAL};

// ---

/// Terminal dashboard for live IoT sensor telemetry.
#[derive(Debug, Parser)]
#[command(name = "sensordash", version, about)]
struct Cli {
    /// Telemetry channel ID. Together with --api-key, saved to the persisted
    /// config before the dashboard starts.
    #[arg(long)]
    channel_id: Option<String>,

    /// Read API key for the channel.
    #[arg(long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let cli = Cli::parse();
    let store = ConfigStore::from_env();
    let mut config = store.load();

    // CLI-provided credentials are saved immediately, mirroring the old
    // prefill-and-save flow; validation errors are fatal here since there is
    // no form on screen yet to show them on.
    if let (Some(channel_id), Some(api_key)) = (&cli.channel_id, &cli.api_key) {
        config = store.save(channel_id, api_key)?;
    }

    config.log_config();

    let base_url = env::var("SENSORDASH_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    tracing::info!("Telemetry API base URL: {}", base_url);

    let client = TelemetryClient::with_base_url(base_url);

    sensordash::run(store, config, client, POLL_INTERVAL).await
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// Configures [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `DASH_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by the `DASH_LOG_LEVEL` env var (default `warn`,
///   since stderr shares the terminal with the dashboard)
///
/// Called once at startup before any logging macros are invoked.
fn init_tracing() {
    // ---
    let span_events = match env::var("DASH_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    // Determine if we should use colors
    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stderr().is_terminal(),
    };

    // Use RUST_LOG if available, otherwise fall back to DASH_LOG_LEVEL
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("DASH_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "warn",
        };
        EnvFilter::new(level.to_string())
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
