//! Error taxonomy for the dashboard.
//!
//! Every variant here is recoverable: errors surface in the TUI banner (or
//! inline on the config form) and the next poll tick or user action proceeds
//! normally. Nothing in this taxonomy is fatal to the process.

use thiserror::Error;

// ---

#[derive(Debug, Error)]
pub enum DashError {
    /// Missing or empty config fields. Shown inline on the config form.
    #[error("{0}")]
    Validation(String),

    /// The API answered with a non-success HTTP status.
    #[error("API request failed with status {status}")]
    Fetch { status: u16 },

    /// The API answered 2xx but the body was not the JSON we expected.
    #[error("malformed API response: {0}")]
    Parse(#[source] serde_json::Error),

    /// Transport-level failure (DNS, connect, TLS, mid-body disconnect).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV export requested with no historical data loaded.
    #[error("no data available to export")]
    EmptyData,

    /// Config or CSV file I/O.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
