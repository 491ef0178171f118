//! Fixed-interval polling of the telemetry API.
//!
//! Each tick runs the full fetch chain: latest reading first, then (only on
//! success) a history refetch for the currently selected range. Results are
//! delivered as [`PollEvent`]s over an mpsc channel; the UI loop is the only
//! consumer and the only mutator of application state.
//!
//! Overlap guard: every `start` aborts the previous schedule and bumps a
//! generation counter that is stamped onto every event. A slow in-flight
//! fetch from a cancelled schedule may still complete, but its events carry
//! the stale generation and the app drops them, so they can never overwrite
//! newer state.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::TelemetryClient;
use crate::config::Config;
use crate::error::DashError;
use crate::models::{Reading, TimeRange};

// ---

/// Wall-clock poll interval (matches the upstream dashboard's 30s refresh).
pub const POLL_INTERVAL: Duration = Duration::from_millis(30_000);

/// Lifecycle events emitted by the poller, all stamped with the generation
/// of the schedule that produced them.
#[derive(Debug)]
pub enum PollEvent {
    /// A fetch pass is starting; the UI shows the loading indicator and
    /// clears any previous error banner.
    Started { generation: u64 },
    Latest {
        generation: u64,
        result: Result<Reading, DashError>,
    },
    History {
        generation: u64,
        range: TimeRange,
        result: Result<Vec<Reading>, DashError>,
    },
}

impl PollEvent {
    // ---
    pub fn generation(&self) -> u64 {
        match self {
            Self::Started { generation }
            | Self::Latest { generation, .. }
            | Self::History { generation, .. } => *generation,
        }
    }
}

// ---

pub struct Poller {
    // ---
    client: TelemetryClient,
    config: Config,
    tx: mpsc::Sender<PollEvent>,
    range_tx: watch::Sender<TimeRange>,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    // ---
    pub fn new(
        client: TelemetryClient,
        config: Config,
        range: TimeRange,
        tx: mpsc::Sender<PollEvent>,
    ) -> Self {
        // ---
        let (range_tx, _) = watch::channel(range);

        Self {
            client,
            config,
            tx,
            range_tx,
            generation: 0,
            handle: None,
        }
    }

    /// Generation of the most recently started schedule. The app compares
    /// incoming event generations against this.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Swap in new credentials (after a config re-save). Takes effect on the
    /// next `start`.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Start (or restart) the poll schedule.
    ///
    /// Cancels any previously scheduled poll first. The first tick fires
    /// immediately, so starting doubles as the initial fetch.
    pub fn start(&mut self, interval: Duration) {
        // ---
        self.stop();
        self.generation += 1;

        let generation = self.generation;
        let client = self.client.clone();
        let config = self.config.clone();
        let tx = self.tx.clone();
        let mut range_rx = self.range_tx.subscribe();

        tracing::debug!("Starting poll schedule, generation {}", generation);

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let range = *range_rx.borrow_and_update();
                poll_once(&client, &config, range, generation, &tx).await;
            }
        }));
    }

    /// Change the selected range: future ticks use it, and a one-shot
    /// history refetch runs right away so the chart does not wait up to a
    /// full interval.
    pub fn select_range(&mut self, range: TimeRange) {
        // ---
        self.range_tx.send_replace(range);

        let generation = self.generation;
        let client = self.client.clone();
        let config = self.config.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let _ = tx.send(PollEvent::Started { generation }).await;
            let result = client.fetch_history(&config, range).await;
            let _ = tx
                .send(PollEvent::History {
                    generation,
                    range,
                    result,
                })
                .await;
        });
    }

    /// Cancel the schedule. In-flight fetches are aborted with the task.
    pub fn stop(&mut self) {
        // ---
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("Cancelled poll schedule, generation {}", self.generation);
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---

async fn poll_once(
    client: &TelemetryClient,
    config: &Config,
    range: TimeRange,
    generation: u64,
    tx: &mpsc::Sender<PollEvent>,
) {
    // ---
    let _ = tx.send(PollEvent::Started { generation }).await;

    let result = client.fetch_latest(config).await;
    let fetched = result.is_ok();
    let _ = tx.send(PollEvent::Latest { generation, result }).await;

    // History refresh piggybacks on a successful latest-fetch
    if fetched {
        let result = client.fetch_history(config, range).await;
        let _ = tx
            .send(PollEvent::History {
                generation,
                range,
                result,
            })
            .await;
    }
}

// ---
