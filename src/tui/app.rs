//! Application state for the dashboard TUI.
//!
//! One struct owns everything the UI shows: config, current reading,
//! historical series, selected range, loading/error banners. All mutation
//! happens on the single UI event loop; the poller only sends events.

use crate::config::Config;
use crate::models::{Reading, TimeRange};
use crate::poller::PollEvent;
use crate::render::ChartView;

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Credential form, shown until a valid config is saved.
    Setup,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    ChannelId,
    ApiKey,
}

/// Inline status under the setup form (maps to the original's config-status
/// line: green on save, red on validation failure).
#[derive(Debug, Clone)]
pub struct FormStatus {
    pub message: String,
    pub is_error: bool,
}

#[derive(Debug, Clone)]
pub struct SetupForm {
    // ---
    pub channel_id: String,
    pub api_key: String,
    pub focus: FormField,
    pub status: Option<FormStatus>,
}

impl SetupForm {
    // ---
    pub fn prefilled(config: &Config) -> Self {
        Self {
            channel_id: config.channel_id.clone(),
            api_key: config.api_key.clone(),
            focus: FormField::ChannelId,
            status: None,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::ChannelId => FormField::ApiKey,
            FormField::ApiKey => FormField::ChannelId,
        };
    }

    pub fn push(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn pop(&mut self) {
        self.focused_mut().pop();
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::ChannelId => &mut self.channel_id,
            FormField::ApiKey => &mut self.api_key,
        }
    }
}

// ---

pub struct App {
    // ---
    pub screen: Screen,
    pub form: SetupForm,
    pub config: Config,
    pub range: TimeRange,
    pub latest: Option<Reading>,
    pub history: Vec<Reading>,
    pub chart: Option<ChartView>,
    pub loading: bool,
    /// Error banner; cleared when the next fetch pass starts.
    pub error: Option<String>,
    /// Non-error status line (export confirmations and the like).
    pub status: Option<String>,
    /// Data sections are hidden while a latest-fetch error is on screen.
    pub show_data: bool,
    /// Generation of the poll schedule this app currently trusts.
    pub generation: u64,
    pub should_quit: bool,
}

impl App {
    // ---
    pub fn new(config: Config) -> Self {
        // ---
        let screen = if config.is_valid() {
            Screen::Dashboard
        } else {
            Screen::Setup
        };

        Self {
            screen,
            form: SetupForm::prefilled(&config),
            config,
            range: TimeRange::default(),
            latest: None,
            history: Vec::new(),
            chart: None,
            loading: false,
            error: None,
            status: None,
            show_data: false,
            generation: 0,
            should_quit: false,
        }
    }

    /// Fold a poller event into the state. Events from stale generations
    /// (cancelled schedules whose fetches were still in flight) are dropped
    /// so they can never overwrite newer data.
    pub fn apply_poll(&mut self, event: PollEvent) {
        // ---
        if event.generation() != self.generation {
            tracing::debug!(
                "Dropping stale poll event (generation {} != {})",
                event.generation(),
                self.generation
            );
            return;
        }

        match event {
            PollEvent::Started { .. } => {
                self.loading = true;
                self.error = None;
            }
            PollEvent::Latest { result: Ok(reading), .. } => {
                self.latest = Some(reading);
                self.show_data = true;
                // Loading stays on: the history refetch is still running
            }
            PollEvent::Latest { result: Err(e), .. } => {
                self.loading = false;
                self.show_data = false;
                self.error = Some(format!("Failed to fetch sensor data: {e}"));
            }
            PollEvent::History { range, result: Ok(series), .. } => {
                self.loading = false;
                // Chart is rebuilt wholesale; no incremental merge
                self.chart = Some(ChartView::build(&series, range));
                self.history = series;
            }
            PollEvent::History { result: Err(e), .. } => {
                self.loading = false;
                self.error = Some(format!("Failed to fetch historical data: {e}"));
            }
        }
    }

    /// "Last update" line from the latest reading's own timestamp.
    pub fn last_update(&self) -> Option<String> {
        self.latest
            .as_ref()
            .map(|r| r.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    }
}

// ---

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::error::DashError;
    use chrono::{TimeZone, Utc};

    fn app() -> App {
        App::new(Config {
            channel_id: "1".into(),
            api_key: "k".into(),
        })
    }

    fn reading() -> Reading {
        Reading {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            temperature: Some(20.0),
            humidity: Some(50.0),
            gas: Some(100.0),
        }
    }

    #[test]
    fn valid_config_starts_on_dashboard() {
        // ---
        assert_eq!(app().screen, Screen::Dashboard);
        assert_eq!(App::new(Config::default()).screen, Screen::Setup);
    }

    #[test]
    fn stale_generation_events_are_dropped() {
        // ---
        let mut app = app();
        app.generation = 2;

        app.apply_poll(PollEvent::Latest {
            generation: 1,
            result: Ok(reading()),
        });

        assert!(app.latest.is_none());
        assert!(!app.show_data);
    }

    #[test]
    fn fetch_start_clears_the_error_banner() {
        // ---
        let mut app = app();
        app.error = Some("old failure".into());

        app.apply_poll(PollEvent::Started { generation: 0 });

        assert!(app.loading);
        assert!(app.error.is_none());
    }

    #[test]
    fn latest_failure_hides_data_sections() {
        // ---
        let mut app = app();
        app.show_data = true;

        app.apply_poll(PollEvent::Latest {
            generation: 0,
            result: Err(DashError::Fetch { status: 503 }),
        });

        assert!(!app.show_data);
        assert!(!app.loading);
        let banner = app.error.unwrap();
        assert!(banner.contains("503"), "banner was: {banner}");
    }

    #[test]
    fn history_success_rebuilds_the_chart() {
        // ---
        let mut app = app();

        app.apply_poll(PollEvent::History {
            generation: 0,
            range: TimeRange::D7,
            result: Ok(vec![reading()]),
        });

        assert_eq!(app.history.len(), 1);
        let chart = app.chart.expect("chart built");
        assert_eq!(chart.title, "Sensor Data History (Last 7 Days)");
    }

    #[test]
    fn form_editing() {
        // ---
        let mut form = SetupForm::prefilled(&Config::default());

        form.push('4');
        form.push('2');
        form.toggle_focus();
        form.push('K');
        form.pop();
        form.push('X');

        assert_eq!(form.channel_id, "42");
        assert_eq!(form.api_key, "X");
    }
}
