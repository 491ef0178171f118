//! Terminal UI: event loop, key handling, terminal lifecycle.
//!
//! One cooperative execution context owns all mutable state: the loop below
//! draws, then waits for either a poller event or a key event on mpsc
//! channels. Keys are read on a dedicated thread (crossterm's `read` blocks)
//! and forwarded into the async world.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::client::TelemetryClient;
use crate::config::ConfigStore;
use crate::models::TimeRange;
use crate::poller::{PollEvent, Poller};

mod app;
mod ui;

pub use app::{App, Screen};

// ---

/// Run the dashboard until the user quits.
pub async fn run(
    store: ConfigStore,
    config: crate::Config,
    client: TelemetryClient,
    interval: Duration,
) -> Result<()> {
    // ---
    let (poll_tx, mut poll_rx) = mpsc::channel::<PollEvent>(32);
    let (key_tx, mut key_rx) = mpsc::channel::<KeyEvent>(32);
    spawn_input_thread(key_tx);

    let mut app = App::new(config.clone());
    let mut poller = Poller::new(client, config, app.range, poll_tx);

    // A valid config gates the first poll; otherwise the user lands on the
    // setup screen and polling starts after a successful save.
    if app.config.is_valid() {
        poller.start(interval);
        app.generation = poller.generation();
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal before a panic message prints, or it is unreadable
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
        original_hook(info);
    }));

    let result = event_loop(
        &mut terminal,
        &mut app,
        &mut poller,
        &store,
        interval,
        &mut poll_rx,
        &mut key_rx,
    )
    .await;

    // Restore the terminal even when the loop errored
    let _ = std::panic::take_hook();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

// ---

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    poller: &mut Poller,
    store: &ConfigStore,
    interval: Duration,
    poll_rx: &mut mpsc::Receiver<PollEvent>,
    key_rx: &mut mpsc::Receiver<KeyEvent>,
) -> Result<()> {
    // ---
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            Some(event) = poll_rx.recv() => app.apply_poll(event),
            Some(key) = key_rx.recv() => handle_key(app, poller, store, interval, key),
            _ = tokio::time::sleep(Duration::from_millis(250)) => {}
        }

        if app.should_quit {
            poller.stop();
            return Ok(());
        }
    }
}

fn handle_key(
    app: &mut App,
    poller: &mut Poller,
    store: &ConfigStore,
    interval: Duration,
    key: KeyEvent,
) {
    // ---
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Ctrl-C quits from any screen
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::Setup => handle_setup_key(app, poller, store, interval, key),
        Screen::Dashboard => handle_dashboard_key(app, poller, interval, key),
    }
}

fn handle_setup_key(
    app: &mut App,
    poller: &mut Poller,
    store: &ConfigStore,
    interval: Duration,
    key: KeyEvent,
) {
    // ---
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab => app.form.toggle_focus(),
        KeyCode::Backspace => app.form.pop(),
        KeyCode::Char(c) => app.form.push(c),
        KeyCode::Enter => match store.save(&app.form.channel_id, &app.form.api_key) {
            Ok(config) => {
                app.form.status = Some(app::FormStatus {
                    message: "Configuration saved successfully".into(),
                    is_error: false,
                });
                app.config = config.clone();
                app.screen = Screen::Dashboard;

                poller.set_config(config);
                poller.start(interval);
                app.generation = poller.generation();
            }
            Err(e) => {
                // Validation failures stay inline and non-fatal
                app.form.status = Some(app::FormStatus {
                    message: e.to_string(),
                    is_error: true,
                });
            }
        },
        _ => {}
    }
}

fn handle_dashboard_key(app: &mut App, poller: &mut Poller, interval: Duration, key: KeyEvent) {
    // ---
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => select_range(app, poller, TimeRange::H24),
        KeyCode::Char('2') => select_range(app, poller, TimeRange::D7),
        KeyCode::Char('3') => select_range(app, poller, TimeRange::D30),
        KeyCode::Char('e') => match crate::export::write_csv(&app.history, app.range, Path::new(".")) {
            Ok(path) => {
                app.status = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                app.error = Some(e.to_string());
            }
        },
        KeyCode::Char('r') => {
            // Full restart: immediate refetch plus a fresh schedule
            poller.start(interval);
            app.generation = poller.generation();
        }
        KeyCode::Char('c') => {
            app.form = app::SetupForm::prefilled(&app.config);
            app.screen = Screen::Setup;
        }
        _ => {}
    }
}

fn select_range(app: &mut App, poller: &mut Poller, range: TimeRange) {
    // ---
    if app.range == range {
        return;
    }
    app.range = range;
    poller.select_range(range);
}

fn spawn_input_thread(tx: mpsc::Sender<KeyEvent>) {
    // ---
    std::thread::spawn(move || loop {
        match crossterm::event::read() {
            Ok(Event::Key(key)) => {
                if tx.blocking_send(key).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });
}
