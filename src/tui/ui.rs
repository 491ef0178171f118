//! TUI rendering.
//!
//! ┌──────────────────────────────────────────────────┐
//! │  sensordash   channel 123456   12:04:31 UTC  ⟳   │
//! ├────────────────┬────────────────┬────────────────┤
//! │ Temperature °C │  Humidity %    │  Gas Level ppm │
//! │ ███████ 23.5   │  █████▌ 60.0   │  ██ 123        │
//! ├────────────────┴────────────────┴────────────────┤
//! │  Sensor Data History (Last 24 Hours)             │
//! │  ⣀⣠⠤⠔⠒ temperature / humidity / gas lines       │
//! ├──────────────────────────────────────────────────┤
//! │  1/2/3: range   e: export   r: refresh   q: quit │
//! └──────────────────────────────────────────────────┘
//!
//! Pure drawing over [`App`] and the precomputed view-models in `render`;
//! nothing here mutates state.

use ratatui::{prelude::*, widgets::*};

use super::app::{App, FormField, Screen};
use crate::render::{gauges, Channel};

// ---

pub fn draw(f: &mut Frame, app: &App) {
    match app.screen {
        Screen::Setup => draw_setup(f, app),
        Screen::Dashboard => draw_dashboard(f, app),
    }
}

// ---

fn draw_setup(f: &mut Frame, app: &App) {
    // ---
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // channel id
            Constraint::Length(3), // api key
            Constraint::Length(1), // status
            Constraint::Min(0),
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    let title = Paragraph::new(" Connect a telemetry channel")
        .style(Style::default().bold().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, rows[0]);

    draw_field(
        f,
        rows[1],
        "Channel ID",
        &app.form.channel_id,
        app.form.focus == FormField::ChannelId,
    );
    draw_field(
        f,
        rows[2],
        "Read API Key",
        &app.form.api_key,
        app.form.focus == FormField::ApiKey,
    );

    if let Some(status) = &app.form.status {
        let style = if status.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        f.render_widget(
            Paragraph::new(format!(" {}", status.message)).style(style),
            rows[3],
        );
    }

    let keys = Paragraph::new(" Tab: switch field   Enter: save   Esc: quit")
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(keys, rows[5]);
}

fn draw_field(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    // ---
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if focused { "█" } else { "" };

    let field = Paragraph::new(format!("{value}{cursor}")).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {label} ")),
    );
    f.render_widget(field, area);
}

// ---

fn draw_dashboard(f: &mut Frame, app: &App) {
    // ---
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // gauges
            Constraint::Min(10),   // chart
            Constraint::Length(1), // banner
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);

    if app.show_data {
        draw_gauges(f, rows[1], app);
        draw_chart(f, rows[2], app);
    } else {
        draw_hidden(f, rows[1], rows[2], app);
    }

    draw_banner(f, rows[3], app);

    let keys =
        Paragraph::new(" 1: 24h   2: 7d   3: 30d   e: export CSV   r: refresh   c: config   q: quit")
            .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(keys, rows[4]);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    // ---
    let spin = if app.loading { "  ⟳ fetching…" } else { "" };
    let updated = app
        .last_update()
        .map(|t| format!("  last update: {t}"))
        .unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(" sensordash ", Style::default().bold().fg(Color::Cyan)),
            Span::raw(" channel "),
            Span::styled(
                app.config.channel_id.clone(),
                Style::default().bold().fg(Color::Yellow),
            ),
            Span::styled(updated, Style::default().fg(Color::DarkGray)),
            Span::styled(spin, Style::default().fg(Color::DarkGray)),
        ]));

    f.render_widget(block, area);
}

fn draw_gauges(f: &mut Frame, area: Rect, app: &App) {
    // ---
    let Some(reading) = &app.latest else {
        let p = Paragraph::new(" Waiting for the first reading…")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(p, area);
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    for (view, col) in gauges(reading).into_iter().zip(cols.iter()) {
        let color = channel_color(view.channel);
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", view.channel.name())),
            )
            .gauge_style(Style::default().fg(color))
            .ratio(view.percentage.clamp(0.0, 1.0))
            .label(format!("{} {}", view.label, view.channel.unit()));
        f.render_widget(gauge, *col);
    }
}

fn draw_chart(f: &mut Frame, area: Rect, app: &App) {
    // ---
    let Some(chart_view) = &app.chart else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Sensor Data History ({}) ", app.range.label()));
        let p = Paragraph::new(" No historical data yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    };

    let mut datasets = Vec::new();
    for (series, color) in chart_view
        .series
        .iter()
        .zip([Color::Cyan, Color::Blue, Color::Green])
    {
        for (i, segment) in series.segments.iter().enumerate() {
            let mut dataset = Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(segment);
            // One legend entry per line; gap continuation segments stay unnamed
            if i == 0 {
                dataset = dataset.name(series.name);
            }
            datasets.push(dataset);
        }
    }

    let x_labels: Vec<Line> = chart_view.x_labels.iter().map(|l| Line::from(l.as_str())).collect();
    let y_labels = vec![
        Line::from("0"),
        Line::from(format!("{:.1}", chart_view.y_bounds[1])),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", chart_view.title)),
        )
        .x_axis(
            Axis::default()
                .bounds(chart_view.x_bounds)
                .labels(x_labels)
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds(chart_view.y_bounds)
                .labels(y_labels)
                .style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(chart, area);
}

fn draw_hidden(f: &mut Frame, gauges_area: Rect, chart_area: Rect, app: &App) {
    // ---
    // While a latest-fetch error is displayed the data sections stay hidden,
    // mirroring the original dashboard's show/hide behavior.
    let note = if app.loading {
        " Fetching sensor data…"
    } else {
        " Sensor data unavailable"
    };
    let p = Paragraph::new(note).style(Style::default().fg(Color::DarkGray));
    f.render_widget(p, gauges_area);
    f.render_widget(
        Block::default().borders(Borders::ALL).title(" History "),
        chart_area,
    );
}

fn draw_banner(f: &mut Frame, area: Rect, app: &App) {
    // ---
    let (text, style) = if let Some(error) = &app.error {
        (
            format!(" ⚠ {error}"),
            Style::default().fg(Color::White).bg(Color::Red),
        )
    } else if let Some(status) = &app.status {
        (format!(" {status}"), Style::default().fg(Color::Green))
    } else {
        (
            format!(" range: {}", app.range.label()),
            Style::default().fg(Color::DarkGray),
        )
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}

fn channel_color(channel: Channel) -> Color {
    // ---
    match channel {
        Channel::Temperature => Color::Cyan,
        Channel::Humidity => Color::Blue,
        Channel::Gas => Color::Green,
    }
}
