//! View-model computation for the gauges and the history chart.
//!
//! This module is pure math over parsed readings; terminal drawing lives in
//! `tui::ui`. Keeping the two apart means everything the widgets display
//! (percentages, arc offsets, labels, chart segments, axis bounds) is
//! computed and tested here without a terminal.

use chrono::{DateTime, Utc};

use crate::models::{BucketUnit, Reading, TimeRange};

// ---

/// Arc length of the circular gauge (radius 45).
pub const GAUGE_CIRCUMFERENCE: f64 = 2.0 * std::f64::consts::PI * 45.0;

/// The three telemetry channels with their fixed gauge maxima.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Temperature,
    Humidity,
    Gas,
}

impl Channel {
    // ---
    pub fn max(self) -> f64 {
        match self {
            Self::Temperature => 50.0,
            Self::Humidity => 100.0,
            Self::Gas => 1000.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Gas => "Gas Level",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity => "%",
            Self::Gas => "ppm",
        }
    }

    /// Decimal places shown on the numeric label.
    fn decimals(self) -> usize {
        match self {
            Self::Gas => 0,
            _ => 1,
        }
    }
}

/// One gauge, ready to draw: fill fraction, arc offset and numeric label.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeView {
    // ---
    pub channel: Channel,
    /// Fill fraction in `[0, 1]`.
    pub percentage: f64,
    /// Stroke offset along the arc: `C - percentage * C`.
    pub arc_offset: f64,
    pub label: String,
}

impl GaugeView {
    // ---
    pub fn for_channel(channel: Channel, value: f64) -> Self {
        // ---
        let percentage = (value / channel.max()).min(1.0);
        let arc_offset = GAUGE_CIRCUMFERENCE - percentage * GAUGE_CIRCUMFERENCE;
        let label = format!("{:.*}", channel.decimals(), value);

        Self {
            channel,
            percentage,
            arc_offset,
            label,
        }
    }
}

/// Gauge views for a current reading. The current-reading parse path never
/// yields `None`, but absent values still degrade to zero here.
pub fn gauges(reading: &Reading) -> [GaugeView; 3] {
    // ---
    [
        GaugeView::for_channel(Channel::Temperature, reading.temperature.unwrap_or(0.0)),
        GaugeView::for_channel(Channel::Humidity, reading.humidity.unwrap_or(0.0)),
        GaugeView::for_channel(Channel::Gas, reading.gas.unwrap_or(0.0)),
    ]
}

// ---

/// One chart line, split into contiguous segments wherever a sample is
/// `None` so failed parses render as gaps instead of dips to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    // ---
    pub name: &'static str,
    /// `(unix seconds, value)` runs with no gaps inside a run.
    pub segments: Vec<Vec<(f64, f64)>>,
}

/// Fully computed history chart. Rebuilt from scratch on every history
/// fetch; there is no incremental update path.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    // ---
    pub title: String,
    pub series: Vec<ChartSeries>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_labels: Vec<String>,
}

impl ChartView {
    // ---
    pub fn build(readings: &[Reading], range: TimeRange) -> Self {
        // ---
        let xs: Vec<f64> = readings
            .iter()
            .map(|r| r.timestamp.timestamp() as f64)
            .collect();

        let series = vec![
            ChartSeries {
                name: "Temperature (°C)",
                segments: split_segments(&xs, readings.iter().map(|r| r.temperature)),
            },
            ChartSeries {
                name: "Humidity (%)",
                segments: split_segments(&xs, readings.iter().map(|r| r.humidity)),
            },
            ChartSeries {
                name: "Gas Level (ppm)",
                segments: split_segments(&xs, readings.iter().map(|r| r.gas)),
            },
        ];

        let x_min = xs.iter().copied().fold(f64::MAX, f64::min);
        let x_max = xs.iter().copied().fold(f64::MIN, f64::max);
        let x_bounds = if xs.is_empty() || x_min >= x_max {
            [0.0, 1.0]
        } else {
            [x_min, x_max]
        };

        let y_max = series
            .iter()
            .flat_map(|s| s.segments.iter().flatten())
            .map(|&(_, v)| v)
            .fold(0.0_f64, f64::max);
        // Chart Y axis begins at zero, with a little headroom on top
        let y_bounds = if y_max > 0.0 {
            [0.0, y_max * 1.05]
        } else {
            [0.0, 1.0]
        };

        let x_labels = axis_labels(x_bounds, range.bucket());

        Self {
            title: format!("Sensor Data History ({})", range.label()),
            series,
            x_bounds,
            y_bounds,
            x_labels,
        }
    }
}

fn split_segments(xs: &[f64], values: impl Iterator<Item = Option<f64>>) -> Vec<Vec<(f64, f64)>> {
    // ---
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for (&x, value) in xs.iter().zip(values) {
        match value {
            Some(v) => current.push((x, v)),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Evenly spaced time-axis labels, formatted by bucket granularity.
fn axis_labels(bounds: [f64; 2], unit: BucketUnit) -> Vec<String> {
    // ---
    const LABELS: usize = 4;

    (0..LABELS)
        .map(|i| {
            let t = bounds[0] + (bounds[1] - bounds[0]) * i as f64 / (LABELS - 1) as f64;
            format_tick(t, unit)
        })
        .collect()
}

fn format_tick(unix_secs: f64, unit: BucketUnit) -> String {
    // ---
    let ts = DateTime::<Utc>::from_timestamp(unix_secs as i64, 0).unwrap_or_default();
    match unit {
        BucketUnit::Hour => ts.format("%H:%M").to_string(),
        BucketUnit::Day | BucketUnit::Week => ts.format("%m-%d").to_string(),
    }
}

// ---
