//! Data models for the telemetry feed.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ---

/// Raw feed entry as the channel API returns it: a timestamp plus up to three
/// numeric-as-string fields. Unknown extra fields (entry IDs, channel
/// metadata) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    // ---
    pub created_at: DateTime<Utc>,
    pub field1: Option<String>,
    pub field2: Option<String>,
    pub field3: Option<String>,
}

/// Envelope returned by the history endpoint.
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    // ---
    pub feeds: Vec<FeedEntry>,
}

/// One parsed reading. `None` means the field was absent or did not parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    // ---
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub gas: Option<f64>,
}

impl FeedEntry {
    // ---
    /// Parse for the current-reading path: failed or missing fields become
    /// `0.0`, so the gauges always have a number to show.
    pub fn to_current(&self) -> Reading {
        // ---
        Reading {
            timestamp: self.created_at,
            temperature: Some(parse_field(&self.field1).unwrap_or(0.0)),
            humidity: Some(parse_field(&self.field2).unwrap_or(0.0)),
            gas: Some(parse_field(&self.field3).unwrap_or(0.0)),
        }
    }

    /// Parse for the historical path: failed or missing fields stay `None`.
    ///
    /// The asymmetry with [`to_current`](Self::to_current) is deliberate and
    /// load-bearing: `None` samples produce visible gaps in the chart line,
    /// zeros would not.
    pub fn to_sample(&self) -> Reading {
        // ---
        Reading {
            timestamp: self.created_at,
            temperature: parse_field(&self.field1),
            humidity: parse_field(&self.field2),
            gas: parse_field(&self.field3),
        }
    }
}

fn parse_field(raw: &Option<String>) -> Option<f64> {
    // ---
    raw.as_deref().and_then(|s| s.trim().parse::<f64>().ok())
}

// ---

/// User-selected history window. Drives the requested result count, the
/// chart's time-axis bucketing, and display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    H24,
    D7,
    D30,
}

/// Time-axis bucket granularity for the history chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketUnit {
    Hour,
    Day,
    Week,
}

impl TimeRange {
    // ---
    /// Number of feed entries requested from the history endpoint.
    ///
    /// This is the upstream API's fixed count-based approximation of a time
    /// window, kept as-is rather than converted to a real time-bounded query.
    pub fn result_count(self) -> u32 {
        match self {
            Self::H24 => 100,
            Self::D7 => 500,
            Self::D30 => 1000,
        }
    }

    pub fn bucket(self) -> BucketUnit {
        match self {
            Self::H24 => BucketUnit::Hour,
            Self::D7 => BucketUnit::Day,
            Self::D30 => BucketUnit::Week,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::H24 => "Last 24 Hours",
            Self::D7 => "Last 7 Days",
            Self::D30 => "Last 30 Days",
        }
    }

    /// Short form used in the selector bar and export filenames.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::H24 => "24h",
            Self::D7 => "7d",
            Self::D30 => "30d",
        }
    }
}

// ---

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;

    fn entry(f1: Option<&str>, f2: Option<&str>, f3: Option<&str>) -> FeedEntry {
        // ---
        FeedEntry {
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            field1: f1.map(String::from),
            field2: f2.map(String::from),
            field3: f3.map(String::from),
        }
    }

    #[test]
    fn current_path_zero_fills_bad_fields() {
        // ---
        let r = entry(Some("23.5"), Some("60"), Some("abc")).to_current();

        assert_eq!(r.temperature, Some(23.5));
        assert_eq!(r.humidity, Some(60.0));
        assert_eq!(r.gas, Some(0.0));
    }

    #[test]
    fn historical_path_keeps_gaps() {
        // ---
        let r = entry(Some("23.5"), Some("60"), Some("abc")).to_sample();

        assert_eq!(r.temperature, Some(23.5));
        assert_eq!(r.humidity, Some(60.0));
        assert_eq!(r.gas, None);
    }

    #[test]
    fn missing_fields_follow_the_same_asymmetry() {
        // ---
        let e = entry(None, Some(" 41.2 "), None);

        let current = e.to_current();
        assert_eq!(current.temperature, Some(0.0));
        assert_eq!(current.humidity, Some(41.2));
        assert_eq!(current.gas, Some(0.0));

        let sample = e.to_sample();
        assert_eq!(sample.temperature, None);
        assert_eq!(sample.humidity, Some(41.2));
        assert_eq!(sample.gas, None);
    }

    #[test]
    fn feed_entry_tolerates_extra_json_fields() {
        // ---
        let raw = r#"{
            "created_at": "2024-01-01T00:00:00Z",
            "entry_id": 42,
            "field1": "23.5",
            "field2": null,
            "field3": "100"
        }"#;

        let e: FeedEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(e.field1.as_deref(), Some("23.5"));
        assert_eq!(e.field2, None);
    }

    #[test]
    fn time_range_mappings() {
        // ---
        assert_eq!(TimeRange::H24.result_count(), 100);
        assert_eq!(TimeRange::D7.result_count(), 500);
        assert_eq!(TimeRange::D30.result_count(), 1000);

        assert_eq!(TimeRange::H24.bucket(), BucketUnit::Hour);
        assert_eq!(TimeRange::D7.bucket(), BucketUnit::Day);
        assert_eq!(TimeRange::D30.bucket(), BucketUnit::Week);

        assert_eq!(TimeRange::D7.label(), "Last 7 Days");
        assert_eq!(TimeRange::D30.as_str(), "30d");
    }
}
