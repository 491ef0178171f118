//! CSV export of the in-memory historical series.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, SecondsFormat, Utc};

use crate::error::DashError;
use crate::models::{Reading, TimeRange};

// ---

const CSV_HEADER: &str = "Timestamp,Temperature,Humidity,Gas Level";

/// Serialize the series to CSV text.
///
/// Timestamps are ISO-8601 with milliseconds (`2024-01-01T00:00:00.000Z`);
/// values that failed to parse upstream stay as empty cells. Fails with
/// [`DashError::EmptyData`] when the series is empty.
pub fn to_csv(series: &[Reading]) -> Result<String, DashError> {
    // ---
    if series.is_empty() {
        return Err(DashError::EmptyData);
    }

    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for reading in series {
        let timestamp = reading.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        out.push_str(&format!(
            "{},{},{},{}\n",
            timestamp,
            cell(reading.temperature),
            cell(reading.humidity),
            cell(reading.gas)
        ));
    }

    Ok(out)
}

fn cell(value: Option<f64>) -> String {
    // ---
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Export filename: `sensor_data_<range>_<YYYY-MM-DD>.csv`.
pub fn csv_filename(range: TimeRange, date: NaiveDate) -> String {
    format!("sensor_data_{}_{}.csv", range.as_str(), date.format("%Y-%m-%d"))
}

/// Write the series as CSV into `dir`, named for the range and today's date.
/// Returns the path of the written file.
pub fn write_csv(series: &[Reading], range: TimeRange, dir: &Path) -> Result<PathBuf, DashError> {
    // ---
    let csv = to_csv(series)?;
    let path = dir.join(csv_filename(range, Utc::now().date_naive()));

    fs::write(&path, csv)?;
    tracing::info!("Exported {} readings to {}", series.len(), path.display());

    Ok(path)
}

// ---

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn empty_series_is_an_error() {
        // ---
        assert!(matches!(to_csv(&[]), Err(DashError::EmptyData)));
    }

    #[test]
    fn single_reading_yields_header_plus_one_row() {
        // ---
        let series = vec![Reading {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            temperature: Some(20.0),
            humidity: Some(50.0),
            gas: Some(100.0),
        }];

        let csv = to_csv(&series).unwrap();
        assert_eq!(
            csv,
            "Timestamp,Temperature,Humidity,Gas Level\n\
             2024-01-01T00:00:00.000Z,20,50,100\n"
        );
    }

    #[test]
    fn failed_parses_export_as_empty_cells() {
        // ---
        let series = vec![Reading {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap(),
            temperature: Some(23.5),
            humidity: None,
            gas: None,
        }];

        let csv = to_csv(&series).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "2024-06-15T08:30:00.000Z,23.5,,");
    }

    #[test]
    fn filename_carries_range_and_date() {
        // ---
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(csv_filename(TimeRange::D7, date), "sensor_data_7d_2024-03-09.csv");
        assert_eq!(csv_filename(TimeRange::H24, date), "sensor_data_24h_2024-03-09.csv");
    }

    #[test]
    fn write_csv_creates_the_file() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let series = vec![Reading {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            temperature: Some(1.0),
            humidity: Some(2.0),
            gas: Some(3.0),
        }];

        let path = write_csv(&series, TimeRange::D30, dir.path()).unwrap();
        assert!(path.ends_with(csv_filename(TimeRange::D30, Utc::now().date_naive())));

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("Timestamp,Temperature,Humidity,Gas Level\n"));
        assert_eq!(contents.lines().count(), 2);
    }
}
