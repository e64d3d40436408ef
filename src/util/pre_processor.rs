// External crates
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{info, warn};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Local modules
use crate::constants::{CLOSE_COLUMN, DATE_COLUMN};
use crate::error::{ForecastError, Result};

/// One closing price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parses the date formats found in exchange and Yahoo style exports
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.naive_utc())
}

// Column lookup is case-insensitive so `date`/`close` exports load too
fn find_column<'a>(df: &'a DataFrame, wanted: &str) -> Result<&'a Column> {
    df.get_columns()
        .iter()
        .find(|c| c.name().as_str().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            ForecastError::Polars(PolarsError::ColumnNotFound(
                format!("Required column {} not found", wanted).into(),
            ))
        })
}

// Markers Yahoo style exports use for a missing price
const MISSING_MARKERS: [&str; 2] = ["", "null"];

/// Extracts a chronologically sorted price series from a DataFrame
///
/// Rows with a missing close are dropped. A close that is present but not a
/// finite number, and duplicate timestamps, are rejected.
pub fn dataframe_to_series(df: &DataFrame) -> Result<Vec<PricePoint>> {
    let dates = find_column(df, DATE_COLUMN)?.cast(&DataType::String)?;
    let raw_closes = find_column(df, CLOSE_COLUMN)?;
    // The float cast is not strict, so the text form tells a null cell from bad input
    let close_text = raw_closes.cast(&DataType::String)?;
    let closes = raw_closes.cast(&DataType::Float64)?;

    let dates = dates.as_materialized_series().str()?;
    let close_text = close_text.as_materialized_series().str()?;
    let closes = closes.as_materialized_series().f64()?;

    let mut series = Vec::with_capacity(df.height());
    let mut dropped = 0usize;

    for (row, ((date, close), text)) in dates
        .into_iter()
        .zip(closes.into_iter())
        .zip(close_text.into_iter())
        .enumerate()
    {
        let missing = text.map_or(true, |t| MISSING_MARKERS.contains(&t.trim()));
        let close = match close {
            Some(close) if close.is_finite() => close,
            _ if missing => {
                dropped += 1;
                continue;
            }
            _ => {
                return Err(ForecastError::InvalidData(format!(
                    "Invalid close '{}' in row {}",
                    text.unwrap_or_default(),
                    row + 1
                )))
            }
        };
        let date = match date {
            Some(date) => date,
            None => {
                dropped += 1;
                continue;
            }
        };

        let timestamp = parse_timestamp(date).ok_or_else(|| {
            ForecastError::InvalidData(format!("Unparseable date '{}' in row {}", date, row + 1))
        })?;
        series.push(PricePoint { timestamp, close });
    }

    if dropped > 0 {
        warn!("Dropped {} rows with missing values", dropped);
    }

    series.sort_by_key(|p| p.timestamp);

    if let Some(pair) = series.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
        return Err(ForecastError::InvalidData(format!(
            "Duplicate timestamp {}",
            pair[0].timestamp
        )));
    }

    Ok(series)
}

/// Loads a price CSV with at least `Date` and `Close` columns
///
/// # Arguments
///
/// * `full_path` - Path to the CSV file
///
/// # Returns
///
/// Returns the price series ordered by timestamp
pub fn load_price_series(full_path: &Path) -> Result<Vec<PricePoint>> {
    info!("Loading data from: {}", full_path.display());

    if !full_path.exists() {
        return Err(ForecastError::FileNotFound(full_path.to_path_buf()));
    }

    let file = std::fs::File::open(full_path)?;
    let df = CsvReader::new(file).finish()?;

    let series = dataframe_to_series(&df)?;
    info!("Loaded {} price records", series.len());

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use std::io::Write;

    #[test]
    fn test_parse_timestamp_formats() {
        let hourly = parse_timestamp("2021-10-19 13:00:00").unwrap();
        assert_eq!(hourly.hour(), 13);

        let daily = parse_timestamp("2021-10-19").unwrap();
        assert_eq!(daily.hour(), 0);

        assert!(parse_timestamp("2021-10-19T13:00:00Z").is_some());
        assert!(parse_timestamp("19/10/2021").is_none());
    }

    #[test]
    fn test_load_sorts_and_drops_nulls() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
        writeln!(file, "2021-10-20,1,1,1,62000.5,62000.5,10").unwrap();
        writeln!(file, "2021-10-18,1,1,1,61000.0,61000.0,10").unwrap();
        writeln!(file, "2021-10-19,1,1,1,,,10").unwrap();
        writeln!(file, "2021-10-21,1,1,1,63000,63000,10").unwrap();
        file.flush().unwrap();

        let series = load_price_series(file.path()).unwrap();
        let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![61000.0, 62000.5, 63000.0]);
        assert!(series.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_non_numeric_close_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Close").unwrap();
        writeln!(file, "2021-10-18,61000.0").unwrap();
        writeln!(file, "2021-10-19,n/a").unwrap();
        writeln!(file, "2021-10-20,62000.5").unwrap();
        file.flush().unwrap();

        match load_price_series(file.path()) {
            Err(ForecastError::InvalidData(msg)) => {
                assert!(msg.contains("n/a"), "{}", msg);
                assert!(msg.contains("row 2"), "{}", msg);
            }
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }

    #[test]
    fn test_thousands_separator_close_rejected() {
        let df = polars::df!(
            "Date" => ["2021-10-18", "2021-10-19"],
            "Close" => ["61000", "61,200"]
        )
        .unwrap();
        assert!(matches!(
            dataframe_to_series(&df),
            Err(ForecastError::InvalidData(_))
        ));
    }

    #[test]
    fn test_null_marker_is_missing() {
        let df = polars::df!(
            "Date" => ["2021-10-18", "2021-10-19", "2021-10-20"],
            "Close" => [Some("61000"), Some("null"), None]
        )
        .unwrap();
        let series = dataframe_to_series(&df).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].close, 61000.0);
    }

    #[test]
    fn test_duplicate_timestamps_rejected() {
        let df = polars::df!(
            "Date" => ["2021-10-19", "2021-10-19"],
            "Close" => [1.0, 2.0]
        )
        .unwrap();
        assert!(matches!(
            dataframe_to_series(&df),
            Err(ForecastError::InvalidData(_))
        ));
    }

    #[test]
    fn test_missing_close_column() {
        let df = polars::df!("Date" => ["2021-10-19"], "Open" => [1.0]).unwrap();
        assert!(dataframe_to_series(&df).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = load_price_series(Path::new("non_existent_file.csv"));
        match result {
            Err(ForecastError::FileNotFound(path)) => {
                assert_eq!(path, Path::new("non_existent_file.csv"))
            }
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }
}
