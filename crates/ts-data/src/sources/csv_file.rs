//! CSV day files
//!
//! A day file has a header row, a `time` column and one or more value
//! columns. Times are epoch seconds or wall-clock `HH:MM[:SS]`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{NaiveTime, Timelike};
use csv::ReaderBuilder;
use indexmap::IndexMap;

use crate::{DataError, Series};

const TIME_COLUMN: &str = "time";

/// Load one day of data from a CSV file.
///
/// Rows with an unreadable time are skipped with a warning; unreadable
/// value cells become NaN so the row survives.
pub fn load_day_csv(path: &Path) -> Result<Series, DataError> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    let time_idx = headers
        .iter()
        .position(|name| name.eq_ignore_ascii_case(TIME_COLUMN))
        .ok_or_else(|| DataError::MissingColumn(TIME_COLUMN.to_string()))?;

    let value_names: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != time_idx)
        .map(|(idx, name)| (idx, name.to_string()))
        .collect();
    if value_names.is_empty() {
        return Err(DataError::Malformed(format!(
            "{} has no value columns",
            path.display()
        )));
    }

    let mut timestamps = Vec::new();
    let mut columns: IndexMap<String, Vec<f64>> = value_names
        .iter()
        .map(|(_, name)| (name.clone(), Vec::new()))
        .collect();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let raw_time = record.get(time_idx).unwrap_or("");
        let Some(timestamp) = parse_time(raw_time) else {
            tracing::warn!(
                "{}: skipping row {} with unreadable time '{}'",
                path.display(),
                row + 1,
                raw_time
            );
            continue;
        };
        timestamps.push(timestamp);
        for (idx, name) in &value_names {
            let cell = record.get(*idx).unwrap_or("").trim();
            let value = cell.parse::<f64>().unwrap_or_else(|_| {
                tracing::debug!(
                    "{}: non-numeric cell '{}' in column {}",
                    path.display(),
                    cell,
                    name
                );
                f64::NAN
            });
            if let Some(values) = columns.get_mut(name) {
                values.push(value);
            }
        }
    }

    Series::new(timestamps, columns)
}

fn parse_time(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(epoch) = raw.parse::<i64>() {
        return Some(epoch);
    }
    for format in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(raw, format) {
            return Some(i64::from(time.num_seconds_from_midnight()));
        }
    }
    None
}
