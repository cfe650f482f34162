//! In-memory series model

use indexmap::IndexMap;

use crate::DataError;

/// One day of tabular data: a timestamp per row plus named numeric columns.
///
/// Timestamps are epoch seconds and non-decreasing; every column has
/// exactly one value per row. Unreadable source cells surface as NaN so a
/// single bad field never rejects a whole file.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    timestamps: Vec<i64>,
    columns: IndexMap<String, Vec<f64>>,
}

impl Series {
    pub fn new(
        timestamps: Vec<i64>,
        columns: IndexMap<String, Vec<f64>>,
    ) -> Result<Self, DataError> {
        if timestamps.is_empty() {
            return Err(DataError::Malformed("series has no rows".to_string()));
        }
        if columns.is_empty() {
            return Err(DataError::Malformed(
                "series has no value columns".to_string(),
            ));
        }
        for (name, values) in &columns {
            if values.len() != timestamps.len() {
                return Err(DataError::ColumnLength {
                    column: name.clone(),
                    expected: timestamps.len(),
                    actual: values.len(),
                });
            }
        }
        if timestamps.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(DataError::Malformed(
                "timestamps must be non-decreasing".to_string(),
            ));
        }
        Ok(Self {
            timestamps,
            columns,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Index of the last row. Construction guarantees at least one row.
    pub fn last_index(&self) -> usize {
        self.timestamps.len() - 1
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn timestamp(&self, idx: usize) -> Option<i64> {
        self.timestamps.get(idx).copied()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|values| values.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|name| name.as_str())
    }

    pub fn value(&self, column: &str, idx: usize) -> Option<f64> {
        self.columns.get(column).and_then(|values| values.get(idx)).copied()
    }
}

/// Low/high/mean over a window of one column, NaN cells skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub low: f64,
    pub high: f64,
    pub mean: f64,
}

impl ColumnStats {
    /// Stats over `values[start..=end]`; the end is clamped to the slice.
    /// None when the window holds no finite value.
    pub fn over(values: &[f64], start: usize, end: usize) -> Option<ColumnStats> {
        if values.is_empty() {
            return None;
        }
        let end = end.min(values.len() - 1);
        if start > end {
            return None;
        }
        let mut low = f64::INFINITY;
        let mut high = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;
        for &value in &values[start..=end] {
            if value.is_finite() {
                low = low.min(value);
                high = high.max(value);
                sum += value;
                count += 1;
            }
        }
        if count == 0 {
            return None;
        }
        Some(ColumnStats {
            low,
            high,
            mean: sum / count as f64,
        })
    }

    /// A window with no vertical extent; rendering maps it to mid-height.
    pub fn is_flat(&self) -> bool {
        self.high <= self.low
    }
}
