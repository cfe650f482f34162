//! OHLC resampling over fixed wall-clock buckets

use crate::DataError;

/// One resampled price bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub bucket_start: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Collapse `(timestamps, values)` into fixed-width candles.
///
/// A row lands in the bucket holding its timestamp
/// (`ts.div_euclid(bucket_secs) * bucket_secs`); open is the first value
/// seen, close the last, high/low the extrema. NaN rows are skipped and
/// buckets without rows are not emitted. Timestamps are assumed
/// non-decreasing, which series construction guarantees.
pub fn resample(
    timestamps: &[i64],
    values: &[f64],
    bucket_secs: i64,
) -> Result<Vec<Candle>, DataError> {
    if bucket_secs <= 0 {
        return Err(DataError::Malformed(format!(
            "bucket width {bucket_secs} must be positive"
        )));
    }
    let mut candles: Vec<Candle> = Vec::new();
    for (&ts, &value) in timestamps.iter().zip(values) {
        if !value.is_finite() {
            continue;
        }
        let bucket_start = ts.div_euclid(bucket_secs) * bucket_secs;
        match candles.last_mut() {
            Some(last) if last.bucket_start == bucket_start => {
                last.high = last.high.max(value);
                last.low = last.low.min(value);
                last.close = value;
            }
            _ => candles.push(Candle {
                bucket_start,
                open: value,
                high: value,
                low: value,
                close: value,
            }),
        }
    }
    Ok(candles)
}
