//! Data loading and modelling for tickscope
//!
//! Day files on disk, the in-memory series model, OHLC resampling and
//! strategy signal decoding.

pub mod days;
pub mod ohlc;
pub mod series;
pub mod signals;
pub mod sources;

pub use days::DayStore;
pub use ohlc::{resample, Candle};
pub use series::{ColumnStats, Series};
pub use signals::SignalKind;
pub use sources::load_day_csv;

use thiserror::Error;

/// Errors that can occur during data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed data: {0}")]
    Malformed(String),

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("missing column: {0}")]
    MissingColumn(String),
}
