//! Day file loading

mod csv_file;

pub use csv_file::load_day_csv;
