//! Demo day data for tickscope
//!
//! Writes synthetic intraday CSVs so the app has something to step
//! through on first launch. Each day gets its own directory with a
//! different row count, so switching days exercises window resets.

use std::path::Path;

use anyhow::{Context, Result};
use rand::prelude::*;
use tracing::info;

/// Rows per generated day. One-minute bars, so Day1 is a full session.
const DAY_ROWS: [usize; 3] = [390, 200, 330];

/// Session open, seconds since midnight (09:30:00).
const OPEN_SECS: i64 = 9 * 3600 + 30 * 60;

/// Generate `Day1..Day3` under `root` unless `Day1` already exists.
pub fn ensure_demo_days(root: &Path) -> Result<()> {
    if root.join("Day1").is_dir() {
        return Ok(());
    }
    info!("generating demo days under {}", root.display());
    for (i, rows) in DAY_ROWS.iter().enumerate() {
        let day = i as u64 + 1;
        let dir = root.join(format!("Day{day}"));
        std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        let path = dir.join("prices.csv");
        write_day(&path, day, *rows).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

/// One day of one-minute rows: a random walk with a slow swing, a
/// smoothed companion column, per-row volume and sparse trade signals.
fn write_day(path: &Path, day: u64, rows: usize) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(day * 47);
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["time", "price", "fast", "volume", "signal"])?;

    let mut price: f64 = 4500.0 + rng.gen_range(-25.0..25.0);
    let mut fast = price;
    // -1 short, 0 flat, 1 long
    let mut position: i8 = 0;
    for row in 0..rows {
        let t = OPEN_SECS + row as i64 * 60;
        price += rng.gen_range(-1.2..1.2) + (row as f64 * 0.04).sin() * 0.3;
        fast += (price - fast) * 0.3;
        let volume: f64 = rng.gen_range(50.0..400.0);

        let signal = match position {
            0 if rng.gen_bool(0.03) => {
                position = if rng.gen_bool(0.5) { 1 } else { -1 };
                if position == 1 { "1" } else { "-1" }
            }
            1 if rng.gen_bool(0.06) => {
                position = 0;
                "2"
            }
            -1 if rng.gen_bool(0.06) => {
                position = 0;
                "-2"
            }
            _ => "",
        };

        writer.write_record(&[
            t.to_string(),
            format!("{price:.2}"),
            format!("{fast:.2}"),
            format!("{volume:.0}"),
            signal.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_data::load_day_csv;

    fn temp_root(name: &str) -> std::path::PathBuf {
        let root =
            std::env::temp_dir().join(format!("tickscope-demo-{}-{}", std::process::id(), name));
        let _ = std::fs::remove_dir_all(&root);
        root
    }

    #[test]
    fn test_generates_three_days_with_expected_lengths() {
        let root = temp_root("lengths");
        ensure_demo_days(&root).unwrap();

        for (i, rows) in DAY_ROWS.iter().enumerate() {
            let path = root.join(format!("Day{}", i + 1)).join("prices.csv");
            let series = load_day_csv(&path).unwrap();
            assert_eq!(series.len(), *rows);
            assert!(series.column("price").is_some());
            assert!(series.column("fast").is_some());
            assert!(series.column("volume").is_some());
            assert!(series.column("signal").is_some());
        }
    }

    #[test]
    fn test_generation_is_idempotent() {
        let root = temp_root("idempotent");
        ensure_demo_days(&root).unwrap();
        let first = std::fs::read_to_string(root.join("Day1/prices.csv")).unwrap();
        ensure_demo_days(&root).unwrap();
        let second = std::fs::read_to_string(root.join("Day1/prices.csv")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_signals_are_sparse_and_paired() {
        let root = temp_root("signals");
        ensure_demo_days(&root).unwrap();
        let series = load_day_csv(&root.join("Day1/prices.csv")).unwrap();
        let signals = series.column("signal").unwrap();

        let coded = signals.iter().filter(|v| v.is_finite()).count();
        assert!(coded > 0, "expected at least one trade signal");
        assert!(coded < series.len() / 4, "signals should be sparse");

        // Entries and exits alternate, so the codes never repeat an entry
        // while a position is open.
        let mut open = false;
        for value in signals.iter().filter(|v| v.is_finite()) {
            match *value as i64 {
                1 | -1 => {
                    assert!(!open, "entry while a position is open");
                    open = true;
                }
                2 | -2 => {
                    assert!(open, "exit without a position");
                    open = false;
                }
                other => panic!("unexpected signal code {other}"),
            }
        }
    }
}
