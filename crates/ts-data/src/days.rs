//! Day directory store

use std::path::{Path, PathBuf};

/// Walks `Day<n>` directories under a data root.
///
/// Days are numbered `1..=max_days` and may be sparse; stepping skips the
/// holes and wraps at both ends. A scan gives up after one full cycle so
/// an empty root cannot hang the caller.
#[derive(Debug, Clone)]
pub struct DayStore {
    root: PathBuf,
    current: u32,
    max_days: u32,
}

impl DayStore {
    pub fn new(root: impl Into<PathBuf>, first_day: u32, max_days: u32) -> Self {
        let max_days = max_days.max(1);
        Self {
            root: root.into(),
            current: first_day.clamp(1, max_days),
            max_days,
        }
    }

    pub fn current_day(&self) -> u32 {
        self.current
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn day_dir(&self, day: u32) -> PathBuf {
        self.root.join(format!("Day{day}"))
    }

    pub fn file_path(&self, day: u32, file_name: &str) -> PathBuf {
        self.day_dir(day).join(file_name)
    }

    /// Step forward (`1`) or back (`-1`), skipping days without a directory
    /// on disk. Updates and returns the new day, or None when no day
    /// directory exists within one full cycle.
    pub fn step(&mut self, direction: i32) -> Option<u32> {
        let mut day = self.current;
        for _ in 0..self.max_days {
            day = wrap(i64::from(day) + i64::from(direction), self.max_days);
            if self.day_dir(day).is_dir() {
                self.current = day;
                return Some(day);
            }
            tracing::debug!("no data for day {day}, skipping");
        }
        tracing::warn!("no day directories under {}", self.root.display());
        None
    }
}

fn wrap(day: i64, max_days: u32) -> u32 {
    let max = i64::from(max_days);
    if day < 1 {
        max_days
    } else if day > max {
        1
    } else {
        day as u32
    }
}
