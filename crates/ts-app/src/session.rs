//! Layout persistence on disk
//!
//! One JSON document at a fixed spot inside the data root. Reading a
//! missing or stale file is an error the shell reports in the status
//! line rather than a crash.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ts_views::LayoutDoc;

pub fn layout_path(data_root: &Path) -> PathBuf {
    data_root.join("layout.json")
}

pub fn save_layout(path: &Path, doc: &LayoutDoc) -> Result<()> {
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_layout(path: &Path) -> Result<LayoutDoc> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc: LayoutDoc =
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
    Ok(doc)
}
