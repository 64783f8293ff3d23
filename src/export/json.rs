use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::core::progress::ProgressState;

#[derive(Serialize)]
struct ProgressExport<'a> {
    exported_at: DateTime<Local>,
    is_scanning: bool,
    #[serde(flatten)]
    state: &'a ProgressState,
}

pub fn export_json(state: &ProgressState, output_path: &Path) -> anyhow::Result<()> {
    let export = ProgressExport {
        exported_at: Local::now(),
        is_scanning: state.is_scanning(),
        state,
    };
    let json = serde_json::to_string_pretty(&export)?;
    std::fs::write(output_path, json)?;
    Ok(())
}

/// Timestamped file name in the working directory.
pub fn default_export_path() -> PathBuf {
    PathBuf::from(format!(
        "scanwatch_progress_{}.json",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}
