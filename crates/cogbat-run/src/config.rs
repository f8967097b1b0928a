use anyhow::{Context, Result};
use cogbat_lib::{Task5Format, TaskId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one ingest run. Every field has a default, so an empty
/// TOML file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Folder scanned for log files.
    pub log_dir: PathBuf,
    pub summary_file: PathBuf,
    /// Folder receiving the per-task trial dumps `task1.csv` .. `task6.csv`.
    pub dump_dir: PathBuf,
    pub database: PathBuf,
    pub seen_files: PathBuf,
    /// Truncate outputs and replace stored subjects instead of extending them.
    pub overwrite: bool,
    pub task5_format: Task5Format,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("."),
            summary_file: PathBuf::from("summary.csv"),
            dump_dir: PathBuf::from("."),
            database: PathBuf::from(".cogbat_db.json"),
            seen_files: PathBuf::from(".cogbat_seen.json"),
            overwrite: false,
            task5_format: Task5Format::default(),
        }
    }
}

impl RunConfig {
    pub fn dump_path(&self, task: TaskId) -> PathBuf {
        self.dump_dir.join(format!("{}.csv", task))
    }
}

pub fn read_config(path: &Path) -> Result<RunConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: RunConfig =
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}
