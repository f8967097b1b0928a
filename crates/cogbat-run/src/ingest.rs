//! Batch driver: every new log in a folder into the store, the summary
//! table and the trial dumps.

use crate::config::RunConfig;
use crate::seen::SeenFiles;
use crate::store::{merge_registry, JsonStore, MergeReport, SubjectStore};
use crate::writers::{write_summary, write_trial_dump};
use anyhow::{Context, Result};
use cogbat_lib::{load_task_data, ParseError, SubjectRegistry, TaskConflict, TaskData, TaskId};
use log::{debug, info, warn};
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

/// A log file that could not be read. The run continues without it.
#[derive(Debug, Serialize)]
pub struct FileFailure {
    pub file: String,
    #[serde(serialize_with = "as_display")]
    pub error: ParseError,
}

fn as_display<S: Serializer>(error: &ParseError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    /// Files parsed this run, conflicting duplicates included.
    pub processed: usize,
    pub skipped_seen: usize,
    /// Keys of the subjects that received data this run.
    pub subjects: Vec<String>,
    pub failures: Vec<FileFailure>,
    /// Duplicates within this run, then duplicates of tasks already stored.
    pub conflicts: Vec<TaskConflict>,
    pub merge: MergeReport,
    pub trials_written: usize,
}

/// Regular files in `dir`, sorted by name.
fn list_logs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        logs.push((name, entry.path()));
    }
    logs.sort();
    Ok(logs)
}

pub fn ingest(config: &RunConfig) -> Result<IngestReport> {
    let mut seen = SeenFiles::load(&config.seen_files)
        .with_context(|| format!("loading seen files {}", config.seen_files.display()))?;
    let logs = list_logs(&config.log_dir)?;
    info!("{} files in {}", logs.len(), config.log_dir.display());

    let mut report = IngestReport::default();
    let mut registry = SubjectRegistry::new();
    for (name, path) in logs {
        if seen.contains(&name) {
            debug!("{}: already ingested", name);
            report.skipped_seen += 1;
            continue;
        }
        match load_task_data(&path, config.task5_format) {
            Ok(data) => {
                report.processed += 1;
                registry.add(data);
                seen.insert(name);
            }
            Err(error) => {
                warn!("skipping {}: {}", name, error);
                report.failures.push(FileFailure { file: name, error });
            }
        }
    }

    let mut store = JsonStore::open(&config.database)?;
    report.merge = merge_registry(&mut store, &registry, config.overwrite);
    store.save()?;
    report.conflicts = registry.conflicts().to_vec();
    report.conflicts.append(&mut report.merge.conflicts);
    for (key, _) in &report.merge.accepted {
        if !report.subjects.contains(key) {
            report.subjects.push(key.clone());
        }
    }

    let touched: Vec<_> = registry
        .subjects()
        .filter_map(|record| store.get(&record.key))
        .collect();
    if !touched.is_empty() {
        let rows = write_summary(&config.summary_file, &touched, config.overwrite)?;
        info!("{}: {} subjects", config.summary_file.display(), rows);
    }

    for task in TaskId::ALL {
        let data: Vec<&TaskData> = report
            .merge
            .accepted
            .iter()
            .filter(|(_, accepted)| *accepted == task)
            .filter_map(|(key, _)| store.get(key).and_then(|record| record.data.get(&task)))
            .collect();
        if data.is_empty() {
            continue;
        }
        let path = config.dump_path(task);
        let written = write_trial_dump(&path, &data, config.overwrite)?;
        debug!("{}: {} trials", path.display(), written);
        report.trials_written += written;
    }

    seen.save()
        .with_context(|| format!("saving seen files {}", config.seen_files.display()))?;

    info!(
        "ingested {} files for {} subjects, {} failed, {} conflicting",
        report.processed,
        report.subjects.len(),
        report.failures.len(),
        report.conflicts.len()
    );
    Ok(report)
}
