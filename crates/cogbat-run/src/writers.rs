//! Cross-subject summary table and per-task trial dumps.

use anyhow::{Context, Result};
use cogbat_lib::{SubjectRecord, TaskData, Value};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::path::Path;

pub const SUMMARY_ID_COLUMNS: [&str; 4] = ["Key", "SubID", "Group", "Sibling"];
pub const DUMP_ID_COLUMNS: [&str; 6] = ["Key", "SubID", "Group", "Sibling", "Device", "Time"];

type SummaryRow = BTreeMap<String, String>;

fn summary_row(record: &SubjectRecord) -> SummaryRow {
    let mut row = SummaryRow::new();
    row.insert("Key".into(), record.key.clone());
    row.insert("SubID".into(), record.id.clone());
    row.insert("Group".into(), record.group.clone());
    row.insert("Sibling".into(), Value::Bool(record.sibling).to_string());
    for (name, value) in record.summary() {
        row.insert(name, value.map(|v| v.to_string()).unwrap_or_default());
    }
    row
}

fn read_summary_rows(path: &Path) -> Result<Vec<SummaryRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening summary {}", path.display()))?;
    let headers = reader.headers().context("reading summary header")?.clone();
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("parsing summary row {}", idx + 1))?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        );
    }
    Ok(rows)
}

/// Write one row per subject: identity columns, then every summary name in
/// alphabetical order.
///
/// Without `overwrite` the rows already in `path` are kept, except those
/// whose key is being written again; the column set is the union of old and
/// new. Returns the number of rows in the file.
pub fn write_summary(path: &Path, records: &[&SubjectRecord], overwrite: bool) -> Result<usize> {
    let mut rows: BTreeMap<String, SummaryRow> = BTreeMap::new();
    if !overwrite && path.exists() {
        for row in read_summary_rows(path)? {
            if let Some(key) = row.get("Key").cloned() {
                rows.insert(key, row);
            }
        }
    }
    for record in records {
        rows.insert(record.key.clone(), summary_row(record));
    }

    let summary_names: BTreeSet<&str> = rows
        .values()
        .flat_map(|row| row.keys())
        .map(String::as_str)
        .filter(|name| !SUMMARY_ID_COLUMNS.contains(name))
        .collect();
    let columns: Vec<&str> = SUMMARY_ID_COLUMNS
        .iter()
        .copied()
        .chain(summary_names)
        .collect();

    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating summary {}", path.display()))?;
    writer.write_record(&columns)?;
    for row in rows.values() {
        writer.write_record(
            columns
                .iter()
                .map(|name| row.get(*name).map(String::as_str).unwrap_or("")),
        )?;
    }
    writer.flush()?;
    Ok(rows.len())
}

/// Append every task trial of `data` to the dump at `path`, prefixed with
/// the subject identity. A header is written only when the file is new or
/// `overwrite` truncates it. Returns the number of trial rows written.
pub fn write_trial_dump(path: &Path, data: &[&TaskData], overwrite: bool) -> Result<usize> {
    let Some(first) = data.first() else {
        return Ok(0);
    };
    let append = !overwrite && path.exists() && fs::metadata(path)?.len() > 0;
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .with_context(|| format!("opening trial dump {}", path.display()))?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(file);

    let task_headers = first.task_headers();
    if !append {
        writer.write_record(DUMP_ID_COLUMNS.iter().chain(task_headers))?;
    }
    let mut written = 0;
    for task_data in data {
        let identity = &task_data.identity;
        let prefix = [
            identity.key.clone(),
            identity.subject_id.clone(),
            identity.group.clone(),
            Value::Bool(identity.sibling).to_string(),
            identity.device.clone(),
            format!("{} {}", identity.date, identity.time),
        ];
        for trial in &task_data.trials {
            let cells = task_headers.iter().map(|name| trial.get(name).to_string());
            writer.write_record(prefix.iter().cloned().chain(cells))?;
            written += 1;
        }
    }
    writer.flush()?;
    Ok(written)
}
