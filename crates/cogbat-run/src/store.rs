use anyhow::{Context, Result};
use cogbat_lib::{SubjectRecord, SubjectRegistry, TaskConflict, TaskId};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persistent map from subject key to subject record.
pub trait SubjectStore {
    fn get(&self, key: &str) -> Option<&SubjectRecord>;
    fn put(&mut self, record: SubjectRecord);
    fn contains(&self, key: &str) -> bool;
    fn keys(&self) -> Vec<String>;
}

/// Subject store kept in memory and saved as one JSON document.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    subjects: BTreeMap<String, SubjectRecord>,
}

impl JsonStore {
    /// Load the store at `path`; a missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let subjects = if path.exists() {
            read_json(path).with_context(|| format!("opening subject store {}", path.display()))?
        } else {
            debug!("no subject store at {}, starting empty", path.display());
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            subjects,
        })
    }

    pub fn save(&self) -> Result<()> {
        write_json(&self.path, &self.subjects)
            .with_context(|| format!("saving subject store {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl SubjectStore for JsonStore {
    fn get(&self, key: &str) -> Option<&SubjectRecord> {
        self.subjects.get(key)
    }

    fn put(&mut self, record: SubjectRecord) {
        self.subjects.insert(record.key.clone(), record);
    }

    fn contains(&self, key: &str) -> bool {
        self.subjects.contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.subjects.keys().cloned().collect()
    }
}

/// Subjects touched by [`merge_registry`], by outcome.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub inserted: Vec<String>,
    pub extended: Vec<String>,
    pub replaced: Vec<String>,
    pub unchanged: Vec<String>,
    /// Incoming tasks the store already held from another file.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<TaskConflict>,
    /// (subject key, task) pairs whose incoming data was written.
    #[serde(skip)]
    pub accepted: Vec<(String, TaskId)>,
}

/// Fold this run's subjects into the store.
///
/// New subjects are inserted. Known subjects gain only the tasks they lack,
/// unless `overwrite` is set, in which case the stored record is replaced.
/// A task already stored from a different file keeps the stored data and is
/// reported as a conflict.
pub fn merge_registry<S: SubjectStore>(
    store: &mut S,
    registry: &SubjectRegistry,
    overwrite: bool,
) -> MergeReport {
    let mut report = MergeReport::default();
    for record in registry.subjects() {
        let key = record.key.clone();
        match store.get(&key) {
            None => {
                accept(&mut report, &key, record.tasks());
                store.put(record.clone());
                report.inserted.push(key);
            }
            Some(_) if overwrite => {
                accept(&mut report, &key, record.tasks());
                store.put(record.clone());
                report.replaced.push(key);
            }
            Some(stored) => {
                let mut merged = stored.clone();
                let (added, conflicts) = merged.absorb(record.clone());
                for conflict in conflicts {
                    warn!("{}", conflict);
                    report.conflicts.push(conflict);
                }
                if added.is_empty() {
                    report.unchanged.push(key);
                } else {
                    debug!("{}: adding {:?} to stored record", key, added);
                    accept(&mut report, &key, added);
                    store.put(merged);
                    report.extended.push(key);
                }
            }
        }
    }
    info!(
        "store merge: {} inserted, {} extended, {} replaced, {} conflicting",
        report.inserted.len(),
        report.extended.len(),
        report.replaced.len(),
        report.conflicts.len()
    );
    report
}

fn accept(report: &mut MergeReport, key: &str, tasks: impl IntoIterator<Item = TaskId>) {
    report
        .accepted
        .extend(tasks.into_iter().map(|task| (key.to_string(), task)));
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}

/// Write through a temporary file in the same folder so a failed save never
/// leaves a truncated document behind.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    tmp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
