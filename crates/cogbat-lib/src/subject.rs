use crate::io::filename::LogFileIdentity;
use crate::metrics::Summary;
use crate::record::TaskData;
use crate::task::TaskId;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A second log for a (subject, task) pair that already has data.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("subject {key} already has {task} data from {kept}; ignoring {rejected}")]
pub struct TaskConflict {
    pub key: String,
    pub task: TaskId,
    pub kept: String,
    pub rejected: String,
}

/// All task data gathered for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub key: String,
    pub id: String,
    pub group: String,
    pub sibling: bool,
    pub data: BTreeMap<TaskId, TaskData>,
}

impl SubjectRecord {
    pub fn from_identity(identity: &LogFileIdentity) -> Self {
        Self {
            key: identity.key.clone(),
            id: identity.subject_id.clone(),
            group: identity.group.clone(),
            sibling: identity.sibling,
            data: BTreeMap::new(),
        }
    }

    /// Attach a task's data. The first file seen for a task is kept.
    pub fn add_data(&mut self, data: TaskData) -> Result<(), TaskConflict> {
        let task = data.task();
        if let Some(kept) = self.data.get(&task) {
            return Err(TaskConflict {
                key: self.key.clone(),
                task,
                kept: kept.identity.file_name.clone(),
                rejected: data.identity.file_name,
            });
        }
        self.data.insert(task, data);
        Ok(())
    }

    pub fn has_task(&self, task: TaskId) -> bool {
        self.data.contains_key(&task)
    }

    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.data.keys().copied()
    }

    /// Summary scalars of every task, merged into one mapping.
    pub fn summary(&self) -> Summary {
        self.data
            .values()
            .flat_map(|data| data.summary.iter())
            .map(|(name, value)| (name.clone(), *value))
            .collect()
    }

    /// Take over the tasks of `other` that this record lacks.
    ///
    /// Returns the tasks that were added, and a conflict for every task this
    /// record already holds from a different file. The same file offered
    /// again is not a conflict.
    pub fn absorb(&mut self, other: SubjectRecord) -> (Vec<TaskId>, Vec<TaskConflict>) {
        let mut added = Vec::new();
        let mut conflicts = Vec::new();
        for (task, data) in other.data {
            match self.add_data(data) {
                Ok(()) => added.push(task),
                Err(conflict) if conflict.kept != conflict.rejected => conflicts.push(conflict),
                Err(_) => {}
            }
        }
        (added, conflicts)
    }
}

/// Subjects collected during one run, keyed by subject key.
#[derive(Debug, Default)]
pub struct SubjectRegistry {
    subjects: BTreeMap<String, SubjectRecord>,
    conflicts: Vec<TaskConflict>,
}

impl SubjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `data` under its subject. Returns false (and records the
    /// conflict) when the subject already has data for that task.
    pub fn add(&mut self, data: TaskData) -> bool {
        let record = self
            .subjects
            .entry(data.identity.key.clone())
            .or_insert_with(|| SubjectRecord::from_identity(&data.identity));
        match record.add_data(data) {
            Ok(()) => true,
            Err(conflict) => {
                warn!("{}", conflict);
                self.conflicts.push(conflict);
                false
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&SubjectRecord> {
        self.subjects.get(key)
    }

    pub fn subjects(&self) -> impl Iterator<Item = &SubjectRecord> {
        self.subjects.values()
    }

    pub fn conflicts(&self) -> &[TaskConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

}
