use crate::store::{read_json, write_json};
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Names of log files already ingested by earlier runs.
#[derive(Debug)]
pub struct SeenFiles {
    path: PathBuf,
    names: BTreeSet<String>,
}

impl SeenFiles {
    pub fn load(path: &Path) -> Result<Self> {
        let names = if path.exists() {
            read_json(path)?
        } else {
            BTreeSet::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            names,
        })
    }

    pub fn save(&self) -> Result<()> {
        write_json(&self.path, &self.names)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns false when the name was already recorded.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn persists_between_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.json");
        let mut seen = SeenFiles::load(&path).unwrap();
        assert!(seen.is_empty());
        assert!(seen.insert("a.csv"));
        assert!(!seen.insert("a.csv"));
        seen.save().unwrap();

        let seen = SeenFiles::load(&path).unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen.contains("a.csv"));
        assert!(!seen.contains("b.csv"));
    }
}
