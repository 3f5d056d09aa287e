use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::WatchError;

/// File-backed set of listing keys that have already been evaluated.
///
/// Plain text, one key per line, no header, order not significant. No
/// locking: the watcher assumes at most one run is active at a time, and
/// concurrent runs would race on this file.
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// A missing file is a fresh start, not an error.
    pub fn load(&self) -> Result<HashSet<String>, WatchError> {
        if !self.path.exists() {
            debug!("no seen file at {}, starting empty", self.path.display());
            return Ok(HashSet::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            WatchError::StateError(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Full overwrite of the persisted set.
    pub fn save(&self, seen: &HashSet<String>) -> Result<(), WatchError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WatchError::StateError(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let keys: Vec<&str> = seen.iter().map(String::as_str).collect();
        fs::write(&self.path, keys.join("\n")).map_err(|e| {
            WatchError::StateError(format!("cannot write {}: {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = SeenStore::new(dir.path().join("previous_apartments.txt"));

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = SeenStore::new(dir.path().join("previous_apartments.txt"));

        let keys: HashSet<String> = ["123@2024-01-01", "456@2024-02-01", "789@2024-03-15"]
            .iter()
            .map(|k| k.to_string())
            .collect();

        store.save(&keys).unwrap();
        assert_eq!(store.load().unwrap(), keys);
    }

    #[test]
    fn test_save_is_full_overwrite() {
        let dir = tempdir().unwrap();
        let store = SeenStore::new(dir.path().join("previous_apartments.txt"));

        let first: HashSet<String> = HashSet::from(["old@2023-01-01".to_string()]);
        store.save(&first).unwrap();

        let second: HashSet<String> = HashSet::from(["new@2024-01-01".to_string()]);
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), second);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let store = SeenStore::new(dir.path().join("out").join("previous_apartments.txt"));

        store.save(&HashSet::from(["123@2024-01-01".to_string()])).unwrap();
        assert!(store.load().unwrap().contains("123@2024-01-01"));
    }

    #[test]
    fn test_blank_lines_are_ignored_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("previous_apartments.txt");
        std::fs::write(&path, "123@2024-01-01\n\n456@2024-02-01\n").unwrap();

        let store = SeenStore::new(path);
        let seen = store.load().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("123@2024-01-01"));
        assert!(seen.contains("456@2024-02-01"));
    }
}
