//! StateStore - JSON snapshot persistence

use crate::error::StoreError;
use crate::models::SystemSnapshot;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the default snapshot under the user's home directory
pub const DEFAULT_STATE_FILE: &str = ".presence.json";

/// Snapshot file location
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted snapshot; its stored `changed` flag is discarded
    pub fn load(&self) -> Result<SystemSnapshot, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let snapshot: SystemSnapshot =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(snapshot.loaded())
    }

    /// Save using atomic write
    ///
    /// Writes to a temporary file in the target directory, then persists it
    /// over the target so readers never see a partial snapshot.
    pub fn save(&self, snapshot: &SystemSnapshot) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(snapshot)?;
        let write_error = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(write_error)?;

        let mut temp_file = NamedTempFile::new_in(&parent).map_err(write_error)?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(write_error)?;
        temp_file.flush().map_err(write_error)?;
        temp_file.as_file().sync_all().map_err(write_error)?;

        temp_file
            .persist(&self.path)
            .map_err(|e| write_error(e.error))?;

        Ok(())
    }

    /// Save only if the snapshot changed; returns whether a write happened
    pub fn save_if_changed(&self, snapshot: &SystemSnapshot) -> Result<bool, StoreError> {
        if !snapshot.changed {
            return Ok(false);
        }
        self.save(snapshot)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonRecord;
    use tempfile::TempDir;

    fn sample() -> SystemSnapshot {
        let alice = PersonRecord::new("Alice", "aa:bb", "app1", "tok1");
        let bob = PersonRecord::new("Bob", "cc:dd", "app2", "tok2");
        SystemSnapshot::fresh("http://hub", vec![alice, bob])
    }

    #[test]
    fn test_save_then_load_restores_people() {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path().join("state.json"));
        let mut snapshot = sample();
        snapshot.people[1].at_home = true;

        store.save(&snapshot).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.base_url, "http://hub");
        assert_eq!(loaded.people, snapshot.people);
        assert!(!loaded.changed);
    }

    #[test]
    fn test_load_clears_changed_flag_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        fs::write(
            &path,
            r#"{"baseurl":"http://hub","changed":true,"people":[{"name":"Alice","macaddr":"aa","appid":"a","token":"t","changed":true,"checked":true,"athome":true}]}"#,
        )
        .unwrap();

        let loaded = StateStore::new(&path).load().unwrap();
        assert!(!loaded.changed);
        assert!(loaded.people[0].at_home);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = StateStore::new(temp_dir.path().join("missing.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let err = StateStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn test_save_creates_parent_and_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/state.json");
        let store = StateStore::new(&path);

        store.save(&sample()).unwrap();
        let mut second = sample();
        second.base_url = "http://other".to_string();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap().base_url, "http://other");
        // Only the snapshot remains; no temp files left behind
        let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_save_if_changed_skips_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let store = StateStore::new(temp_dir.path().join("state.json"));

        let written = store.save_if_changed(&sample().loaded()).unwrap();
        assert!(!written);
        assert!(!store.path().exists());

        assert!(store.save_if_changed(&sample()).unwrap());
        assert!(store.path().exists());
    }
}
