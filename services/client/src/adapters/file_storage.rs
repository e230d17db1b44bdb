//! services/client/src/adapters/file_storage.rs
//!
//! A file-backed implementation of the `SessionStorage` port.
//!
//! All keys live in one JSON object on disk. Writes go to a sibling temporary
//! file first and are then renamed over the original, so a crash mid-write
//! leaves the previous contents intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use signal_client_core::ports::{PortError, PortResult, SessionStorage};

type Entries = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_entries(&self) -> PortResult<Entries> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(io_error(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            PortError::Unexpected(format!(
                "session file {} is not valid JSON: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn store_entries(&self, entries: &Entries) -> PortResult<()> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_error(&self.path, e)),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let serialized = serde_json::to_string_pretty(entries)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized).map_err(|e| io_error(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| io_error(&self.path, e))
    }

    fn guard(&self) -> PortResult<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| PortError::Unexpected("session file lock poisoned".to_string()))
    }
}

impl SessionStorage for FileSessionStorage {
    fn read(&self, key: &str) -> PortResult<Option<String>> {
        let _guard = self.guard()?;
        Ok(self.load_entries()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> PortResult<()> {
        let _guard = self.guard()?;
        // An unreadable file is replaced rather than blocking every future login.
        let mut entries = self.load_entries().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.store_entries(&entries)
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        let _guard = self.guard()?;
        let mut entries = self.load_entries().unwrap_or_default();
        entries.remove(key);
        self.store_entries(&entries)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> PortError {
    PortError::Unexpected(format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(temp_dir.path().join("session.json"));
        assert_eq!(storage.read("userInfo").unwrap(), None);
    }

    #[test]
    fn values_survive_a_new_instance() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("session.json");

        FileSessionStorage::new(&path)
            .write("userInfo", r#"{"token":"abc"}"#)
            .unwrap();

        let reopened = FileSessionStorage::new(&path);
        assert_eq!(
            reopened.read("userInfo").unwrap().as_deref(),
            Some(r#"{"token":"abc"}"#)
        );
    }

    #[test]
    fn removing_the_last_key_deletes_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let storage = FileSessionStorage::new(&path);

        storage.write("userInfo", "{}").unwrap();
        assert!(path.exists());

        storage.remove("userInfo").unwrap();
        assert!(!path.exists());
        storage.remove("userInfo").unwrap();
    }

    #[test]
    fn corrupt_file_is_an_error_on_read_and_replaced_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "{ invalid json").unwrap();
        let storage = FileSessionStorage::new(&path);

        assert!(matches!(
            storage.read("userInfo"),
            Err(PortError::Unexpected(_))
        ));

        storage.write("userInfo", "{}").unwrap();
        assert_eq!(storage.read("userInfo").unwrap().as_deref(), Some("{}"));
    }
}
