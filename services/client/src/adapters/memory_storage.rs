//! services/client/src/adapters/memory_storage.rs
//!
//! An in-process implementation of the `SessionStorage` port. Nothing survives
//! the process; useful for tests and one-shot scripting.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use signal_client_core::ports::{PortError, PortResult, SessionStorage};

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> PortResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| PortError::Unexpected("session storage lock poisoned".to_string()))
    }
}

impl SessionStorage for MemorySessionStorage {
    fn read(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> PortResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_remove() {
        let storage = MemorySessionStorage::new();
        assert_eq!(storage.read("userInfo").unwrap(), None);

        storage.write("userInfo", "{}").unwrap();
        storage.write("userInfo", "{\"token\":\"t\"}").unwrap();
        assert_eq!(
            storage.read("userInfo").unwrap().as_deref(),
            Some("{\"token\":\"t\"}")
        );

        storage.remove("userInfo").unwrap();
        storage.remove("userInfo").unwrap();
        assert_eq!(storage.read("userInfo").unwrap(), None);
    }
}
