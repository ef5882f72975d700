use super::backend::ByteStore;
use crate::error::{Result, StencilError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory byte storage for testing.
///
/// Uses a `Mutex` so the backend is `Sync` and can sit behind an
/// `Arc<dyn TemplateStore>` like the file backend does.
#[derive(Default)]
pub struct MemBackend {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    simulate_write_error: AtomicBool,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Test helper to plant raw bytes, e.g. corrupt or legacy data.
    pub fn put_raw(&self, key: &str, bytes: impl Into<Vec<u8>>) -> Result<()> {
        self.entries()?.insert(key.to_string(), bytes.into());
        Ok(())
    }

    /// Every key written so far, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| StencilError::Store("memory backend lock poisoned".to_string()))
    }
}

impl ByteStore for MemBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(StencilError::Store("Simulated write error".to_string()));
        }
        self.entries()?.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        format!("memory://{}", key)
    }
}
