use super::local::LocalStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = LocalStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        LocalStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---
