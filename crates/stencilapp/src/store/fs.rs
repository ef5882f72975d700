use super::fs_backend::FsBackend;
use super::local::LocalStore;
use std::path::{Path, PathBuf};

/// Production local store: the collection lives in `<root>/templates.json`.
pub type FileStore = LocalStore<FsBackend>;

impl FileStore {
    pub fn new_fs(root: PathBuf) -> Self {
        LocalStore::with_backend(FsBackend::new(root))
    }

    pub fn root(&self) -> &Path {
        self.backend.root()
    }
}
