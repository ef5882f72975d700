use super::backend::ByteStore;
use crate::error::{Result, StencilError};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stores each key as `<root>/<key>.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(StencilError::Io)?;
        }
        Ok(())
    }
}

impl ByteStore for FsBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(StencilError::Io)?;
        Ok(Some(bytes))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.ensure_dir()?;

        let target_path = self.path_for(key);

        // Atomic Write
        let tmp_path = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_path, bytes).map_err(StencilError::Io)?;
        fs::rename(&tmp_path, target_path).map_err(StencilError::Io)?;

        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        self.path_for(key).display().to_string()
    }
}
