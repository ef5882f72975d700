use crate::error::Result;

/// Abstract interface for raw byte storage.
///
/// This trait handles the "how" of local persistence (filesystem vs memory),
/// while [`super::local::LocalStore`] handles the "what" (the collection,
/// versioning, recovery from bad data).
pub trait ByteStore: Send + Sync {
    /// Read the bytes stored under `key`.
    /// Returns Ok(None) if nothing was ever written there.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace whatever is stored under `key`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Human readable location of `key`, for diagnostics.
    fn describe(&self, key: &str) -> String;
}
