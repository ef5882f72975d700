//! # Storage Layer
//!
//! This module defines the capability contract every template backend
//! implements, [`TemplateStore`], and the two implementations behind it.
//!
//! ## The Contract
//!
//! | Operation | Not found | Notes |
//! |-----------|-----------|-------|
//! | `list` | n/a | Meta only, most recently updated first |
//! | `get` | `Ok(None)` | Full record with design and history |
//! | `save` | creates | Appends exactly one version |
//! | `update_meta` | `Ok(None)` | Never adds a version, never touches design |
//! | `remove` | `Ok(())` | Silent no-op |
//! | `clone_template` | `Ok(None)` | New id, `" Copy"` name, fresh history |
//! | `send_test` | receipt | No persisted state |
//!
//! Missing records are values, not errors. Errors are reserved for I/O and
//! transport failures.
//!
//! ## Implementations
//!
//! - [`local::LocalStore`]: the whole collection as one JSON blob in a
//!   [`backend::ByteStore`]. Runs the [`crate::versioning`] engine in-process.
//!   - [`fs::FileStore`]: blob in a file under the data directory.
//!   - [`memory::InMemoryStore`]: blob in memory, for tests.
//! - [`remote::RemoteStore`]: HTTP client for a template service. Versioning
//!   and thumbnails are the server's job.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! └── templates.json    # JSON array of TemplateRecord
//! ```

use crate::error::Result;
use crate::model::{MetaUpdate, SaveInput, SendTestReceipt, TemplateMeta, TemplateRecord};
use async_trait::async_trait;

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod local;
pub mod mem_backend;
pub mod memory;
pub mod remote;

/// Abstract interface for template storage.
///
/// Every operation is async so local and remote backends are interchangeable,
/// even though the local one never actually suspends.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// List template metadata, most recently updated first.
    async fn list(&self) -> Result<Vec<TemplateMeta>>;

    /// Get a full record. `None` if the id is unknown.
    async fn get(&self, id: &str) -> Result<Option<TemplateRecord>>;

    /// Create or update a record, appending a version.
    async fn save(&self, input: SaveInput) -> Result<TemplateRecord>;

    /// Update metadata fields only. `None` if the id is unknown.
    async fn update_meta(&self, update: MetaUpdate) -> Result<Option<TemplateRecord>>;

    /// Delete a record. Unknown ids are ignored.
    async fn remove(&self, id: &str) -> Result<()>;

    /// Copy a record into a new one. `None` if there is nothing to copy.
    async fn clone_template(&self, id: &str) -> Result<Option<TemplateRecord>>;

    /// Ask for a test send of a template to `email`.
    async fn send_test(&self, id: &str, email: &str) -> Result<SendTestReceipt>;
}
