//! # Stencil Architecture
//!
//! Stencil is a **versioned template store**. Templates are named, tagged
//! documents that carry a current design plus a capped history of earlier
//! designs. The library sits between whatever edits those designs (a visual
//! email composer, a script, the bundled CLI) and one of two persistence
//! backends, and keeps callers unaware of which one is in use.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Clients (editor pages, gallery, the `stencil` CLI)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Facade (api.rs)                                        │
//! │  - Resolves the backend once, from configuration            │
//! │  - The only storage symbol clients depend on                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - TemplateStore trait: the capability contract             │
//! │  - LocalStore: one JSON blob in a ByteStore                 │
//! │  - RemoteStore: HTTP client for a template service          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ (local only)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Versioning Engine (versioning.rs, thumbnail.rs)            │
//! │  - Pure functions over the in-memory collection             │
//! │  - Version cap, save vs. metadata update, thumbnails        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Missing Is Not An Error
//!
//! `get`, `update_meta` and `clone_template` return `Ok(None)` for ids that do
//! not exist. `Err` is reserved for things that actually went wrong: disk
//! writes, transport failures, non-2xx answers from the remote service.
//! Unreadable local data is logged and read as an empty collection, but a
//! mutation never overwrites what it could not read.
//!
//! ## Module Overview
//!
//! - [`api`]: The façade and backend resolution
//! - [`store`]: The contract and its local/remote implementations
//! - [`versioning`]: Save, metadata update, clone and history rules
//! - [`thumbnail`]: Text preview thumbnails from rendered markup
//! - [`model`]: Core data types (`TemplateRecord`, `TemplateMeta`, `TemplateVersion`)
//! - [`config`]: Configuration management
//! - [`init`]: Context setup for clients
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod store;
pub mod thumbnail;
pub mod versioning;

#[cfg(test)]
pub(crate) mod test_utils;
