//! # Initialization
//!
//! Builds a ready-to-use [`StencilContext`] for a client: loads configuration,
//! applies the client's overrides, resolves the data directory, and wraps it
//! all in a [`TemplateApi`].
//!
//! ## Resolution Order
//!
//! For every setting, the first of these that is set wins:
//!
//! 1. [`Overrides`] passed by the client (CLI flags)
//! 2. Environment variables (`STENCIL_*`)
//! 3. `stencil.toml` at the explicit path, or in the OS config directory
//! 4. Compiled defaults
//!
//! The data directory falls back to the OS data directory
//! (`~/.local/share/stencil` on Linux) when nothing sets it.
//!
//! ## Environment Variables
//!
//! * `STENCIL_CONFIG` - Path to a config file, bypassing the OS config dir.
//!   Mostly used by tests to isolate from the user's config.

use crate::api::TemplateApi;
use crate::config::{BackendKind, StencilConfig, CONFIG_FILE_NAME};
use crate::error::Result;
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct StencilContext {
    pub api: TemplateApi,
    pub config: StencilConfig,
}

/// Settings a client forces regardless of env and config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<BackendKind>,
    pub api_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "stencil", "stencil")
}

/// OS-appropriate directory for the local collection.
pub fn default_data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// OS-appropriate location of `stencil.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load configuration and build the context.
///
/// The backend itself is not constructed here; the façade resolves it on
/// first use.
pub fn initialize(overrides: Overrides) -> Result<StencilContext> {
    let config_path = overrides
        .config_path
        .clone()
        .or_else(|| std::env::var("STENCIL_CONFIG").ok().map(PathBuf::from))
        .or_else(default_config_path);

    let mut config = StencilConfig::load_from(config_path.as_deref())?;
    apply_overrides(&mut config, overrides);

    if config.data_dir.is_none() {
        config.data_dir = default_data_dir();
    }

    tracing::debug!(
        backend = %config.backend,
        config_path = ?config_path,
        data_dir = ?config.data_dir,
        "Initialized stencil context"
    );

    let api = TemplateApi::new(config.clone());
    Ok(StencilContext { api, config })
}

fn apply_overrides(config: &mut StencilConfig, overrides: Overrides) {
    if let Some(backend) = overrides.backend {
        config.backend = backend;
    }
    if let Some(api_url) = overrides.api_url {
        config.api_url = api_url;
    }
    if let Some(data_dir) = overrides.data_dir {
        config.data_dir = Some(data_dir);
    }
}
