//! # Configuration
//!
//! Stencil configuration is managed by [`confique`], which layers environment
//! variables, a TOML file and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `STENCIL_BACKEND`, `STENCIL_API_URL`, etc.
//! 2. **Config file**: `stencil.toml` in the OS config directory (via the
//!    `directories` crate), or an explicit path.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! Command-line flags are applied on top by the client.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `backend` | `STENCIL_BACKEND` | `local` | `local` or `remote` |
//! | `api_url` | `STENCIL_API_URL` | `http://localhost:8080/api` | Base URL of the template service |
//! | `data_dir` | `STENCIL_DATA_DIR` | OS data dir | Where the local collection lives |
//! | `request_timeout_secs` | `STENCIL_REQUEST_TIMEOUT_SECS` | `30` | Remote request timeout |

use crate::error::{Result, StencilError};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "stencil.toml";

/// Which adapter the façade resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => f.write_str("local"),
            BackendKind::Remote => f.write_str("remote"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "remote" => Ok(BackendKind::Remote),
            other => Err(format!(
                "unknown backend '{}' (expected local or remote)",
                other
            )),
        }
    }
}

// Goes through FromStr so env values, TOML and defaults all accept any casing.
impl<'de> Deserialize<'de> for BackendKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Configuration for stencil, stored in `stencil.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StencilConfig {
    /// Storage backend: "local" (default) or "remote".
    #[config(env = "STENCIL_BACKEND", default = "local")]
    pub backend: BackendKind,

    /// Base URL of the remote template service.
    #[config(env = "STENCIL_API_URL", default = "http://localhost:8080/api")]
    pub api_url: String,

    /// Directory for the local collection. When absent, the OS data
    /// directory is used.
    #[config(env = "STENCIL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Timeout for a single remote request, in seconds.
    #[config(env = "STENCIL_REQUEST_TIMEOUT_SECS", default = 30)]
    pub request_timeout_secs: u64,
}

impl Default for StencilConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Local,
            api_url: "http://localhost:8080/api".to_string(),
            data_dir: None,
            request_timeout_secs: 30,
        }
    }
}

impl StencilConfig {
    /// Load from the environment and, if it exists, the given file.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| StencilError::Config(e.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StencilConfig::default();
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.api_url, "http://localhost:8080/api");
        assert_eq!(config.data_dir, None);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!("remote".parse::<BackendKind>(), Ok(BackendKind::Remote));
        assert_eq!(" Local ".parse::<BackendKind>(), Ok(BackendKind::Local));
        assert!("s3".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_backend_kind_display_matches_parse() {
        for kind in [BackendKind::Local, BackendKind::Remote] {
            assert_eq!(kind.to_string().parse::<BackendKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = StencilConfig {
            backend: BackendKind::Remote,
            api_url: "https://templates.example.com/api".to_string(),
            data_dir: Some(PathBuf::from("/tmp/stencil")),
            request_timeout_secs: 5,
        };
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("backend = \"remote\""));
        let back: StencilConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "backend = \"remote\"\napi_url = \"http://svc:9000\"\nrequest_timeout_secs = 3\n",
        )
        .unwrap();

        let config = StencilConfig::load_from(Some(&path)).unwrap();
        if std::env::var("STENCIL_BACKEND").is_err() {
            assert_eq!(config.backend, BackendKind::Remote);
        }
        if std::env::var("STENCIL_API_URL").is_err() {
            assert_eq!(config.api_url, "http://svc:9000");
        }
    }
}
