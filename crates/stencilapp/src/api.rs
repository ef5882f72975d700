//! # API Facade
//!
//! [`TemplateApi`] is the single entry point for template operations. Editor
//! pages, gallery pages, the CLI: all of them hold a `TemplateApi` and nothing
//! else from the storage layer.
//!
//! ## Backend Resolution
//!
//! The façade is built from a [`StencilConfig`] but does not touch any backend
//! until first use. The first call resolves [`StencilConfig::backend`]:
//!
//! - [`BackendKind::Local`] (default): a [`FileStore`] in the configured data
//!   directory.
//! - [`BackendKind::Remote`]: a [`RemoteStore`] against `api_url`.
//!
//! The adapter is cached for the lifetime of the façade and every later call
//! reuses it. There is no teardown and no per-call branching on the backend.
//!
//! ## Injection
//!
//! The façade is a value, not a global: construct it once at startup and pass
//! it (or an `Arc` of it) to whoever needs it. [`TemplateApi::with_store`]
//! skips resolution entirely and wraps a ready adapter, which is how tests run
//! against an [`crate::store::memory::InMemoryStore`].

use crate::config::{BackendKind, StencilConfig};
use crate::error::{Result, StencilError};
use crate::init::default_data_dir;
use crate::model::{MetaUpdate, SaveInput, SendTestReceipt, TemplateMeta, TemplateRecord};
use crate::store::fs::FileStore;
use crate::store::remote::RemoteStore;
use crate::store::TemplateStore;
use once_cell::sync::OnceCell;
use std::sync::Arc;

pub struct TemplateApi {
    config: StencilConfig,
    store: OnceCell<Arc<dyn TemplateStore>>,
}

impl TemplateApi {
    pub fn new(config: StencilConfig) -> Self {
        Self {
            config,
            store: OnceCell::new(),
        }
    }

    /// Wrap an already constructed adapter. `backend` is only reported, the
    /// adapter is used as given.
    pub fn with_store(store: Arc<dyn TemplateStore>, backend: BackendKind) -> Self {
        let config = StencilConfig {
            backend,
            ..Default::default()
        };
        Self {
            config,
            store: OnceCell::with_value(store),
        }
    }

    pub fn backend(&self) -> BackendKind {
        self.config.backend
    }

    pub fn config(&self) -> &StencilConfig {
        &self.config
    }

    /// The active adapter, resolving it on first use.
    pub fn store(&self) -> Result<Arc<dyn TemplateStore>> {
        self.store
            .get_or_try_init(|| build_store(&self.config))
            .cloned()
    }

    pub async fn list(&self) -> Result<Vec<TemplateMeta>> {
        self.store()?.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<TemplateRecord>> {
        self.store()?.get(id).await
    }

    pub async fn save(&self, input: SaveInput) -> Result<TemplateRecord> {
        self.store()?.save(input).await
    }

    pub async fn update_meta(&self, update: MetaUpdate) -> Result<Option<TemplateRecord>> {
        self.store()?.update_meta(update).await
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.store()?.remove(id).await
    }

    pub async fn clone_template(&self, id: &str) -> Result<Option<TemplateRecord>> {
        self.store()?.clone_template(id).await
    }

    pub async fn send_test(&self, id: &str, email: &str) -> Result<SendTestReceipt> {
        self.store()?.send_test(id, email).await
    }
}

/// Construct the adapter `config` asks for.
pub fn build_store(config: &StencilConfig) -> Result<Arc<dyn TemplateStore>> {
    match config.backend {
        BackendKind::Local => {
            let root = match &config.data_dir {
                Some(dir) => dir.clone(),
                None => default_data_dir().ok_or_else(|| {
                    StencilError::Config("Could not determine a data directory".to_string())
                })?,
            };
            tracing::debug!(root = %root.display(), "Using local template store");
            Ok(Arc::new(FileStore::new_fs(root)))
        }
        BackendKind::Remote => {
            tracing::debug!(api_url = %config.api_url, "Using remote template store");
            let store = RemoteStore::new(config.api_url.clone(), config.request_timeout())?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::local::Loaded;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::test_utils::TestEnv;
    use serde_json::json;

    #[test]
    fn resolves_once_and_reuses_the_adapter() {
        let env = TestEnv::new();
        let api = TemplateApi::new(env.config());

        let first = api.store().unwrap();
        let second = api.store().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(api.backend(), BackendKind::Local);
    }

    #[test]
    fn remote_backend_resolves_without_connecting() {
        let config = StencilConfig {
            backend: BackendKind::Remote,
            api_url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let api = TemplateApi::new(config);
        assert!(api.store().is_ok());
        assert_eq!(api.backend(), BackendKind::Remote);
    }

    #[tokio::test]
    async fn dispatches_to_injected_store() {
        let fixture = StoreFixture::new().with_templates(2).with_template("Newest");
        let ids = fixture.ids();
        let api = TemplateApi::with_store(Arc::new(fixture.store), BackendKind::Local);

        let listed = api.list().await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].name, "Newest");

        let record = api.get(&ids[0]).await.unwrap().unwrap();
        assert_eq!(record.meta.name, "Template 1");

        let copy = api.clone_template(&ids[0]).await.unwrap().unwrap();
        assert_eq!(copy.meta.name, "Template 1 Copy");

        api.remove(&ids[1]).await.unwrap();
        assert_eq!(api.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn local_facade_persists_to_data_dir() {
        let env = TestEnv::new();
        let api = TemplateApi::new(env.config());

        let saved = api
            .save(SaveInput::new("Welcome", "Hi", json!({"a": 1})))
            .await
            .unwrap();

        assert!(env.root.join("templates.json").exists());
        assert!(matches!(env.store.load(), Loaded::Records(ref r) if r.len() == 1));

        // A second façade over the same directory sees the same data.
        let again = TemplateApi::new(env.config());
        let fetched = again.get(&saved.meta.id).await.unwrap().unwrap();
        assert_eq!(fetched.design, json!({"a": 1}));
    }
}
