//! The local adapter: one serialized collection in a [`ByteStore`].
//!
//! Every mutation is a full cycle: load the collection, apply the
//! [`crate::versioning`] rules in memory, persist the whole collection back.
//! There are no partial writes.
//!
//! Reads never fail. A missing blob is an empty collection; a blob that cannot
//! be read or parsed is logged and also treated as empty.
//!
//! Mutations are stricter, since they rewrite the whole collection:
//!
//! - A failed read aborts the mutation with the read error. Nothing is written.
//! - A blob that does not parse is copied aside to `<key>.corrupt-<timestamp>`
//!   before the fresh collection replaces it.

use super::backend::ByteStore;
use super::TemplateStore;
use crate::error::{Result, StencilError};
use crate::model::{MetaUpdate, SaveInput, SendTestReceipt, TemplateMeta, TemplateRecord};
use crate::versioning;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

/// Key the collection is stored under.
pub const COLLECTION_KEY: &str = "templates";

/// What [`LocalStore::load`] found.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// Nothing stored yet.
    Empty,
    /// Something was stored but could not be read back. Carries the reason.
    Corrupt(String),
    Records(Vec<TemplateRecord>),
}

impl Loaded {
    pub fn into_records(self) -> Vec<TemplateRecord> {
        match self {
            Loaded::Records(records) => records,
            Loaded::Empty | Loaded::Corrupt(_) => Vec::new(),
        }
    }
}

pub struct LocalStore<B: ByteStore> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    key: String,
    // Serializes load/mutate/persist cycles. Never held across an await.
    write_lock: Mutex<()>,
}

impl<B: ByteStore> LocalStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            key: COLLECTION_KEY.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Where the collection lives, for diagnostics.
    pub fn location(&self) -> String {
        self.backend.describe(&self.key)
    }

    pub fn load(&self) -> Loaded {
        let bytes = match self.backend.read(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Loaded::Empty,
            Err(e) => {
                tracing::warn!(location = %self.location(), error = %e, "Could not read template collection, starting empty");
                return Loaded::Corrupt(e.to_string());
            }
        };

        self.parse(&bytes)
    }

    fn parse(&self, bytes: &[u8]) -> Loaded {
        match serde_json::from_slice::<Vec<TemplateRecord>>(bytes) {
            Ok(records) => Loaded::Records(records),
            Err(e) => {
                tracing::warn!(location = %self.location(), error = %e, "Template collection is malformed, starting empty");
                Loaded::Corrupt(e.to_string())
            }
        }
    }

    /// Copies an unparsable blob to a sibling key so a rewrite cannot lose it.
    fn quarantine(&self, bytes: &[u8], reason: &str) -> Result<()> {
        let key = format!(
            "{}.corrupt-{}",
            self.key,
            Utc::now().format("%Y%m%dT%H%M%S%.3fZ")
        );
        self.backend.write(&key, bytes)?;
        tracing::warn!(
            location = %self.location(),
            moved_to = %self.backend.describe(&key),
            reason,
            "Moved malformed template collection aside"
        );
        Ok(())
    }

    pub fn persist(&self, records: &[TemplateRecord]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records).map_err(StencilError::Serialization)?;
        self.backend.write(&self.key, &bytes)
    }

    /// Runs one load → mutate → persist cycle. `apply` returns its result and
    /// whether it changed anything; unchanged collections are not rewritten.
    /// Unlike [`Self::load`], a read error is returned rather than read as empty.
    fn mutate<T>(&self, apply: impl FnOnce(&mut Vec<TemplateRecord>) -> (T, bool)) -> Result<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StencilError::Store("local store lock poisoned".to_string()))?;

        let bytes = self.backend.read(&self.key)?;
        let loaded = match &bytes {
            Some(bytes) => self.parse(bytes),
            None => Loaded::Empty,
        };
        let corrupt = match &loaded {
            Loaded::Corrupt(reason) => Some(reason.clone()),
            Loaded::Empty | Loaded::Records(_) => None,
        };

        let mut records = loaded.into_records();
        let (out, changed) = apply(&mut records);
        if changed {
            if let (Some(reason), Some(bytes)) = (corrupt, &bytes) {
                self.quarantine(bytes, &reason)?;
            }
            self.persist(&records)?;
        }
        Ok(out)
    }
}

#[async_trait]
impl<B: ByteStore> TemplateStore for LocalStore<B> {
    async fn list(&self) -> Result<Vec<TemplateMeta>> {
        Ok(versioning::list_meta(&self.load().into_records()))
    }

    async fn get(&self, id: &str) -> Result<Option<TemplateRecord>> {
        let records = self.load().into_records();
        Ok(versioning::find(&records, id).cloned())
    }

    async fn save(&self, input: SaveInput) -> Result<TemplateRecord> {
        let record = self.mutate(|records| {
            (versioning::apply_save(records, input, Utc::now()), true)
        })?;
        tracing::debug!(id = %record.meta.id, versions = record.versions.len(), "Saved template");
        Ok(record)
    }

    async fn update_meta(&self, update: MetaUpdate) -> Result<Option<TemplateRecord>> {
        let id = update.id.clone();
        let updated = self.mutate(|records| {
            let updated = versioning::apply_meta_update(records, update, Utc::now());
            let changed = updated.is_some();
            (updated, changed)
        })?;
        if updated.is_none() {
            tracing::debug!(%id, "Metadata update for unknown template");
        }
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let removed = self.mutate(|records| {
            let removed = versioning::apply_remove(records, id);
            (removed, removed)
        })?;
        tracing::debug!(%id, removed, "Remove template");
        Ok(())
    }

    async fn clone_template(&self, id: &str) -> Result<Option<TemplateRecord>> {
        let Some(source) = self.get(id).await? else {
            return Ok(None);
        };
        let copy = self.save(versioning::clone_input(&source)).await?;
        tracing::debug!(source = %id, copy = %copy.meta.id, "Cloned template");
        Ok(Some(copy))
    }

    async fn send_test(&self, id: &str, email: &str) -> Result<SendTestReceipt> {
        let records = self.load().into_records();
        if versioning::find(&records, id).is_none() {
            return Ok(SendTestReceipt::failed(format!("Template not found: {}", id)));
        }
        tracing::info!(%id, %email, "Test send requested on the local backend, which has no mail transport");
        Ok(SendTestReceipt::failed(format!(
            "Not sent: the local backend has no mail transport, nothing was delivered to {}",
            email
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TemplateStatus;
    use crate::store::mem_backend::MemBackend;
    use crate::store::memory::InMemoryStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn welcome() -> SaveInput {
        SaveInput::new("Welcome", "Hi", json!({"a": 1})).with_html("<p>Hi</p>")
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let store = InMemoryStore::new();
        let saved = store.save(welcome()).await.unwrap();

        let fetched = store.get(&saved.meta.id).await.unwrap().unwrap();
        assert_eq!(fetched.meta.name, "Welcome");
        assert_eq!(fetched.meta.subject, "Hi");
        assert_eq!(fetched.design, json!({"a": 1}));
        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn welcome_scenario() {
        let store = InMemoryStore::new();
        let first = store.save(welcome()).await.unwrap();
        assert_eq!(first.versions.len(), 1);
        assert!(first.meta.thumbnail.is_some());

        let second = store
            .save(
                SaveInput::new("Welcome", "Hi", json!({"a": 2}))
                    .with_id(first.meta.id.clone())
                    .with_html("<p>Hi again</p>"),
            )
            .await
            .unwrap();

        assert_eq!(second.meta.id, first.meta.id);
        assert_eq!(second.versions.len(), 2);
        assert_eq!(second.versions[0].design, json!({"a": 2}));
        assert_eq!(second.meta.thumbnail, first.meta.thumbnail);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_ids_are_none_not_errors() {
        let store = InMemoryStore::new();
        assert!(store.get("nonexistent").await.unwrap().is_none());

        let mut update = MetaUpdate::new("nonexistent");
        update.name = Some("X".into());
        assert!(store.update_meta(update).await.unwrap().is_none());

        assert!(store.clone_template("nonexistent").await.unwrap().is_none());
        store.remove("nonexistent").await.unwrap();
    }

    #[tokio::test]
    async fn update_meta_persists_without_new_version() {
        let store = InMemoryStore::new();
        let saved = store.save(welcome()).await.unwrap();

        let mut update = MetaUpdate::new(saved.meta.id.clone());
        update.name = Some("X".into());
        update.status = Some(TemplateStatus::Active);
        store.update_meta(update).await.unwrap().unwrap();

        let fetched = store.get(&saved.meta.id).await.unwrap().unwrap();
        assert_eq!(fetched.meta.name, "X");
        assert_eq!(fetched.meta.status, TemplateStatus::Active);
        assert_eq!(fetched.design, saved.design);
        assert_eq!(fetched.versions.len(), saved.versions.len());
    }

    #[tokio::test]
    async fn clone_is_independent() {
        let store = InMemoryStore::new();
        let source = store.save(welcome()).await.unwrap();
        store
            .save(
                SaveInput::new("Welcome", "Hi", json!({"a": 1}))
                    .with_id(source.meta.id.clone()),
            )
            .await
            .unwrap();

        let copy = store
            .clone_template(&source.meta.id)
            .await
            .unwrap()
            .unwrap();

        assert_ne!(copy.meta.id, source.meta.id);
        assert!(copy.meta.name.ends_with(" Copy"));
        assert_eq!(copy.design, source.design);
        assert_eq!(copy.versions.len(), 1);
        let source_now = store.get(&source.meta.id).await.unwrap().unwrap();
        assert!(copy
            .versions
            .iter()
            .all(|v| source_now.versions.iter().all(|s| s.id != v.id)));
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn remove_deletes_record() {
        let store = InMemoryStore::new();
        let a = store.save(welcome()).await.unwrap();
        let b = store.save(welcome()).await.unwrap();

        store.remove(&a.meta.id).await.unwrap();

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![b.meta.id]);
    }

    #[tokio::test]
    async fn corrupt_blob_reads_as_empty() {
        let store = InMemoryStore::new();
        store.backend().put_raw(COLLECTION_KEY, "{not json").unwrap();

        assert!(matches!(store.load(), Loaded::Corrupt(_)));
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.get("anything").await.unwrap().is_none());

        // A save starts a fresh collection over the bad data.
        store.save(welcome()).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn corrupt_blob_is_kept_aside_before_rewrite() {
        let store = InMemoryStore::new();
        store.backend().put_raw(COLLECTION_KEY, "{not json").unwrap();

        // Nothing changes, nothing is written.
        store.remove("anything").await.unwrap();
        assert_eq!(store.backend().keys().unwrap(), vec![COLLECTION_KEY]);

        store.save(welcome()).await.unwrap();

        let keys = store.backend().keys().unwrap();
        let aside: Vec<&String> = keys
            .iter()
            .filter(|k| k.starts_with("templates.corrupt-"))
            .collect();
        assert_eq!(aside.len(), 1);
        assert_eq!(
            store.backend().read(aside[0]).unwrap(),
            Some(b"{not json".to_vec())
        );
    }

    /// Delegates to a [`MemBackend`] but can be told to fail reads.
    #[derive(Default)]
    struct FlakyReads {
        inner: MemBackend,
        fail_reads: AtomicBool,
    }

    impl ByteStore for FlakyReads {
        fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StencilError::Io(std::io::Error::other("disk unavailable")));
            }
            self.inner.read(key)
        }

        fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
            self.inner.write(key, bytes)
        }

        fn describe(&self, key: &str) -> String {
            self.inner.describe(key)
        }
    }

    #[tokio::test]
    async fn read_failure_aborts_mutations_without_losing_records() {
        let store = LocalStore::with_backend(FlakyReads::default());
        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(store.save(welcome()).await.unwrap().meta.id);
        }

        store.backend().fail_reads.store(true, Ordering::SeqCst);

        assert!(matches!(store.save(welcome()).await, Err(StencilError::Io(_))));
        let mut update = MetaUpdate::new(ids[0].clone());
        update.name = Some("X".into());
        assert!(matches!(store.update_meta(update).await, Err(StencilError::Io(_))));
        assert!(matches!(store.remove(&ids[1]).await, Err(StencilError::Io(_))));
        assert!(matches!(
            store.clone_template(&ids[2]).await,
            Ok(None) | Err(StencilError::Io(_))
        ));

        // Reads still degrade to an empty view.
        assert!(store.list().await.unwrap().is_empty());

        store.backend().fail_reads.store(false, Ordering::SeqCst);
        let listed: Vec<String> = store.list().await.unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(listed.len(), 3);
        for id in &ids {
            let record = store.get(id).await.unwrap().unwrap();
            assert_eq!(record.meta.name, "Welcome");
        }
    }

    #[tokio::test]
    async fn legacy_records_gain_empty_history() {
        let store = InMemoryStore::new();
        let legacy = json!([{
            "id": "legacy-1",
            "name": "Old",
            "subject": "S",
            "tags": ["x"],
            "status": "ACTIVE",
            "updatedAt": "2023-05-01T12:00:00Z",
            "design": {"body": "old"}
        }]);
        store
            .backend()
            .put_raw(COLLECTION_KEY, legacy.to_string())
            .unwrap();

        let record = store.get("legacy-1").await.unwrap().unwrap();
        assert!(record.versions.is_empty());
        assert_eq!(record.meta.status, TemplateStatus::Active);

        let resaved = store
            .save(SaveInput::new("Old", "S", json!({"body": "new"})).with_id("legacy-1"))
            .await
            .unwrap();
        assert_eq!(resaved.meta.id, "legacy-1");
        assert_eq!(resaved.versions.len(), 1);
    }

    #[tokio::test]
    async fn write_failure_is_reported() {
        let store = InMemoryStore::new();
        store.backend().set_simulate_write_error(true);

        let result = store.save(welcome()).await;
        assert!(matches!(result, Err(StencilError::Store(_))));

        store.backend().set_simulate_write_error(false);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_test_never_claims_delivery() {
        let store = InMemoryStore::new();
        let receipt = store.send_test("missing", "a@example.com").await.unwrap();
        assert!(!receipt.ok);

        let saved = store.save(welcome()).await.unwrap();
        let receipt = store
            .send_test(&saved.meta.id, "a@example.com")
            .await
            .unwrap();
        assert!(!receipt.ok);
        let message = receipt.message.unwrap();
        assert!(message.contains("Not sent"));
        assert!(message.contains("a@example.com"));
    }
}
