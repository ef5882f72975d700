//! The remote adapter: a thin HTTP client for a template service.
//!
//! | Operation | Request | On failure |
//! |-----------|---------|------------|
//! | `list` | `GET /templates` | error |
//! | `get` | `GET /templates/{id}` | 404 → `None`, else error |
//! | `save` | `POST /templates` or `PUT /templates/{id}` | error |
//! | `update_meta` | `PATCH /templates/{id}` | 404 → `None`, else error |
//! | `remove` | `DELETE /templates/{id}` | logged, reported as success |
//! | `clone_template` | `POST /templates/{id}/clone` | logged, `None` |
//! | `send_test` | `POST /templates/{id}/send-test` | logged, reported as success |
//!
//! Versioning and thumbnails happen on the server; responses are relayed
//! as-is. Requests are not queued or sequenced: two in-flight saves of the same
//! id resolve in whatever order the server answers them.

use super::TemplateStore;
use crate::error::{Result, StencilError};
use crate::model::{MetaUpdate, SaveInput, SendTestReceipt, TemplateMeta, TemplateRecord};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::time::Duration;

pub struct RemoteStore {
    client: reqwest::Client,
    api_url: Url,
}

impl RemoteStore {
    /// Create a client for the service rooted at `api_url`, e.g.
    /// `http://host:8080/api` (templates live at `{api_url}/templates`).
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StencilError::Http)?;
        Self::with_client(client, api_url)
    }

    /// Create a store reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Result<Self> {
        let raw = api_url.into();
        let api_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| StencilError::Config(format!("invalid api_url '{}': {}", raw, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(StencilError::Config(format!(
                "invalid api_url '{}': not a base URL",
                raw
            )));
        }
        Ok(Self { client, api_url })
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    /// `{api_url}/templates/<segments...>`. Each segment is percent-encoded,
    /// so ids containing `/`, `?` or `#` stay a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("templates").extend(segments);
        }
        url
    }

    fn collection_url(&self) -> Url {
        self.endpoint(&[])
    }

    fn item_url(&self, id: &str) -> Url {
        self.endpoint(&[id])
    }

    // ---- private helpers ----

    /// Returns the response unchanged on success, or an
    /// [`StencilError::Api`] carrying status and body on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StencilError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Like [`Self::parse_response`], but a 404 is `None`.
    async fn parse_optional<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::parse_response(response).await.map(Some)
    }
}

#[async_trait]
impl TemplateStore for RemoteStore {
    async fn list(&self) -> Result<Vec<TemplateMeta>> {
        let response = self.client.get(self.collection_url()).send().await?;
        Self::parse_response(response).await
    }

    async fn get(&self, id: &str) -> Result<Option<TemplateRecord>> {
        let response = self.client.get(self.item_url(id)).send().await?;
        Self::parse_optional(response).await
    }

    async fn save(&self, input: SaveInput) -> Result<TemplateRecord> {
        let request = match input.id.as_deref() {
            Some(id) => self.client.put(self.item_url(id)),
            None => self.client.post(self.collection_url()),
        };
        let response = request.json(&input).send().await?;
        let record: TemplateRecord = Self::parse_response(response).await?;
        tracing::debug!(id = %record.meta.id, "Saved template remotely");
        Ok(record)
    }

    async fn update_meta(&self, update: MetaUpdate) -> Result<Option<TemplateRecord>> {
        let response = self
            .client
            .patch(self.item_url(&update.id))
            .json(&update)
            .send()
            .await?;
        Self::parse_optional(response).await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        match self.client.delete(self.item_url(id)).send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(%id, status = response.status().as_u16(), "Remote delete was not accepted");
            }
            Ok(_) => tracing::debug!(%id, "Removed template remotely"),
            Err(e) => tracing::warn!(%id, error = %e, "Remote delete failed"),
        }
        Ok(())
    }

    async fn clone_template(&self, id: &str) -> Result<Option<TemplateRecord>> {
        let attempt = async {
            let response = self
                .client
                .post(self.endpoint(&[id, "clone"]))
                .send()
                .await?;
            Self::parse_response::<TemplateRecord>(response).await
        };

        match attempt.await {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(%id, error = %e, "Remote clone failed");
                Ok(None)
            }
        }
    }

    async fn send_test(&self, id: &str, email: &str) -> Result<SendTestReceipt> {
        let result = self
            .client
            .post(self.endpoint(&[id, "send-test"]))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await;

        match result {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(%id, status = response.status().as_u16(), "Remote send-test was not accepted");
            }
            Ok(_) => tracing::debug!(%id, %email, "Remote send-test issued"),
            Err(e) => tracing::warn!(%id, error = %e, "Remote send-test failed"),
        }
        Ok(SendTestReceipt::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let store =
            RemoteStore::with_client(reqwest::Client::new(), "http://host:8080/api/").unwrap();
        assert_eq!(store.api_url(), "http://host:8080/api");
        assert_eq!(store.collection_url().as_str(), "http://host:8080/api/templates");
        assert_eq!(store.item_url("abc").as_str(), "http://host:8080/api/templates/abc");
        assert_eq!(
            store.endpoint(&["abc", "send-test"]).as_str(),
            "http://host:8080/api/templates/abc/send-test"
        );
    }

    #[test]
    fn ids_are_a_single_encoded_segment() {
        let store = RemoteStore::with_client(reqwest::Client::new(), "http://host/api").unwrap();
        assert_eq!(
            store.item_url("a?b").as_str(),
            "http://host/api/templates/a%3Fb"
        );
        assert_eq!(
            store.item_url("x#frag").as_str(),
            "http://host/api/templates/x%23frag"
        );
        assert_eq!(
            store.endpoint(&["dir/name", "clone"]).as_str(),
            "http://host/api/templates/dir%2Fname/clone"
        );
    }

    #[test]
    fn bare_host_gets_templates_path() {
        let store = RemoteStore::with_client(reqwest::Client::new(), "http://host:8080").unwrap();
        assert_eq!(store.collection_url().as_str(), "http://host:8080/templates");
    }

    #[test]
    fn rejects_unusable_api_url() {
        assert!(matches!(
            RemoteStore::with_client(reqwest::Client::new(), "not a url"),
            Err(StencilError::Config(_))
        ));
        assert!(matches!(
            RemoteStore::with_client(reqwest::Client::new(), "mailto:ops@example.com"),
            Err(StencilError::Config(_))
        ));
    }

    #[test]
    fn new_does_not_panic() {
        let store = RemoteStore::new("http://localhost:1", Duration::from_secs(1));
        assert!(store.is_ok());
    }
}
