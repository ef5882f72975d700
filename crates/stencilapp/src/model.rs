//! # Domain Model
//!
//! This module defines the data structures every backend speaks:
//! [`TemplateMeta`], [`TemplateVersion`], [`TemplateRecord`], and the request
//! types [`SaveInput`] and [`MetaUpdate`].
//!
//! ## Shape
//!
//! ```text
//! TemplateRecord
//! ├── meta      id, name, subject, preheader?, tags, status, updatedAt, thumbnail?
//! ├── design    opaque JSON value produced by the editor (latest)
//! └── versions  newest first, at most 25
//!     └── TemplateVersion  id, createdAt, design, htmlSnippet?
//! ```
//!
//! The record is serialized flat: the meta fields sit next to `design` and
//! `versions`, so a record on disk or on the wire looks like
//!
//! ```json
//! { "id": "…", "name": "Welcome", "subject": "Hi", "tags": [], "status": "DRAFT",
//!   "updatedAt": "…", "design": {"a": 1}, "versions": [ … ] }
//! ```
//!
//! ## The Design Payload
//!
//! `design` is a [`serde_json::Value`] and is never inspected. Whatever the
//! editor hands over is what comes back out.
//!
//! ## Legacy Data
//!
//! Collections written before version history existed have records without a
//! `versions` field. Those load with an empty history (`#[serde(default)]`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TemplateStatus::Draft => "DRAFT",
            TemplateStatus::Active => "ACTIVE",
            TemplateStatus::Archived => "ARCHIVED",
        };
        f.write_str(s)
    }
}

impl FromStr for TemplateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(TemplateStatus::Draft),
            "active" => Ok(TemplateStatus::Active),
            "archived" => Ok(TemplateStatus::Archived),
            other => Err(format!(
                "unknown status '{}' (expected draft, active or archived)",
                other
            )),
        }
    }
}

/// The listable, design-free part of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMeta {
    pub id: String,
    pub name: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preheader: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: TemplateStatus,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// An immutable snapshot of a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVersion {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub design: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_snippet: Option<String>,
}

impl TemplateVersion {
    pub fn new(design: Value, html_snippet: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at,
            design,
            html_snippet,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    #[serde(flatten)]
    pub meta: TemplateMeta,
    #[serde(default)]
    pub design: Value,
    /// Newest first.
    #[serde(default)]
    pub versions: Vec<TemplateVersion>,
}

impl TemplateRecord {
    pub fn id(&self) -> &str {
        &self.meta.id
    }
}

/// A content-affecting save. Without an `id` (or with one the store does not
/// know) a new record is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preheader: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub design: Value,
    /// Rendered markup for this design, used for the history snippet and the
    /// thumbnail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// A preview the caller already has. Takes precedence over one derived
    /// from `html`, and like a derived one is only used if the record has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl SaveInput {
    pub fn new(name: impl Into<String>, subject: impl Into<String>, design: Value) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            design,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_preheader(mut self, preheader: impl Into<String>) -> Self {
        self.preheader = Some(preheader.into());
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// A metadata-only change. Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaUpdate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preheader: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TemplateStatus>,
}

impl MetaUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.subject.is_none()
            && self.preheader.is_none()
            && self.tags.is_none()
            && self.status.is_none()
    }
}

/// Outcome of a send-test request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTestReceipt {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SendTestReceipt {
    pub fn ok() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

/// Trims tags, drops empty ones and duplicates. First occurrence wins, so the
/// caller's ordering is kept for display.
pub fn normalize_tags<I, T>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}
