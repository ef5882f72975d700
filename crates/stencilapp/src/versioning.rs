//! # Versioning & Metadata Engine
//!
//! The business rules for a collection of [`TemplateRecord`]s, as pure
//! functions over an in-memory `Vec`. Nothing here does I/O: the local store
//! loads the collection, hands it to these functions, then persists the result.
//! Any other in-process backend can reuse them the same way.
//!
//! ## Save vs. Metadata Update
//!
//! - [`apply_save`] is content-affecting. It always prepends exactly one
//!   [`TemplateVersion`], replaces `design`, and trims history to
//!   [`MAX_VERSIONS`]. Existing versions are never modified.
//! - [`apply_meta_update`] touches only the fields present in the update and
//!   `updatedAt`. It never adds a version and never touches `design`.
//!
//! ## Thumbnails
//!
//! A record gets at most one thumbnail in its life: the first save that can
//! provide one (caller-supplied, or derived from `html`) sets it, later saves
//! leave it alone.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{
    normalize_tags, MetaUpdate, SaveInput, TemplateMeta, TemplateRecord, TemplateStatus,
    TemplateVersion,
};
use crate::thumbnail::derive_thumbnail;

/// Versions kept per record. Older ones are evicted.
pub const MAX_VERSIONS: usize = 25;

/// Characters of rendered markup kept on each version.
pub const HTML_SNIPPET_LEN: usize = 500;

/// Appended to the name of a cloned template.
pub const CLONE_SUFFIX: &str = " Copy";

/// Metadata of every record, most recently updated first.
pub fn list_meta(records: &[TemplateRecord]) -> Vec<TemplateMeta> {
    let mut metas: Vec<TemplateMeta> = records.iter().map(|r| r.meta.clone()).collect();
    metas.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    metas
}

pub fn find<'a>(records: &'a [TemplateRecord], id: &str) -> Option<&'a TemplateRecord> {
    records.iter().find(|r| r.meta.id == id)
}

/// Applies a save to the collection and returns the resulting record.
///
/// An `id` the collection does not know is treated like no `id` at all: a
/// fresh id is minted.
pub fn apply_save(
    records: &mut Vec<TemplateRecord>,
    input: SaveInput,
    now: DateTime<Utc>,
) -> TemplateRecord {
    let existing = input
        .id
        .as_deref()
        .and_then(|id| records.iter().position(|r| r.meta.id == id));

    let idx = match existing {
        Some(idx) => idx,
        None => {
            let id = mint_id(records);
            records.push(empty_record(id, now));
            records.len() - 1
        }
    };

    let record = &mut records[idx];
    record.meta.name = input.name;
    record.meta.subject = input.subject;
    record.meta.preheader = input.preheader;
    record.meta.tags = input.tags.map(normalize_tags).unwrap_or_default();
    record.meta.updated_at = now;
    record.design = input.design.clone();

    // History stays newest-first even if the clock steps backwards.
    let created_at = record
        .versions
        .first()
        .map_or(now, |latest| latest.created_at.max(now));
    let snippet = input.html.as_deref().map(html_snippet);
    record
        .versions
        .insert(0, TemplateVersion::new(input.design, snippet, created_at));
    record.versions.truncate(MAX_VERSIONS);

    if record.meta.thumbnail.is_none() {
        record.meta.thumbnail = input
            .thumbnail
            .or_else(|| input.html.as_deref().and_then(derive_thumbnail));
    }

    record.clone()
}

/// Applies a metadata-only update. Returns `None` if the id is unknown.
pub fn apply_meta_update(
    records: &mut [TemplateRecord],
    update: MetaUpdate,
    now: DateTime<Utc>,
) -> Option<TemplateRecord> {
    let record = records.iter_mut().find(|r| r.meta.id == update.id)?;
    let meta = &mut record.meta;

    if let Some(name) = update.name {
        meta.name = name;
    }
    if let Some(subject) = update.subject {
        meta.subject = subject;
    }
    if let Some(preheader) = update.preheader {
        meta.preheader = Some(preheader);
    }
    if let Some(tags) = update.tags {
        meta.tags = normalize_tags(tags);
    }
    if let Some(status) = update.status {
        meta.status = status;
    }
    meta.updated_at = now;

    Some(record.clone())
}

/// Removes a record. Returns whether anything was removed.
pub fn apply_remove(records: &mut Vec<TemplateRecord>, id: &str) -> bool {
    let before = records.len();
    records.retain(|r| r.meta.id != id);
    records.len() != before
}

/// The save request that produces a clone of `source`.
///
/// No id (so a new one is minted), decorated name, current content. Status,
/// thumbnail and history are not carried over.
pub fn clone_input(source: &TemplateRecord) -> SaveInput {
    SaveInput {
        id: None,
        name: format!("{}{}", source.meta.name, CLONE_SUFFIX),
        subject: source.meta.subject.clone(),
        preheader: source.meta.preheader.clone(),
        tags: Some(source.meta.tags.clone()),
        design: source.design.clone(),
        html: None,
        thumbnail: None,
    }
}

pub fn html_snippet(html: &str) -> String {
    html.chars().take(HTML_SNIPPET_LEN).collect()
}

fn empty_record(id: String, now: DateTime<Utc>) -> TemplateRecord {
    TemplateRecord {
        meta: TemplateMeta {
            id,
            name: String::new(),
            subject: String::new(),
            preheader: None,
            tags: Vec::new(),
            status: TemplateStatus::Draft,
            updated_at: now,
            thumbnail: None,
        },
        design: serde_json::Value::Null,
        versions: Vec::new(),
    }
}

fn mint_id(records: &[TemplateRecord]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if find(records, &id).is_none() {
            return id;
        }
    }
}
