//! # Rendering Module
//!
//! Turns library values into terminal text. Every function returns a `String`
//! so the layout can be tested without a terminal; `commands.rs` prints it.
//!
//! ## Table Layout
//!
//! The list view is a fixed-width table:
//! - `id` (10 chars): Template id, shortened
//! - `status` (9 chars): DRAFT / ACTIVE / ARCHIVED
//! - `name` (fill): Template name, truncated to fit
//! - `tags` (variable): Space-separated tags
//! - `time_ago` (14 chars, right-aligned): Relative update time
//!
//! Widths are measured with `unicode-width` before styling is applied, so
//! escape codes never throw the columns off.

use super::styles;
use chrono::{DateTime, Utc};
use stencilapp::config::StencilConfig;
use stencilapp::model::{SendTestReceipt, TemplateMeta, TemplateRecord};
use stencilapp::thumbnail::{decode_thumbnail, preview_text};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;

pub const COL_ID: usize = 10;
pub const COL_STATUS: usize = 9;
pub const COL_TIME: usize = 14;

/// Number of single-space gaps between list columns.
const GAPS: usize = 4;

pub fn render_list(metas: &[TemplateMeta]) -> String {
    if metas.is_empty() {
        return format!(
            "{}\n",
            styles::muted().apply_to("No templates yet. Create one with `stencil save`.")
        );
    }

    let mut out = String::new();
    for meta in metas {
        let tags = meta.tags.join(" ");
        let name_width =
            LINE_WIDTH.saturating_sub(COL_ID + COL_STATUS + COL_TIME + GAPS + tags.width());

        let id = pad_to_width(&meta.id, COL_ID);
        let status = pad_to_width(&meta.status.to_string(), COL_STATUS);
        let name = pad_to_width(&meta.name, name_width);
        let time = format!("{:>width$}", format_time_ago(meta.updated_at), width = COL_TIME);

        out.push_str(&format!(
            "{} {} {} {} {}\n",
            styles::id().apply_to(id),
            styles::status(meta.status).apply_to(status),
            name,
            styles::tag().apply_to(tags),
            styles::time().apply_to(time),
        ));
    }
    out
}

pub fn render_record(record: &TemplateRecord) -> String {
    let meta = &record.meta;
    let mut out = String::new();

    out.push_str(&format!(
        "{}  {}\n",
        styles::title().apply_to(&meta.name),
        styles::id().apply_to(&meta.id)
    ));
    out.push_str(&field("Subject", &meta.subject));
    if let Some(preheader) = &meta.preheader {
        out.push_str(&field("Preheader", preheader));
    }
    if !meta.tags.is_empty() {
        let tags = meta.tags.join(", ");
        out.push_str(&field("Tags", &styles::tag().apply_to(tags).to_string()));
    }
    out.push_str(&field(
        "Status",
        &styles::status(meta.status)
            .apply_to(meta.status.to_string())
            .to_string(),
    ));
    out.push_str(&field(
        "Updated",
        &styles::time()
            .apply_to(format_time_ago(meta.updated_at))
            .to_string(),
    ));
    out.push_str(&field("Versions", &record.versions.len().to_string()));

    let thumbnail = match meta.thumbnail.as_deref() {
        None => styles::muted().apply_to("none").to_string(),
        Some(uri) => match decode_thumbnail(uri).map(|svg| preview_text(&svg)) {
            Some(text) if !text.is_empty() => {
                format!("\"{}\"", truncate_to_width(&text, LINE_WIDTH / 2))
            }
            _ => "image".to_string(),
        },
    };
    out.push_str(&field("Thumbnail", &thumbnail));
    out
}

pub fn render_history(record: &TemplateRecord) -> String {
    if record.versions.is_empty() {
        return format!("{}\n", styles::muted().apply_to("No saved versions."));
    }

    let mut out = format!(
        "{} ({} versions)\n",
        styles::title().apply_to(&record.meta.name),
        record.versions.len()
    );
    for (i, version) in record.versions.iter().enumerate() {
        let marker = if i == 0 { "*" } else { " " };
        let snippet = version
            .html_snippet
            .as_deref()
            .map(preview_text)
            .unwrap_or_default();
        let time = format!(
            "{:>width$}",
            format_time_ago(version.created_at),
            width = COL_TIME
        );
        let snippet_width = LINE_WIDTH.saturating_sub(COL_ID + COL_TIME + 10);

        out.push_str(&format!(
            "{} {:>3}. {} {} {}\n",
            marker,
            i + 1,
            styles::id().apply_to(pad_to_width(&version.id, COL_ID)),
            styles::time().apply_to(time),
            styles::muted().apply_to(truncate_to_width(&snippet, snippet_width)),
        ));
    }
    out
}

pub fn render_receipt(id: &str, email: &str, receipt: &SendTestReceipt) -> String {
    let headline = if receipt.ok {
        styles::success()
            .apply_to(format!("Test send of {} to {} accepted", id, email))
            .to_string()
    } else {
        styles::failure()
            .apply_to(format!("Test send of {} to {} failed", id, email))
            .to_string()
    };
    match &receipt.message {
        Some(message) => format!("{}\n{}\n", headline, styles::muted().apply_to(message)),
        None => format!("{}\n", headline),
    }
}

pub fn render_config(config: &StencilConfig) -> String {
    let data_dir = config
        .data_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(unset)".to_string());
    [
        ("backend", config.backend.to_string()),
        ("api_url", config.api_url.clone()),
        ("data_dir", data_dir),
        (
            "request_timeout_secs",
            config.request_timeout_secs.to_string(),
        ),
    ]
    .iter()
    .map(|(key, value)| format!("{} = {}\n", styles::muted().apply_to(key), value))
    .collect()
}

pub fn render_message(message: &str) -> String {
    format!("{}\n", styles::success().apply_to(message))
}

fn field(label: &str, value: &str) -> String {
    format!(
        "  {} {}\n",
        styles::muted().apply_to(format!("{:<10}", format!("{}:", label))),
        value
    )
}

fn pad_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let padding = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}
