//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Sets up logging
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Initialize the façade from flags, env and config file
//! 3. **Dispatch**: Route commands to handlers
//! 4. **Output Formatting**: Styled text, or JSON with `--json`
//! 5. **Error Handling**: Missing templates and failed sends become errors, so
//!    the process exits non-zero

use super::render;
use super::setup::{Cli, Commands};
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use stencilapp::api::TemplateApi;
use stencilapp::config::StencilConfig;
use stencilapp::init::{initialize, Overrides};
use stencilapp::model::{MetaUpdate, SaveInput, TemplateStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "stencil=warn,stencilapp=warn";
const VERBOSE_LOG_FILTER: &str = "stencil=debug,stencilapp=debug";

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = initialize(Overrides {
        backend: cli.backend,
        api_url: cli.api_url.clone(),
        data_dir: cli.data.clone(),
        config_path: cli.config.clone(),
    })
    .context("Failed to load configuration")?;

    let out = Output { json: cli.json };
    let command = cli.command.unwrap_or(Commands::List {
        tag: None,
        status: None,
    });
    tracing::debug!(backend = %ctx.api.backend(), ?command, "Dispatching command");

    match command {
        Commands::List { tag, status } => handle_list(&ctx.api, &out, tag, status).await,
        Commands::Get { id, design } => handle_get(&ctx.api, &out, &id, design).await,
        Commands::Save {
            id,
            name,
            subject,
            preheader,
            tags,
            design,
            html_file,
        } => {
            let mut input = SaveInput::new(name, subject, parse_design(&design)?);
            input.id = id;
            input.preheader = preheader;
            input.tags = Some(tags);
            if let Some(path) = html_file {
                input.html = Some(read_file(&path)?);
            }
            handle_save(&ctx.api, &out, input).await
        }
        Commands::Meta {
            id,
            name,
            subject,
            preheader,
            tags,
            clear_tags,
            status,
        } => {
            let mut update = MetaUpdate::new(id);
            update.name = name;
            update.subject = subject;
            update.preheader = preheader;
            update.status = status;
            if clear_tags || !tags.is_empty() {
                update.tags = Some(tags);
            }
            handle_meta(&ctx.api, &out, update).await
        }
        Commands::Rm { id } => handle_remove(&ctx.api, &out, &id).await,
        Commands::Clone { id } => handle_clone(&ctx.api, &out, &id).await,
        Commands::SendTest { id, email } => handle_send_test(&ctx.api, &out, &id, &email).await,
        Commands::History { id } => handle_history(&ctx.api, &out, &id).await,
        Commands::Config => handle_config(&out, &ctx.config),
    }
}

/// Logs go to stderr so `--json` output stays parseable. `RUST_LOG` wins
/// over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

struct Output {
    json: bool,
}

impl Output {
    /// Print `value` as JSON, or the human rendering otherwise.
    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", human());
        }
        Ok(())
    }
}

async fn handle_list(
    api: &TemplateApi,
    out: &Output,
    tag: Option<String>,
    status: Option<TemplateStatus>,
) -> Result<()> {
    let metas: Vec<_> = api
        .list()
        .await?
        .into_iter()
        .filter(|m| tag.as_ref().map_or(true, |t| m.tags.contains(t)))
        .filter(|m| status.map_or(true, |s| m.status == s))
        .collect();
    out.emit(&metas, || render::render_list(&metas))
}

async fn handle_get(api: &TemplateApi, out: &Output, id: &str, design_only: bool) -> Result<()> {
    let record = api
        .get(id)
        .await?
        .ok_or_else(|| anyhow!("Template not found: {}", id))?;
    if design_only {
        println!("{}", serde_json::to_string_pretty(&record.design)?);
        return Ok(());
    }
    out.emit(&record, || render::render_record(&record))
}

async fn handle_save(api: &TemplateApi, out: &Output, input: SaveInput) -> Result<()> {
    let creating = input.id.is_none();
    let record = api.save(input).await?;
    out.emit(&record, || {
        let verb = if creating { "Created" } else { "Saved" };
        format!(
            "{}{}",
            render::render_message(&format!(
                "{} {} ({} versions)",
                verb,
                record.meta.id,
                record.versions.len()
            )),
            render::render_record(&record)
        )
    })
}

async fn handle_meta(api: &TemplateApi, out: &Output, update: MetaUpdate) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to update: pass at least one of --name, --subject, --preheader, --tag, --clear-tags, --status");
    }
    let id = update.id.clone();
    let record = api
        .update_meta(update)
        .await?
        .ok_or_else(|| anyhow!("Template not found: {}", id))?;
    out.emit(&record, || render::render_record(&record))
}

async fn handle_remove(api: &TemplateApi, out: &Output, id: &str) -> Result<()> {
    api.remove(id).await?;
    out.emit(&serde_json::json!({ "removed": id }), || {
        render::render_message(&format!("Removed {}", id))
    })
}

async fn handle_clone(api: &TemplateApi, out: &Output, id: &str) -> Result<()> {
    let copy = api
        .clone_template(id)
        .await?
        .ok_or_else(|| anyhow!("Could not clone template: {}", id))?;
    out.emit(&copy, || {
        format!(
            "{}{}",
            render::render_message(&format!("Cloned {} as {}", id, copy.meta.id)),
            render::render_record(&copy)
        )
    })
}

async fn handle_send_test(api: &TemplateApi, out: &Output, id: &str, email: &str) -> Result<()> {
    let receipt = api.send_test(id, email).await?;
    out.emit(&receipt, || render::render_receipt(id, email, &receipt))?;
    if !receipt.ok {
        bail!(
            "{}",
            receipt
                .message
                .unwrap_or_else(|| "Test send failed".to_string())
        );
    }
    Ok(())
}

async fn handle_history(api: &TemplateApi, out: &Output, id: &str) -> Result<()> {
    let record = api
        .get(id)
        .await?
        .ok_or_else(|| anyhow!("Template not found: {}", id))?;
    out.emit(&record.versions, || render::render_history(&record))
}

fn handle_config(out: &Output, config: &StencilConfig) -> Result<()> {
    out.emit(config, || render::render_config(config))
}

/// Parses `--design`: inline JSON, or `@path` to read it from a file.
fn parse_design(raw: &str) -> Result<Value> {
    let (text, source) = match raw.strip_prefix('@') {
        Some(path) => (read_file(Path::new(path))?, path.to_string()),
        None => (raw.to_string(), "--design".to_string()),
    };
    serde_json::from_str(&text).with_context(|| format!("Invalid design JSON in {}", source))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))
}
