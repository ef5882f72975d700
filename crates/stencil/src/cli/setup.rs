use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stencilapp::config::BackendKind;
use stencilapp::model::TemplateStatus;

#[derive(Parser, Debug)]
#[command(
    name = "stencil",
    bin_name = "stencil",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Versioned template store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Storage backend (local or remote)
    #[arg(long, global = true, help_heading = "Options")]
    pub backend: Option<BackendKind>,

    /// Directory for the local collection
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Base URL of the remote template service
    #[arg(long, global = true, value_name = "URL", help_heading = "Options")]
    pub api_url: Option<String>,

    /// Config file to load instead of the default location
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of formatted output
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List templates, most recently updated first
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Only templates carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only templates with this status
        #[arg(short, long)]
        status: Option<TemplateStatus>,
    },

    /// Show one template
    #[command(alias = "v", display_order = 2)]
    Get {
        id: String,

        /// Print only the current design document
        #[arg(long)]
        design: bool,
    },

    /// Save a design, creating the template or adding a version to it
    #[command(display_order = 3)]
    Save {
        /// Existing template id (omit to create)
        #[arg(long)]
        id: Option<String>,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        subject: String,

        #[arg(long)]
        preheader: Option<String>,

        /// Tag (repeatable). A save replaces the template's tags.
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Design JSON, inline or as @path
        #[arg(short, long)]
        design: String,

        /// Rendered markup used for the thumbnail and version snippet
        #[arg(long, value_name = "FILE")]
        html_file: Option<PathBuf>,
    },

    /// Change metadata without recording a version
    #[command(display_order = 4)]
    Meta {
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        subject: Option<String>,

        #[arg(long)]
        preheader: Option<String>,

        /// Replace tags (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Remove all tags
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,

        #[arg(long)]
        status: Option<TemplateStatus>,
    },

    /// Delete a template
    #[command(alias = "delete", display_order = 5)]
    Rm { id: String },

    /// Duplicate a template under a new id
    #[command(alias = "cp", display_order = 6)]
    Clone { id: String },

    /// Request a test delivery of a template
    #[command(display_order = 7)]
    SendTest { id: String, email: String },

    /// Show a template's saved versions, newest first
    #[command(display_order = 8)]
    History { id: String },

    /// Show the resolved configuration
    #[command(display_order = 20)]
    Config,
}
