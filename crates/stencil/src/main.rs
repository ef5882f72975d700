//! # Stencil CLI Architecture
//!
//! Stencil ships with a command-line client, but the binary is intentionally thin:
//! the CLI lives in `src/cli/`, while this file only invokes `cli::run()` and
//! handles process termination. Everything that touches storage goes through the
//! library's `TemplateApi` façade.
//!
//! ## Workspace Structure
//!
//! Stencil is organized as a Cargo workspace with two crates:
//! - `crates/stencilapp/`: Core library: model, versioning engine, adapters, façade
//! - `crates/stencil/`: This CLI tool, depends on the `stencilapp` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/stencil/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering (render.rs, styles.rs)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Facade (crates/stencilapp/src/api.rs)                  │
//! │  - Resolves local or remote backend once                    │
//! │  - Returns plain records, metas and receipts                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The façade never prints. The CLI owns argument parsing, logging setup,
//! rendering and exit codes.
//!
//! ## Testing Approach
//!
//! - Library behavior is tested in `stencilapp`.
//! - `render.rs` has unit tests over canned records.
//! - `tests/cli_e2e.rs` runs the binary against a temporary data directory.

mod cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
