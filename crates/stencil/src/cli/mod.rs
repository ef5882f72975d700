//! # CLI Behavior
//!
//! This is **one possible client** for stencil, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ### Naked Execution (`stencil`)
//!
//! Running `stencil` with no subcommand defaults to `stencil list`.
//!
//! ### Design Input
//!
//! `stencil save --design` takes the design document either inline
//! (`--design '{"rows": []}'`) or from a file (`--design @welcome.json`).
//! Rendered markup for the thumbnail and version snippet comes from
//! `--html-file`.
//!
//! ### Output
//!
//! Human output is styled for the terminal. `--json` prints the underlying
//! value instead, for scripts.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup, logging, and per-command handlers
//! - `render`: Output formatting (tables, detail views, messages)
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
