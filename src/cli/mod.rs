//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init`, `status` |
//! | Product | Product lifecycle | `product add`, `product lifecycle` |
//! | Milestone | Roadmap entries | `milestone add`, `milestone update` |
//! | Dep | Temporal dependencies | `dep add`, `dep list` |
//!
//! All commands support `--format text` (default) and `--format json`, and
//! `--verbose` for debug output on stderr.
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod dependency_cmd;
mod milestone_cmd;
mod output;
mod product_cmd;

pub use app::run;
pub use output::{Output, OutputFormat};
