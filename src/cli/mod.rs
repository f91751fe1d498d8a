//! CLI module
//!
//! Command-line interface over fetch profiles.
//!
//! # Commands
//!
//! - `fetch` - Stream every item of a collection to stdout
//! - `validate` - Check a profile without making requests

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
