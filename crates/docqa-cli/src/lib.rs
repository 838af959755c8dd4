//! docqa CLI library.
//!
//! Configuration loading, command execution, dataset conversion and output
//! formatting for the `docqa` command-line tool.

pub mod cli;
pub mod commands;
pub mod config;
pub mod convert;
pub mod error;
pub mod logger;
pub mod output;
pub mod sink;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use sink::CsvSink;
