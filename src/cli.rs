// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! `stagedag` is a library: every pipeline ships its own thin binary that
//! parses [`CliArgs`], loads the staging configuration, builds its graphs,
//! and hands everything to [`crate::run`].

use clap::{Parser, ValueEnum};

use crate::engine::RunSpec;

/// Command-line arguments for a pipeline run.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stagedag",
    version,
    about = "Build staged dataset artifacts in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Target task names or output aliases.
    ///
    /// Default: every terminal task plus every declared output.
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Re-run tasks even when their output artifact already exists.
    #[arg(long)]
    pub force: bool,

    /// Run every registered task, ignoring the target defaulting.
    #[arg(long, conflicts_with = "targets")]
    pub all: bool,

    /// Path to the staging configuration file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Stagedag.toml")]
    pub config: String,

    /// Staging environment to run against.
    ///
    /// If omitted, `STAGEDAG_ENV` or the configured `default_env` is used.
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STAGEDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print graphs, dependencies and declared outputs, but don't execute.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Translate the argument surface into a [`RunSpec`].
    pub fn run_spec(&self) -> RunSpec {
        RunSpec {
            targets: self.targets.clone(),
            everything: self.all,
            force: self.force,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Parse an explicit argument list (first element is the binary name).
pub fn parse_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    CliArgs::parse_from(args)
}
