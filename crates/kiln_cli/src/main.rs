//! Kiln CLI — the command-line interface for the Kiln build host.
//!
//! Provides `kiln init` for project scaffolding, `kiln resolve` for walking
//! the dependency graph, `kiln build` for compiling the full graph through
//! the cache, and `kiln run` for loading the entry module and watching for
//! source changes.

#![warn(missing_docs)]

mod build;
mod init;
mod pipeline;
mod resolve;
mod run;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Kiln — a live-reloading build host.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Kiln build host")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a custom `kiln.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Kiln project.
    Init {
        /// Project name (creates a subdirectory). If omitted, initializes
        /// in the current directory.
        name: Option<String>,
    },
    /// Resolve the dependency graph and report it.
    Resolve,
    /// Compile every unit in the dependency graph.
    Build(BuildArgs),
    /// Load the entry module and watch for source changes.
    Run,
}

/// Arguments for the `kiln build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Diagnostic output formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text on stderr.
    Text,
    /// A JSON array on stdout.
    Json,
}

/// Global arguments shared by every subcommand.
#[derive(Debug)]
pub struct GlobalArgs {
    /// Suppress progress output.
    pub quiet: bool,
    /// Custom configuration file path.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config.clone(),
    };

    let result = match cli.command {
        Command::Init { name } => init::run(name),
        Command::Resolve => resolve::run(&global),
        Command::Build(args) => build::run(&args, &global),
        Command::Run => run::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
