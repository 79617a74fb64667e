//! Ripple CLI - Blast radius estimation from the command line.
//!
//! Ripple builds a dependency graph of a TypeScript/JavaScript project and
//! reports which files are affected by changing a symbol, and how risky the
//! affected area is.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Exit code when `analyze --fail-above` trips.
const GATE_FAILURE: u8 = 2;

/// Ripple: blast radius estimation for code changes.
#[derive(Parser)]
#[command(name = "ripple")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Configuration file (defaults to .ripple.yaml in the project root)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the blast radius of changing a file or symbol
    Analyze {
        /// File containing the change (relative to the project root or absolute)
        file: PathBuf,

        /// Symbol being changed (defaults to the file's first export)
        #[arg(short, long)]
        symbol: Option<String>,

        /// Maximum depth for transitive dependents
        #[arg(short, long)]
        depth: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Exit with status 2 when the score reaches this value
        /// (the configured risk_threshold when given without a value)
        #[arg(long, value_name = "SCORE", value_parser = clap::value_parser!(u8).range(0..=100))]
        fail_above: Option<Option<u8>>,
    },

    /// List files that depend on a file
    Dependents {
        /// Target file
        file: PathBuf,

        /// Include transitive dependents
        #[arg(short, long)]
        transitive: bool,

        /// Maximum depth for transitive dependents
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Find where a symbol is declared
    Definition {
        /// Symbol name (exact match)
        symbol: String,
    },

    /// Show the risk tags and score of a path and optional symbol names
    Tags {
        /// File path to classify (need not exist)
        path: PathBuf,

        /// Symbol names to classify alongside the path
        symbols: Vec<String>,
    },

    /// Detect circular imports
    Cycles,

    /// Show dependency graph statistics
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Determine project root
    let workspace = match cli.workspace {
        Some(w) => w,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!(
                    "{}: failed to get current directory: {e}",
                    "error".red().bold()
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let result = cli::Context::load(&workspace, cli.config.as_deref()).and_then(|ctx| {
        match cli.command {
            Commands::Analyze {
                file,
                symbol,
                depth,
                json,
                fail_above,
            } => {
                let threshold = fail_above.map(|t| t.unwrap_or(ctx.config.risk_threshold));
                cli::analyze::run(&ctx, &file, symbol.as_deref(), depth, json, threshold).map(
                    |within_threshold| {
                        if within_threshold {
                            ExitCode::SUCCESS
                        } else {
                            ExitCode::from(GATE_FAILURE)
                        }
                    },
                )
            }
            Commands::Dependents {
                file,
                transitive,
                depth,
            } => cli::dependents::run(&ctx, &file, transitive, depth).map(|()| ExitCode::SUCCESS),
            Commands::Definition { symbol } => {
                cli::definition::run(&ctx, &symbol).map(|()| ExitCode::SUCCESS)
            }
            Commands::Tags { path, symbols } => {
                cli::tags::run(&ctx, &path, &symbols);
                Ok(ExitCode::SUCCESS)
            }
            Commands::Cycles => cli::cycles::run(&ctx).map(|()| ExitCode::SUCCESS),
            Commands::Stats => cli::stats::run(&ctx).map(|()| ExitCode::SUCCESS),
        }
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
