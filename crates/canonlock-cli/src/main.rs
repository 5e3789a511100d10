//! canonlock - dual-lock integrity and conformance CLI for canon corpora.

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod errors;
mod exit;
mod output;

use commands::{attest, dual, hash, seal, validate, verify};
use config::{AttestArgs, UnitArgs};
use errors::CliError;
use exit::ExitStatus;

#[derive(Parser)]
#[command(name = "canonlock")]
#[command(about = "Canonical hashing, lock-file attestation, and LAW/LORE validation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical SHA-256 of a canon document
    Hash {
        /// Canon document
        document: PathBuf,
        /// Print total, retained, and excluded line counts
        #[arg(long)]
        stats: bool,
        /// Print the retained lines with their source line numbers
        #[arg(long)]
        lines: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the canonical digest into metadata.integrity.sha256
    Seal {
        /// Canon document (rewritten in place)
        document: PathBuf,
    },
    /// Check metadata.integrity.sha256 against the canonical digest
    Verify {
        /// Canon document
        document: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Hash a lock file, count its partitions, and write a receipt
    Attest {
        /// Lock file
        lock_file: PathBuf,
        #[command(flatten)]
        options: AttestArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate LAW/LORE blocks of one or more unit files
    Validate {
        /// Unit markdown files
        #[arg(required = true)]
        units: Vec<PathBuf>,
        #[command(flatten)]
        options: UnitArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run Lock A and Lock B together
    Dual {
        /// Canon document carrying metadata.integrity.sha256
        #[arg(long)]
        canon: PathBuf,
        /// Lock file to attest
        #[arg(long)]
        lock: PathBuf,
        /// Unit markdown files
        #[arg(required = true)]
        units: Vec<PathBuf>,
        #[command(flatten)]
        attest: AttestArgs,
        #[command(flatten)]
        unit: UnitArgs,
        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CANONLOCK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    if env_bool("CANONLOCK_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .init();
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Hash {
            document,
            stats,
            lines,
            json,
        } => hash::run(document, stats, lines, json),
        Commands::Seal { document } => seal::run(document),
        Commands::Verify { document, json } => verify::run(document, json),
        Commands::Attest {
            lock_file,
            options,
            json,
        } => attest::run(lock_file, options, json),
        Commands::Validate {
            units,
            options,
            json,
        } => validate::run(units, options, json),
        Commands::Dual {
            canon,
            lock,
            units,
            attest,
            unit,
            json,
        } => dual::run(canon, lock, units, attest, unit, json),
    };

    let status = match result {
        Ok(status) => status,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.downcast_ref::<CliError>()
                .map(CliError::exit_status)
                .unwrap_or(ExitStatus::Failure)
        }
    };
    std::process::exit(status.code());
}
