//! # credsign CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use credsign_cli::issue::{run_issue, IssueArgs};
use credsign_cli::keygen::{run_keygen, KeygenArgs};
use credsign_cli::load_config;
use credsign_cli::verify::{run_verify, VerifyArgs};

/// Issue and verify signed verifiable credentials.
#[derive(Parser, Debug)]
#[command(name = "credsign", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Issuer config file (JSON). Falls back to CREDSIGN_* environment variables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build and sign a credential.
    Issue(IssueArgs),

    /// Verify the proof on a signed credential.
    Verify(VerifyArgs),

    /// Generate a new issuer key.
    Keygen(KeygenArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Issue(args) => {
            load_config(cli.config.as_deref()).and_then(|config| run_issue(&args, &config))
        }
        Commands::Verify(args) => run_verify(&args),
        Commands::Keygen(args) => run_keygen(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
