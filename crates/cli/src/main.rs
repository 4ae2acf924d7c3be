// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tenure - run commands under a lease lock shared between processes

mod commands;
mod completions;
mod error;
mod output;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{run, show};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::CliError;

#[derive(Parser)]
#[command(
    name = "tenure",
    version,
    about = "Tenure - mutual exclusion through renewable leases"
)]
struct Cli {
    /// Directory holding lease records
    #[arg(long, global = true, env = "TENURE_STORE")]
    store: Option<PathBuf>,

    /// Lease settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command while holding a lock
    Run(run::RunArgs),
    /// Show the current lease for a key
    Show(show::ShowArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<CliError>() {
            Some(err) => {
                eprint!("{}", err);
                err.exit_code()
            }
            None => {
                eprintln!("error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn dispatch(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Run(args) => {
            let settings = commands::load_settings(cli.config.as_deref())?;
            let store = store::open(cli.store, &settings)?;
            run::run(args, settings, store).await
        }
        Commands::Show(args) => {
            let settings = commands::load_settings(cli.config.as_deref())?;
            let store = store::open(cli.store, &settings)?;
            show::show(args, &settings, &store).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Completions(args) => {
            completions::generate_completions::<Cli>(args.shell);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Log to stderr so a child's stdout passes through untouched
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("TENURE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
