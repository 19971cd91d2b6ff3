//! actionsgate - Manage GitHub Actions organization policies declaratively
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use actionsgate::cli::commands::{self, exit_code_for};
use actionsgate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.log_json);

    let global = &cli.global;
    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, global).await,
        Commands::Plan(args) => commands::plan::execute(args, global).await,
        Commands::Apply(args) => commands::apply::execute(args, global).await,
        Commands::Show(args) => commands::show::execute(args, global).await,
        Commands::Snapshot(args) => commands::snapshot::execute(args, global).await,
        Commands::Import(args) => commands::import::execute(args, global).await,
        Commands::Reset(args) => commands::reset::execute(args, global).await,
        Commands::GenerateMan(args) => commands::generate_man::execute(args).await,
    };

    // Exit codes are part of the CI contract
    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(exit_code_for(&e));
        }
    }
}

fn setup_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
