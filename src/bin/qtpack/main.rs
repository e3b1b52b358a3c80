//! qtpack CLI - build configuration compiler for Qt packages

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use qtpack::PlanError;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if let Some(help) = e.downcast_ref::<PlanError>().and_then(PlanError::help) {
            eprintln!("{}", help);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("qtpack=debug")
    } else {
        EnvFilter::new("qtpack=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Plan(args) => commands::plan::execute(args),
        Commands::Manifest(args) => commands::manifest::execute(args),
        Commands::Modules(args) => commands::modules::execute(args),
        Commands::Options(args) => commands::options::execute(args),
        Commands::Build(args) => commands::build::execute(args, cli.verbose),
        Commands::Sysdeps(args) => commands::sysdeps::execute(args),
        Commands::Matrix(args) => commands::matrix::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
