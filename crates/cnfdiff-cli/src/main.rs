//! cnfdiff
//!
//! Compares MySQL configurations from option files, live servers and
//! `mysqld --verbose --help` listings, and prints the variables that differ.

mod cli;
mod error;
mod load;
mod output;
mod settings;

use clap::{CommandFactory, FromArgMatches};
use cnfdiff_core::DiffEngine;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use error::{CliError, Result};
use settings::Settings;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Raw matches are kept to see which source flag came first
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("{}: tracing subscriber already set", "warning".yellow());
        }
        tracing::debug!("Verbose mode enabled");
    }

    if cli.source_count() < 2 {
        return Err(CliError::user(
            "at least two sources are required (use --cnf, --dsn or --defaults)",
        ));
    }

    let settings = Settings::load(cli.settings.as_deref())?.with_overrides(&cli);
    let order = cli::source_order(&matches);
    let configs = load::load_sources(&cli, &order, &settings)?;

    let engine = DiffEngine::new().with_policy(settings.skip_policy());
    let report = engine.compare_configs(&configs);
    tracing::debug!(
        sources = configs.len(),
        differences = report.len(),
        "Comparison finished"
    );

    let rendered = output::formatter(settings.output).format(&report)?;
    print!("{rendered}");
    Ok(())
}
