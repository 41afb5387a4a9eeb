//! Terminal front-end for drill-core.

pub mod cli;
pub mod config;
pub mod display;
pub mod driver;
pub mod loader;
pub mod summary;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use drill_core::DrillSession;
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, OutputFormat};
use crate::display::Display;
use crate::driver::Driver;
use crate::summary::SessionSummary;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("code_drill=debug,drill_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = config::resolve(&cli)?;
    let document = loader::load_document(&cli.file)?;
    let session = DrillSession::new(settings)?;

    let color = !cli.no_color && io::stdout().is_terminal();
    let mut driver = Driver::new(session, Display::new(io::stdout().lock(), color));
    driver.start(document)?;
    driver.run(io::stdin().lock())?;

    let summary = SessionSummary::collect(driver.session(), driver.started_at(), Utc::now());
    drop(driver);

    match cli.format {
        OutputFormat::Text => println!("{}", summary.render_text()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to serialize summary")?
        ),
    }

    Ok(())
}
