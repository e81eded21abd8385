//! Binary entry point for the reminders CLI.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use reminders_cli::cli::{Cli, execute};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(std::io::stderr().lock(), "Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.config()?;
    init_logging(&config.log_filter);

    let output = execute(cli, &config)?;
    if !output.is_empty() {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{output}").context("failed to write output")?;
    }
    Ok(())
}

/// Logs go to stderr; stdout carries only command output.
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
