use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use silencer_cli::filter::{self, FilterOptions};
use silencer_cli::{Cli, Config};
use silencer_core::{Clock, StreamGate, SystemClock};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let env_filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs share stderr with the status line; stdout carries only log content
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();

    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_to(&mut config);
    tracing::debug!(?config, "loaded configuration");

    let gate_config = config.gate_config().context("invalid configuration")?;
    let clock = SystemClock;
    let mut gate = StreamGate::new(gate_config, clock.now());

    let stats = filter::run(
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
        &mut io::stderr(),
        &mut gate,
        &clock,
        FilterOptions {
            status: config.status,
        },
    )?;

    tracing::debug!(state = %gate.state(), categories = gate.seen_count(), %stats, "end of stream");
    Ok(())
}
