#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod source;
mod telemetry;

use std::process::ExitCode;

use clap::Parser;
use config::{CliArgs, RunConfig};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<ExitCode> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = RunConfig::try_from(args)?;

    init_telemetry()?;
    tracing::debug!(?config, "starting");

    commands::run(config)
}
