//! pcap-recon CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_level().into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        },
    }
}
