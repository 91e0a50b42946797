//! Command-line interface for simple payload queries.

use std::{io, process::ExitCode};

use sq::cli::{args::parse_cli, commands};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = parse_cli();
    init_tracing(cli.verbose);
    commands::run(cli.command)
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
