//! Command implementations and dispatch.

pub mod flags;
pub mod parse;
pub mod payload;

use std::process::ExitCode;

use sq_config::FlagsSpec;

use super::args::Commands;

/// Dispatches to the selected subcommand.
pub fn run(command: Commands) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(&cmd),
        Commands::Flags(cmd) => flags::run(&cmd),
        Commands::Payload(cmd) => payload::run(&cmd),
    }
}

/// Reads a command-line flag spec: an integer is a raw mask, anything else a name list.
fn flags_spec(spec: &str) -> FlagsSpec {
    match spec.trim().parse::<i64>() {
        Ok(mask) => FlagsSpec::Mask(mask),
        Err(_) => FlagsSpec::Names(spec.to_string()),
    }
}
