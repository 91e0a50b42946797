//! Implementation of `sq flags`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use sq_query::{Flag, Flags};

use super::flags_spec;
use crate::cli::args::FlagsCommand;

/// Prints every flag with its bit and whether the resolved mask enables it.
pub fn run(cmd: &FlagsCommand) -> ExitCode {
    let flags = match cmd.names.as_deref().map(flags_spec) {
        Some(spec) => match spec.resolve() {
            Ok(flags) => flags,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Flags::ALL,
    };

    println!("{}", flag_table(flags));
    println!("mask: {} ({flags})", flags.bits());
    ExitCode::SUCCESS
}

/// Builds the flag table for `flags`.
fn flag_table(flags: Flags) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Flag", "Bit", "Enabled"]);
    for flag in Flag::VARIANTS {
        let enabled = if flags.contains(flag) { "yes" } else { "no" };
        table.add_row(vec![
            Cell::new(flag.name()),
            Cell::new(flag.value().to_string()),
            Cell::new(enabled),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_every_flag() {
        let table = flag_table(Flags::from_bits(Flag::And.value())).to_string();
        for flag in Flag::VARIANTS {
            assert!(table.contains(flag.name()), "{flag} missing");
        }
        assert!(table.contains("512"));
        assert!(table.contains("-1"));
    }
}
