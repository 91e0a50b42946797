//! Clap argument definitions for the `sq` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "sq")]
#[command(about = "Simple payload queries - parse query strings and inspect payload weights")]
pub struct Cli {
    /// Log parser and similarity decisions (overridden by RUST_LOG)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `sq parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Query text
    #[arg(required_unless_present = "request")]
    pub query: Option<String>,

    /// Field to search, as NAME or NAME^BOOST (repeatable) [default: _all]
    #[arg(short = 'f', long = "field")]
    pub fields: Vec<String>,

    /// Enabled grammar features: FLAG|FLAG... or an integer mask [default: ALL]
    #[arg(long)]
    pub flags: Option<String>,

    /// Operator between clauses with no explicit operator: and, or [default: or]
    #[arg(long)]
    pub default_operator: Option<String>,

    /// Analyzer for plain terms and phrases [default: standard]
    #[arg(short = 'a', long)]
    pub analyzer: Option<String>,

    /// Locale for case folding prefix and fuzzy text, e.g. tr_TR
    #[arg(long)]
    pub locale: Option<String>,

    /// Keep the case of prefix and fuzzy text
    #[arg(long)]
    pub no_lowercase_expanded_terms: bool,

    /// Drop clauses the analyzer rejects instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Read a JSON query request instead of the options above
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = [
            "query",
            "fields",
            "flags",
            "default_operator",
            "analyzer",
            "locale",
            "no_lowercase_expanded_terms",
            "lenient",
        ]
    )]
    pub request: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `sq flags`.
#[derive(Args, Debug, Clone)]
pub struct FlagsCommand {
    /// FLAG|FLAG... or an integer mask [default: ALL]
    pub names: Option<String>,
}

/// Arguments for `sq payload`.
#[derive(Args, Debug, Clone)]
pub struct PayloadCommand {
    /// Hex-encoded payloads to decode, or floats with --encode
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<String>,

    /// Encode floats as 4-byte big-endian payloads
    #[arg(long)]
    pub encode: bool,
}

/// Supported `sq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a query string and print the query tree
    #[command(after_help = "\
QUERY SYNTAX:
  a b               Default operator between a and b
  a + b             Both terms
  a | b             Either term
  a | b + c         Operators bind right to left: a | (b + c)
  -a                Term must NOT appear
  (a | b) + c       Grouping
  \"a b\"             Phrase
  \"a b\"~2           Phrase with slop
  ab*               Prefix
  abc~1             Fuzzy term (edit distance at most 2)
  \\+                Escaped operator character

EXAMPLES:
  sq parse 'rust + (guide | book)'
  sq parse 'error handling' -f title^2 -f body
  sq parse 'a | b' --flags 'AND|NOT'
  sq parse --request request.json --json")]
    Parse(ParseCommand),

    /// Show which grammar features a flag list enables
    Flags(FlagsCommand),

    /// Decode or encode payload weights
    Payload(PayloadCommand),
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
