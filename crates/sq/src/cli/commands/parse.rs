//! Implementation of `sq parse`.

use std::process::ExitCode;

use sq_config::{ConfigError, QueryRequest};
use sq_query::{BuiltinAnalyzers, QueryNode};
use tracing::debug;

use super::flags_spec;
use crate::cli::args::ParseCommand;

/// Parses the query and prints the tree.
pub fn run(cmd: &ParseCommand) -> ExitCode {
    let request = match build_request(cmd) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let resolved = match request.resolve(&BuiltinAnalyzers) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    debug!(%resolved, "resolved request");

    let tree = match resolved.parse() {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return output_json(tree.as_ref());
    }

    match tree {
        Some(tree) => print!("{tree}"),
        None => println!("(no clauses)"),
    }
    ExitCode::SUCCESS
}

/// Builds the request from a file or from the inline options.
fn build_request(cmd: &ParseCommand) -> Result<QueryRequest, ConfigError> {
    if let Some(path) = &cmd.request {
        return QueryRequest::from_file(path);
    }

    Ok(QueryRequest {
        query: cmd.query.clone(),
        fields: cmd.fields.clone(),
        flags: cmd.flags.as_deref().map(flags_spec),
        analyzer: cmd.analyzer.clone(),
        default_operator: cmd.default_operator.clone(),
        lowercase_expanded_terms: cmd.no_lowercase_expanded_terms.then_some(false),
        lenient: cmd.lenient.then_some(true),
        locale: cmd.locale.clone(),
    })
}

/// Prints the tree as JSON; an empty query prints `null`.
fn output_json(tree: Option<&QueryNode>) -> ExitCode {
    match serde_json::to_string_pretty(&tree) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize query tree: {e}");
            ExitCode::FAILURE
        }
    }
}
