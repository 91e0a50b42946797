//! sq: simple payload queries from the command line.
//!
//! A thin front end over the library crates:
//!
//! - `sq parse` turns query text (or a JSON request file) into a query tree.
//! - `sq flags` shows which grammar features a flag list enables.
//! - `sq payload` decodes and encodes per-occurrence payload weights.

#![warn(missing_docs)]

pub mod cli;
