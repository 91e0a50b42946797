//! Simple query string parsing.
//!
//! This crate turns loosely-typed search text into a boolean query tree that can be handed
//! to a scorer. It never rejects query text: anything it cannot interpret is searched for
//! literally.
//!
//! - **Terms**: `rust` - analyzed, then searched in every configured field
//! - **AND / OR**: `a + b`, `a | b` - combined from right to left, no precedence
//! - **Negation**: `-deprecated` - must not match
//! - **Phrases**: `"error handling"~2` - ordered terms with optional slop
//! - **Prefix**: `hand*` - terms starting with the text
//! - **Fuzzy**: `handle~1` - terms within an edit distance (at most 2)
//! - **Grouping**: `(a | b) + c`
//! - **Escaping**: `\-term`, `term\*`
//!
//! Each feature can be switched off with [`Flags`]; disabled syntax is read as text.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use sq_query::{FieldWeights, ParserConfig, QueryParser, build_analyzer_from_name};
//!
//! let analyzer = Arc::new(build_analyzer_from_name("standard").unwrap());
//! let config = ParserConfig {
//!     fields: FieldWeights::new([("title", 2.0), ("body", 1.0)]).unwrap(),
//!     ..ParserConfig::default()
//! };
//! let parser = QueryParser::new(analyzer, config);
//!
//! let tree = parser.parse("rust | (error + handling) -deprecated").unwrap();
//! assert!(tree.is_some());
//! ```

#![warn(missing_docs)]

mod analyzer;
mod ast;
mod error;
mod flags;
mod lexer;
mod parser;
mod settings;

pub use analyzer::{
    Analyzer, AnalyzerLookup, BuiltinAnalyzers, DEFAULT_ANALYZER, TokenizerAnalyzer,
    build_analyzer_from_name,
};
pub use ast::{Occur, QueryNode};
pub use error::{AnalysisError, FlagError, QueryError};
pub use flags::{Flag, Flags};
pub use lexer::{Token, tokenize};
pub use parser::{MAX_EDIT_DISTANCE, QueryParser};
pub use settings::{DEFAULT_FIELD, FieldWeights, Locale, Operator, ParserConfig, ParserSettings};
