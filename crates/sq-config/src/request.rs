//! Query request schema.
//!
//! A request arrives as JSON:
//!
//! ```json
//! {
//!   "query": "rust | \"error handling\"~2 -deprecated",
//!   "fields": ["title^2", "body"],
//!   "flags": "AND|OR|NOT|PHRASE|NEAR",
//!   "default_operator": "and",
//!   "analyzer": "english",
//!   "lowercase_expanded_terms": true,
//!   "lenient": false,
//!   "locale": "en_US"
//! }
//! ```
//!
//! Every key except `query` is optional. Unknown keys are rejected.

use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_with::{OneOrMany, serde_as};
use sq_query::{
    AnalyzerLookup, DEFAULT_ANALYZER, FieldWeights, Flags, Locale, Operator,
    ParserConfig, ParserSettings, QueryError, QueryNode, QueryParser,
};
use tracing::debug;

use crate::ConfigError;

/// Grammar flags as a name list or a raw bitmask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagsSpec {
    /// `|`-delimited flag names.
    Names(String),
    /// Raw bitmask; negative means every feature.
    Mask(i64),
}

impl FlagsSpec {
    /// Resolves the flags.
    pub fn resolve(&self) -> Result<Flags, ConfigError> {
        match self {
            Self::Names(names) => Ok(Flags::resolve(Some(names))?),
            Self::Mask(mask) if *mask < 0 => Ok(Flags::ALL),
            Self::Mask(mask) => Ok(Flags::from_bits(i32::try_from(*mask).unwrap_or(-1))),
        }
    }
}

/// The query-submission schema.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryRequest {
    /// Raw query text. Required.
    pub query: Option<String>,
    /// Fields to search, each `name` or `name^boost`.
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    /// Enabled grammar features. Defaults to all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<FlagsSpec>,
    /// Analyzer name. Defaults to `standard`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    /// `and` or `or`. Defaults to `or`.
    #[serde(alias = "defaultOperator", skip_serializing_if = "Option::is_none")]
    pub default_operator: Option<String>,
    /// Whether prefix and fuzzy text is lower-cased. Defaults to true.
    #[serde(alias = "lowercaseExpandedTerms", skip_serializing_if = "Option::is_none")]
    pub lowercase_expanded_terms: Option<bool>,
    /// Whether analyzer failures drop clauses instead of failing. Defaults to false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lenient: Option<bool>,
    /// Locale for case folding. Defaults to the root locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl QueryRequest {
    /// A request for `query` with every other setting at its default.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Parses a JSON request.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON request from a file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Validates the request and resolves every setting.
    pub fn resolve(&self, analyzers: &dyn AnalyzerLookup) -> Result<ResolvedQuery, ConfigError> {
        let text = self.query.clone().ok_or(ConfigError::MissingQuery)?;

        let fields = if self.fields.is_empty() {
            FieldWeights::default()
        } else {
            FieldWeights::new(
                self.fields
                    .iter()
                    .map(|entry| parse_field(entry))
                    .collect::<Result<Vec<_>, _>>()?,
            )?
        };

        let flags = self
            .flags
            .as_ref()
            .map_or(Ok(Flags::ALL), FlagsSpec::resolve)?;

        let default_operator = match &self.default_operator {
            Some(op) => op
                .parse::<Operator>()
                .map_err(ConfigError::InvalidDefaultOperator)?,
            None => Operator::default(),
        };

        let locale = match &self.locale {
            Some(tag) => tag.parse::<Locale>()?,
            None => Locale::root(),
        };

        let analyzer_name = self.analyzer.as_deref().unwrap_or(DEFAULT_ANALYZER);
        let analyzer = analyzers
            .analyzer(analyzer_name)
            .ok_or_else(|| ConfigError::UnknownAnalyzer(analyzer_name.to_string()))?;

        let config = ParserConfig {
            fields,
            flags,
            default_operator,
            settings: ParserSettings {
                locale,
                lowercase_expanded_terms: self.lowercase_expanded_terms.unwrap_or(true),
                lenient: self.lenient.unwrap_or(false),
            },
        };
        debug!(analyzer = analyzer_name, flags = %config.flags, "resolved query request");

        Ok(ResolvedQuery {
            text,
            analyzer_name: analyzer_name.to_string(),
            parser: QueryParser::new(analyzer, config),
        })
    }
}

/// Splits `name^boost` into a field and its weight. A bare name weighs 1.0.
pub fn parse_field(entry: &str) -> Result<(String, f32), ConfigError> {
    match entry.split_once('^') {
        Some((field, boost)) => {
            let weight = boost
                .trim()
                .parse::<f32>()
                .map_err(|_| ConfigError::InvalidFieldBoost {
                    field: field.to_string(),
                    boost: boost.to_string(),
                })?;
            Ok((field.to_string(), weight))
        }
        None => Ok((entry.to_string(), 1.0)),
    }
}

/// A validated request, ready to parse.
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    /// The query text.
    text: String,
    /// Name of the analyzer in use.
    analyzer_name: String,
    /// Parser built from the request settings.
    parser: QueryParser,
}

impl ResolvedQuery {
    /// The query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The analyzer name.
    pub fn analyzer_name(&self) -> &str {
        &self.analyzer_name
    }

    /// The resolved parser configuration.
    pub fn config(&self) -> &ParserConfig {
        self.parser.config()
    }

    /// The parser, for parsing further text with the same settings.
    pub fn parser(&self) -> &QueryParser {
        &self.parser
    }

    /// Parses the query text.
    pub fn parse(&self) -> Result<Option<QueryNode>, QueryError> {
        self.parser.parse(&self.text)
    }
}

impl fmt::Display for ResolvedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config();
        let fields: Vec<String> = config
            .fields
            .iter()
            .map(|(field, boost)| format!("{field}^{boost}"))
            .collect();
        write!(
            f,
            "query={:?} fields=[{}] flags={} default_operator={}",
            self.text,
            fields.join(", "),
            config.flags,
            config.default_operator
        )
    }
}

#[cfg(test)]
mod tests {
    use sq_query::{BuiltinAnalyzers, DEFAULT_FIELD, Flag, Occur};

    use super::*;

    fn resolve(json: &str) -> Result<ResolvedQuery, ConfigError> {
        QueryRequest::from_json(json)?.resolve(&BuiltinAnalyzers)
    }

    #[test]
    fn minimal_request_uses_defaults() {
        let resolved = resolve(r#"{"query": "rust"}"#).unwrap();
        let config = resolved.config();
        assert_eq!(config.fields.get(DEFAULT_FIELD), Some(1.0));
        assert_eq!(config.flags, Flags::ALL);
        assert_eq!(config.default_operator, Operator::Or);
        assert!(config.settings.lowercase_expanded_terms);
        assert!(!config.settings.lenient);
        assert_eq!(resolved.analyzer_name(), "standard");
    }

    #[test]
    fn full_request() {
        let resolved = resolve(
            r#"{
                "query": "a b",
                "fields": ["title^2.5", "body"],
                "flags": "and|or",
                "defaultOperator": "AND",
                "analyzer": "whitespace",
                "lowercase_expanded_terms": false,
                "lenient": true,
                "locale": "tr_TR"
            }"#,
        )
        .unwrap();
        let config = resolved.config();
        assert_eq!(config.fields.get("title"), Some(2.5));
        assert_eq!(config.fields.get("body"), Some(1.0));
        assert_eq!(config.flags, Flags::NONE | Flag::And | Flag::Or);
        assert_eq!(config.default_operator, Operator::And);
        assert_eq!(config.settings.locale.to_string(), "tr_TR");
        assert!(!config.settings.lowercase_expanded_terms);
        assert!(config.settings.lenient);
        assert_eq!(resolved.text(), "a b");
    }

    #[test]
    fn single_field_string() {
        let resolved = resolve(r#"{"query": "x", "fields": "title^3"}"#).unwrap();
        assert_eq!(resolved.config().fields.get("title"), Some(3.0));
        assert_eq!(resolved.config().fields.len(), 1);
    }

    #[test]
    fn integer_flags() {
        let resolved = resolve(r#"{"query": "x", "flags": 3}"#).unwrap();
        assert_eq!(resolved.config().flags, Flags::NONE | Flag::And | Flag::Not);
        let resolved = resolve(r#"{"query": "x", "flags": -7}"#).unwrap();
        assert_eq!(resolved.config().flags, Flags::ALL);
    }

    #[test]
    fn configuration_errors() {
        assert!(matches!(resolve(r#"{"fields": ["a"]}"#), Err(ConfigError::MissingQuery)));
        assert!(matches!(
            resolve(r#"{"query": "x", "flags": "AND|BOGUS"}"#),
            Err(ConfigError::Flag(_))
        ));
        assert!(matches!(
            resolve(r#"{"query": "x", "analyzer": "klingon"}"#),
            Err(ConfigError::UnknownAnalyzer(name)) if name == "klingon"
        ));
        assert!(matches!(
            resolve(r#"{"query": "x", "default_operator": "xor"}"#),
            Err(ConfigError::InvalidDefaultOperator(op)) if op == "xor"
        ));
        assert!(matches!(
            resolve(r#"{"query": "x", "fields": ["title^high"]}"#),
            Err(ConfigError::InvalidFieldBoost { .. })
        ));
        assert!(matches!(
            resolve(r#"{"query": "x", "fields": ["title^-1"]}"#),
            Err(ConfigError::Query(QueryError::InvalidBoost { .. }))
        ));
        assert!(matches!(
            resolve(r#"{"query": "x", "locale": "12"}"#),
            Err(ConfigError::Query(QueryError::InvalidLocale(_)))
        ));
    }

    #[test]
    fn unsupported_field_is_rejected() {
        let err = resolve(r#"{"query": "x", "boost": 2}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson(_)));
        assert!(err.to_string().contains("unknown field `boost`"), "{err}");
    }

    #[test]
    fn parse_field_forms() {
        assert_eq!(parse_field("body").unwrap(), ("body".to_string(), 1.0));
        assert_eq!(parse_field("title^2").unwrap(), ("title".to_string(), 2.0));
        assert!(parse_field("title^").is_err());
    }

    #[test]
    fn parses_with_resolved_settings() {
        let resolved = resolve(r#"{"query": "a b", "fields": ["f"], "default_operator": "and"}"#)
            .unwrap();
        assert_eq!(
            resolved.parse().unwrap(),
            Some(QueryNode::Boolean {
                occur: Occur::Must,
                children: vec![QueryNode::term("f", "a"), QueryNode::term("f", "b")],
            })
        );
    }

    #[test]
    fn display_summarizes() {
        let resolved = resolve(r#"{"query": "x", "fields": ["b", "a^2"], "flags": "NONE"}"#).unwrap();
        assert_eq!(
            resolved.to_string(),
            "query=\"x\" fields=[a^2, b^1] flags=NONE default_operator=or"
        );
    }
}
