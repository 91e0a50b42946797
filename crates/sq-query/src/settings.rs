//! Parser configuration values.
//!
//! All configuration is validated once, when a [`ParserConfig`] is built, and is immutable
//! afterwards.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ast::Occur, error::QueryError, flags::Flags};

/// Field used when a request names no fields.
pub const DEFAULT_FIELD: &str = "_all";

/// The operator applied between adjacent clauses with no explicit operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Any clause may match.
    #[default]
    Or,
    /// Every clause must match.
    And,
}

impl Operator {
    /// The boolean occurrence this operator produces.
    pub const fn occur(self) -> Occur {
        match self {
            Self::Or => Occur::Should,
            Self::And => Occur::Must,
        }
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("or") {
            Ok(Self::Or)
        } else if s.eq_ignore_ascii_case("and") {
            Ok(Self::And)
        } else {
            Err(s.to_string())
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Or => f.write_str("or"),
            Self::And => f.write_str("and"),
        }
    }
}

/// A locale identifier, used only for case folding of expanded terms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Locale {
    /// Lower-case ISO language code, empty for the root locale.
    language: String,
    /// Upper-case region code, if any.
    country: Option<String>,
}

impl Locale {
    /// The root locale: plain Unicode case folding.
    pub fn root() -> Self {
        Self::default()
    }

    /// The language code (empty for the root locale).
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The region code, if any.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Lower-cases `text` with this locale's rules.
    pub fn to_lowercase(&self, text: &str) -> String {
        if !matches!(self.language.as_str(), "tr" | "az") {
            return text.to_lowercase();
        }

        let mut folded = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                'I' => folded.push('ı'),
                'İ' => folded.push('i'),
                other => folded.extend(other.to_lowercase()),
            }
        }
        folded
    }
}

impl FromStr for Locale {
    type Err = QueryError;

    /// Parses `language`, `language_COUNTRY` or `language-COUNTRY` (extra variant parts are
    /// ignored). An empty string or `root` is the root locale.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("root") {
            return Ok(Self::root());
        }

        let mut parts = trimmed.split(['_', '-']);
        let language = parts.next().unwrap_or_default();
        if !(2..=8).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(QueryError::InvalidLocale(s.to_string()));
        }

        let country = match parts.next() {
            Some(c) if c.chars().all(|c| c.is_ascii_alphanumeric()) && !c.is_empty() => {
                Some(c.to_ascii_uppercase())
            }
            Some(_) => return Err(QueryError::InvalidLocale(s.to_string())),
            None => None,
        };

        Ok(Self {
            language: language.to_ascii_lowercase(),
            country,
        })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}_{}", self.language, country),
            None => f.write_str(&self.language),
        }
    }
}

/// Settings that influence term handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    /// Locale used for case folding.
    pub locale: Locale,
    /// Whether prefix and fuzzy terms are lower-cased before expansion.
    pub lowercase_expanded_terms: bool,
    /// Whether analyzer failures drop the affected clause instead of failing the parse.
    pub lenient: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            locale: Locale::root(),
            lowercase_expanded_terms: true,
            lenient: false,
        }
    }
}

/// Field name to boost weight. Every query clause fans out across every entry.
///
/// Iteration is ordered by field name so that the same request always builds the same tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWeights(BTreeMap<String, f32>);

impl FieldWeights {
    /// Builds a weight map, rejecting an empty map and non-positive or non-finite boosts.
    pub fn new<I, S>(entries: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (field, boost) in entries {
            let field = field.into();
            if !boost.is_finite() || boost <= 0.0 {
                return Err(QueryError::InvalidBoost { field, boost });
            }
            map.insert(field, boost);
        }

        if map.is_empty() {
            return Err(QueryError::NoFields);
        }

        Ok(Self(map))
    }

    /// A single field with weight 1.0.
    pub fn single(field: impl Into<String>) -> Self {
        Self(BTreeMap::from([(field.into(), 1.0)]))
    }

    /// Iterates over `(field, boost)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(field, boost)| (field.as_str(), *boost))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: an empty map cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The boost for `field`, if present.
    pub fn get(&self, field: &str) -> Option<f32> {
        self.0.get(field).copied()
    }
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self::single(DEFAULT_FIELD)
    }
}

/// Complete, immutable parser configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParserConfig {
    /// Fields every clause fans out across.
    pub fields: FieldWeights,
    /// Enabled grammar features.
    pub flags: Flags,
    /// Operator between adjacent clauses.
    pub default_operator: Operator,
    /// Term handling settings.
    pub settings: ParserSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_parses_case_insensitively() {
        assert_eq!("AND".parse::<Operator>().unwrap(), Operator::And);
        assert_eq!("or".parse::<Operator>().unwrap(), Operator::Or);
        assert_eq!("xor".parse::<Operator>().unwrap_err(), "xor");
    }

    #[test]
    fn operator_occur() {
        assert_eq!(Operator::Or.occur(), Occur::Should);
        assert_eq!(Operator::And.occur(), Occur::Must);
    }

    #[test]
    fn locale_forms() {
        let l: Locale = "en_US".parse().unwrap();
        assert_eq!(l.language(), "en");
        assert_eq!(l.country(), Some("US"));
        assert_eq!(l.to_string(), "en_US");

        let l: Locale = "tr-tr".parse().unwrap();
        assert_eq!(l.to_string(), "tr_TR");

        assert_eq!("".parse::<Locale>().unwrap(), Locale::root());
        assert!("1x".parse::<Locale>().is_err());
        assert!("en_".parse::<Locale>().is_err());
    }

    #[test]
    fn turkish_dotless_i() {
        let tr: Locale = "tr".parse().unwrap();
        assert_eq!(tr.to_lowercase("TITLE"), "tıtle");
        assert_eq!(tr.to_lowercase("İstanbul"), "istanbul");
        assert_eq!(Locale::root().to_lowercase("TITLE"), "title");
    }

    #[test]
    fn field_weights_validation() {
        assert_eq!(
            FieldWeights::new(Vec::<(String, f32)>::new()).unwrap_err(),
            QueryError::NoFields
        );
        assert!(FieldWeights::new([("title", 0.0)]).is_err());
        assert!(FieldWeights::new([("title", f32::NAN)]).is_err());

        let weights = FieldWeights::new([("title", 2.0), ("body", 1.0)]).unwrap();
        let fields: Vec<_> = weights.iter().collect();
        assert_eq!(fields, vec![("body", 1.0), ("title", 2.0)]);
        assert_eq!(weights.get("title"), Some(2.0));
    }

    #[test]
    fn default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.flags, Flags::ALL);
        assert_eq!(config.default_operator, Operator::Or);
        assert_eq!(config.fields.get(DEFAULT_FIELD), Some(1.0));
        assert!(config.settings.lowercase_expanded_terms);
        assert!(!config.settings.lenient);
    }
}
