//! Similarity settings files.
//!
//! ```toml
//! [similarity]
//! distribution = "ll"
//! lambda = "df"
//! normalization = "h2"
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use sq_similarity::{PayloadIbSimilarity, SimilarityProvider, SimilaritySettings};

use crate::ConfigError;

/// Top-level layout of a settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    /// The `[similarity]` table.
    #[serde(default)]
    similarity: SimilaritySettings,
}

/// Parses similarity settings from TOML.
pub fn parse_similarity_settings(contents: &str) -> Result<SimilaritySettings, ConfigError> {
    let file: SettingsFile = toml::from_str(contents)?;
    Ok(file.similarity)
}

/// Reads similarity settings from a TOML file.
pub fn load_similarity_settings(path: &Path) -> Result<SimilaritySettings, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_similarity_settings(&contents)
}

/// Builds the similarity named by TOML settings.
pub fn build_similarity(
    provider: &SimilarityProvider,
    contents: &str,
) -> Result<PayloadIbSimilarity, ConfigError> {
    let settings = parse_similarity_settings(contents)?;
    Ok(provider.build(&settings)?)
}
