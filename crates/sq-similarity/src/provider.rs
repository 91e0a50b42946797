//! Named strategy registry.
//!
//! The embedding application registers its distribution, lambda and normalization
//! implementations under short names; settings then pick them by name.

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::SimilarityError,
    model::{Distribution, Lambda, NoNormalization, Normalization},
    similarity::PayloadIbSimilarity,
};

/// Name under which [`NoNormalization`] is pre-registered.
pub const NO_NORMALIZATION: &str = "no";

/// Strategy names selecting a similarity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimilaritySettings {
    /// Distribution name.
    pub distribution: Option<String>,
    /// Lambda name.
    pub lambda: Option<String>,
    /// Normalization name.
    #[serde(default = "default_normalization")]
    pub normalization: String,
    /// Whether overlapping tokens are left out of the field length.
    #[serde(default = "default_discount_overlaps")]
    pub discount_overlaps: bool,
}

/// Serde default for [`SimilaritySettings::normalization`].
fn default_normalization() -> String {
    NO_NORMALIZATION.to_string()
}

/// Serde default for [`SimilaritySettings::discount_overlaps`].
fn default_discount_overlaps() -> bool {
    true
}

impl Default for SimilaritySettings {
    fn default() -> Self {
        Self {
            distribution: None,
            lambda: None,
            normalization: default_normalization(),
            discount_overlaps: default_discount_overlaps(),
        }
    }
}

/// Registry of named strategies.
#[derive(Clone)]
pub struct SimilarityProvider {
    /// Distributions by name.
    distributions: BTreeMap<String, Arc<dyn Distribution>>,
    /// Lambdas by name.
    lambdas: BTreeMap<String, Arc<dyn Lambda>>,
    /// Normalizations by name.
    normalizations: BTreeMap<String, Arc<dyn Normalization>>,
}

impl SimilarityProvider {
    /// Creates a registry holding only the `no` normalization.
    pub fn new() -> Self {
        let mut normalizations: BTreeMap<String, Arc<dyn Normalization>> = BTreeMap::new();
        normalizations.insert(NO_NORMALIZATION.to_string(), Arc::new(NoNormalization));
        Self {
            distributions: BTreeMap::new(),
            lambdas: BTreeMap::new(),
            normalizations,
        }
    }

    /// Registers a distribution, replacing any previous one of the same name.
    pub fn register_distribution(
        &mut self,
        name: impl Into<String>,
        distribution: Arc<dyn Distribution>,
    ) -> &mut Self {
        self.distributions.insert(name.into(), distribution);
        self
    }

    /// Registers a lambda, replacing any previous one of the same name.
    pub fn register_lambda(&mut self, name: impl Into<String>, lambda: Arc<dyn Lambda>) -> &mut Self {
        self.lambdas.insert(name.into(), lambda);
        self
    }

    /// Registers a normalization, replacing any previous one of the same name.
    pub fn register_normalization(
        &mut self,
        name: impl Into<String>,
        normalization: Arc<dyn Normalization>,
    ) -> &mut Self {
        self.normalizations.insert(name.into(), normalization);
        self
    }

    /// Registered distribution names, sorted.
    pub fn distribution_names(&self) -> impl Iterator<Item = &str> {
        self.distributions.keys().map(String::as_str)
    }

    /// Registered lambda names, sorted.
    pub fn lambda_names(&self) -> impl Iterator<Item = &str> {
        self.lambdas.keys().map(String::as_str)
    }

    /// Registered normalization names, sorted.
    pub fn normalization_names(&self) -> impl Iterator<Item = &str> {
        self.normalizations.keys().map(String::as_str)
    }

    /// Builds the similarity the settings name.
    pub fn build(&self, settings: &SimilaritySettings) -> Result<PayloadIbSimilarity, SimilarityError> {
        let distribution_name = settings
            .distribution
            .as_deref()
            .ok_or(SimilarityError::MissingSetting("distribution"))?;
        let distribution = self
            .distributions
            .get(distribution_name)
            .ok_or_else(|| SimilarityError::UnsupportedDistribution(distribution_name.to_string()))?;

        let lambda_name = settings
            .lambda
            .as_deref()
            .ok_or(SimilarityError::MissingSetting("lambda"))?;
        let lambda = self
            .lambdas
            .get(lambda_name)
            .ok_or_else(|| SimilarityError::UnsupportedLambda(lambda_name.to_string()))?;

        let normalization = self
            .normalizations
            .get(&settings.normalization)
            .ok_or_else(|| SimilarityError::UnsupportedNormalization(settings.normalization.clone()))?;

        let similarity =
            PayloadIbSimilarity::new(Arc::clone(distribution), Arc::clone(lambda), Arc::clone(normalization))
                .with_discount_overlaps(settings.discount_overlaps);
        debug!(%similarity, "built similarity");
        Ok(similarity)
    }
}

impl Default for SimilarityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SimilarityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityProvider")
            .field("distributions", &self.distributions.keys().collect::<Vec<_>>())
            .field("lambdas", &self.lambdas.keys().collect::<Vec<_>>())
            .field("normalizations", &self.normalizations.keys().collect::<Vec<_>>())
            .finish()
    }
}
