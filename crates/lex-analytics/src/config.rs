//! Configuration types for the analytics engine.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic engine setup.

use crate::types::Domain;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy used to produce synthetic records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Sample every column independently from its observed distribution
    #[default]
    Statistical,
    /// Mutate a randomly chosen real record
    Pattern,
    /// Blend two randomly chosen real records
    Interpolation,
    /// Statistical sampling with stronger noise (no learned model)
    MachineLearning,
}

impl GenerationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statistical => "statistical",
            Self::Pattern => "pattern",
            Self::Interpolation => "interpolation",
            Self::MachineLearning => "machine_learning",
        }
    }
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMethod {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "statistical" => Ok(Self::Statistical),
            "pattern" => Ok(Self::Pattern),
            "interpolation" => Ok(Self::Interpolation),
            "machine_learning" | "ml" => Ok(Self::MachineLearning),
            other => Err(ConfigValidationError::UnknownMethod(other.to_string())),
        }
    }
}

/// Clustering algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClusteringMethod {
    /// K-Means with K-Means++ seeding
    #[default]
    KMeans,
    /// Agglomerative clustering with centroid linkage
    Hierarchical,
    /// Density-based clustering (eps = 0.3, min points = 3)
    Dbscan,
}

impl ClusteringMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KMeans => "kmeans",
            Self::Hierarchical => "hierarchical",
            Self::Dbscan => "dbscan",
        }
    }
}

impl fmt::Display for ClusteringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClusteringMethod {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kmeans" | "k-means" | "k_means" => Ok(Self::KMeans),
            "hierarchical" => Ok(Self::Hierarchical),
            "dbscan" => Ok(Self::Dbscan),
            other => Err(ConfigValidationError::UnknownMethod(other.to_string())),
        }
    }
}

/// Settings for synthetic record generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Number of records to produce.
    /// Default: 100
    pub count: usize,

    /// Generation strategy.
    /// Default: Statistical
    pub method: GenerationMethod,

    /// Perturb numeric values with noise proportional to the column's stddev.
    /// Default: true
    pub include_noise: bool,

    /// Sample numeric values from a normal distribution and reproduce each
    /// column's missing-value rate. When false, numeric values are drawn
    /// uniformly from `[min, max]` and no missing values are produced.
    /// Default: true
    pub preserve_distribution: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            count: 100,
            method: GenerationMethod::default(),
            include_noise: true,
            preserve_distribution: true,
        }
    }
}

/// Settings for the clustering engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusteringSettings {
    /// Target number of clusters (ignored by DBSCAN).
    /// Default: 4
    pub cluster_count: usize,

    /// Clustering algorithm.
    /// Default: KMeans
    pub method: ClusteringMethod,

    /// Upper bound on K-Means iterations.
    /// Default: 100
    pub max_iterations: usize,
}

impl Default for ClusteringSettings {
    fn default() -> Self {
        Self {
            cluster_count: 4,
            method: ClusteringMethod::default(),
            max_iterations: 100,
        }
    }
}

/// Configuration for the analytics engine.
///
/// Use [`AnalyticsConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_analytics::config::{AnalyticsConfig, ClusteringMethod};
///
/// let config = AnalyticsConfig::builder()
///     .domain("healthcare")
///     .cluster_count(3)
///     .clustering_method(ClusteringMethod::Hierarchical)
///     .seed(7)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Declared subject area of the dataset.
    /// Default: demographic
    pub domain: Domain,

    /// Synthetic generation settings.
    pub generation: GenerationSettings,

    /// Clustering settings.
    pub clustering: ClusteringSettings,

    /// Whether to run synthetic generation.
    /// Default: true
    pub run_synthetic: bool,

    /// Whether to run clustering. When false, scenarios are synthesized
    /// without cluster input.
    /// Default: true
    pub run_clustering: bool,

    /// Seed for every randomized stage. `None` draws from OS entropy.
    /// Default: None
    pub seed: Option<u64>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            domain: Domain::default(),
            generation: GenerationSettings::default(),
            clustering: ClusteringSettings::default(),
            run_synthetic: true,
            run_clustering: true,
            seed: None,
        }
    }
}

impl AnalyticsConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalyticsConfigBuilder {
        AnalyticsConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.clustering.cluster_count == 0 {
            return Err(ConfigValidationError::InvalidClusterCount(
                self.clustering.cluster_count,
            ));
        }

        if self.clustering.max_iterations == 0 {
            return Err(ConfigValidationError::InvalidMaxIterations(
                self.clustering.max_iterations,
            ));
        }

        if self.generation.count == 0 {
            return Err(ConfigValidationError::InvalidSyntheticCount(
                self.generation.count,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid cluster count: {0} (must be at least 1)")]
    InvalidClusterCount(usize),

    #[error("Invalid max iterations: {0} (must be at least 1)")]
    InvalidMaxIterations(usize),

    #[error("Invalid synthetic record count: {0} (must be at least 1)")]
    InvalidSyntheticCount(usize),

    #[error("Unknown method: '{0}'")]
    UnknownMethod(String),
}

/// Builder for [`AnalyticsConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalyticsConfigBuilder {
    domain: Option<Domain>,
    synthetic_count: Option<usize>,
    generation_method: Option<GenerationMethod>,
    include_noise: Option<bool>,
    preserve_distribution: Option<bool>,
    cluster_count: Option<usize>,
    clustering_method: Option<ClusteringMethod>,
    max_iterations: Option<usize>,
    run_synthetic: Option<bool>,
    run_clustering: Option<bool>,
    seed: Option<u64>,
}

impl AnalyticsConfigBuilder {
    /// Set the dataset domain (e.g. "healthcare").
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(Domain::from(domain.into()));
        self
    }

    /// Set the number of synthetic records to generate.
    pub fn synthetic_count(mut self, count: usize) -> Self {
        self.synthetic_count = Some(count);
        self
    }

    /// Set the synthetic generation strategy.
    pub fn generation_method(mut self, method: GenerationMethod) -> Self {
        self.generation_method = Some(method);
        self
    }

    /// Enable or disable numeric noise in synthetic records.
    pub fn include_noise(mut self, include: bool) -> Self {
        self.include_noise = Some(include);
        self
    }

    /// Enable or disable distribution-preserving sampling.
    pub fn preserve_distribution(mut self, preserve: bool) -> Self {
        self.preserve_distribution = Some(preserve);
        self
    }

    /// Set the target number of clusters.
    pub fn cluster_count(mut self, count: usize) -> Self {
        self.cluster_count = Some(count);
        self
    }

    /// Set the clustering algorithm.
    pub fn clustering_method(mut self, method: ClusteringMethod) -> Self {
        self.clustering_method = Some(method);
        self
    }

    /// Set the K-Means iteration cap.
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Enable or disable synthetic generation.
    pub fn run_synthetic(mut self, run: bool) -> Self {
        self.run_synthetic = Some(run);
        self
    }

    /// Enable or disable clustering.
    pub fn run_clustering(mut self, run: bool) -> Self {
        self.run_clustering = Some(run);
        self
    }

    /// Fix the random seed for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalyticsConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalyticsConfig, ConfigValidationError> {
        let generation_defaults = GenerationSettings::default();
        let clustering_defaults = ClusteringSettings::default();

        let config = AnalyticsConfig {
            domain: self.domain.unwrap_or_default(),
            generation: GenerationSettings {
                count: self.synthetic_count.unwrap_or(generation_defaults.count),
                method: self.generation_method.unwrap_or_default(),
                include_noise: self
                    .include_noise
                    .unwrap_or(generation_defaults.include_noise),
                preserve_distribution: self
                    .preserve_distribution
                    .unwrap_or(generation_defaults.preserve_distribution),
            },
            clustering: ClusteringSettings {
                cluster_count: self
                    .cluster_count
                    .unwrap_or(clustering_defaults.cluster_count),
                method: self.clustering_method.unwrap_or_default(),
                max_iterations: self
                    .max_iterations
                    .unwrap_or(clustering_defaults.max_iterations),
            },
            run_synthetic: self.run_synthetic.unwrap_or(true),
            run_clustering: self.run_clustering.unwrap_or(true),
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}
