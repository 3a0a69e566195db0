//! Synthetic record generation.
//!
//! Produces artificial records shaped like the source dataset using one
//! of four methods:
//!
//! - `statistical`: each column sampled independently (normal for numeric
//!   columns, uniform over observed values otherwise)
//! - `pattern`: copies of random source records with numeric jitter
//! - `interpolation`: weighted blends of two random source records
//! - `machine_learning`: statistical sampling with stronger, always-on noise
//!
//! Generation never tries to guarantee privacy; synthetic rows may repeat
//! source values verbatim.

mod sampling;
mod strategies;

use crate::config::{GenerationMethod, GenerationSettings};
use crate::error::{AnalyticsError, Result};
use crate::profiler::DataProfiler;
use crate::record::{Dataset, Record};
use crate::types::DatasetProfile;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use sampling::build_column_models;
use strategies::{interpolation_record, pattern_record, statistical_record};

/// Noise half-width (×std) for the statistical method.
const STATISTICAL_NOISE: f64 = 0.10;
/// Noise half-width (×std) for the machine-learning method.
const ML_NOISE: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    settings: GenerationSettings,
    seed: Option<u64>,
}

impl SyntheticGenerator {
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            settings,
            seed: None,
        }
    }

    /// Fix the random seed for reproducible output.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Generate `settings.count` records from `dataset`.
    ///
    /// Fails with [`AnalyticsError::NoSourceRecords`] when the dataset is empty.
    pub fn generate(&self, dataset: &Dataset) -> Result<Vec<Record>> {
        if dataset.is_empty() {
            return Err(AnalyticsError::NoSourceRecords);
        }
        let profile = DataProfiler::require_profile(dataset)?;
        self.generate_with_profile(dataset, &profile)
    }

    /// Generate records reusing an existing profile of `dataset`.
    pub fn generate_with_profile(
        &self,
        dataset: &Dataset,
        profile: &DatasetProfile,
    ) -> Result<Vec<Record>> {
        if dataset.is_empty() {
            return Err(AnalyticsError::NoSourceRecords);
        }

        let models = build_column_models(dataset, profile);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let GenerationSettings {
            count,
            method,
            include_noise,
            preserve_distribution,
        } = self.settings;

        info!(
            "Generating {} synthetic records ({}) from {} source records",
            count,
            method,
            dataset.len()
        );

        let records: Vec<Record> = (0..count)
            .map(|index| match method {
                GenerationMethod::Statistical => statistical_record(
                    &models,
                    preserve_distribution,
                    include_noise.then_some(STATISTICAL_NOISE),
                    index,
                    &mut rng,
                ),
                GenerationMethod::MachineLearning => statistical_record(
                    &models,
                    preserve_distribution,
                    Some(ML_NOISE),
                    index,
                    &mut rng,
                ),
                GenerationMethod::Pattern => pattern_record(dataset, &models, index, &mut rng),
                GenerationMethod::Interpolation => {
                    interpolation_record(dataset, &models, &mut rng)
                }
            })
            .collect();

        debug!("Generated {} synthetic records", records.len());
        Ok(records)
    }
}
