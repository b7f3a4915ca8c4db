//! Analysis configuration
//!
//! `AnalysisConfig` carries every literal setting of the workflow. All fields
//! have defaults, so a settings file only needs the values it changes:
//!
//! ```yaml
//! seed: 7
//! clustering:
//!   n_clusters: 4
//! sensitivity:
//!   output: max
//!   confidence: false
//! ```

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::model::ParameterTable;

fn default_seed() -> u64 {
    42
}

fn default_parameter_names() -> Vec<String> {
    ParameterTable::default_names(ParameterTable::DEFAULT_NAMES.len())
}

fn default_n_samples() -> usize {
    200
}

fn default_n_clusters() -> usize {
    3
}

fn default_max_iter() -> usize {
    3000
}

fn default_tol() -> f64 {
    1e-4
}

fn default_n_boots() -> usize {
    3000
}

fn default_quantile() -> f64 {
    0.95
}

fn default_true() -> bool {
    true
}

fn default_n_confidence_boots() -> usize {
    1000
}

fn default_confidence_level() -> f64 {
    0.95
}

/// True for values strictly between 0 and 1
pub(crate) fn in_unit_interval(value: f64) -> bool {
    value > 0.0 && value < 1.0
}

/// How per-cluster sensitivities collapse into one score per parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Average across clusters
    #[default]
    Mean,
    /// Largest value across clusters
    Max,
}

impl OutputMode {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Max => "max",
        }
    }

    pub(crate) fn aggregate(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        match self {
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// How k-medoids picks its starting medoids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedoidInit {
    /// Greedy PAM BUILD step; deterministic
    #[default]
    Build,
    /// Uniform draw of distinct samples from the seeded generator
    Random,
}

/// Settings for generating a Latin hypercube sample when no input file is given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_n_samples")]
    pub n_samples: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            n_samples: default_n_samples(),
        }
    }
}

/// k-medoids settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    #[serde(default = "default_n_clusters")]
    pub n_clusters: usize,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    /// Stop once the relative cost improvement of an iteration falls to this value
    #[serde(default = "default_tol")]
    pub tol: f64,
    #[serde(default)]
    pub init: MedoidInit,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            n_clusters: default_n_clusters(),
            max_iter: default_max_iter(),
            tol: default_tol(),
            init: MedoidInit::default(),
        }
    }
}

/// DGSA settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensitivityConfig {
    /// Bootstrap draws for the null distribution of CDF distances
    #[serde(default = "default_n_boots")]
    pub n_boots: usize,
    /// Quantile of the null distribution used as the significance threshold
    #[serde(default = "default_quantile")]
    pub quantile: f64,
    #[serde(default)]
    pub output: OutputMode,
    /// Compute bootstrap confidence bounds
    #[serde(default = "default_true")]
    pub confidence: bool,
    #[serde(default = "default_n_confidence_boots")]
    pub n_confidence_boots: usize,
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// Seed for every bootstrap draw. Not a settings key: the pipeline derives
    /// it from `AnalysisConfig::seed`.
    #[serde(skip, default = "default_seed")]
    pub seed: u64,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            n_boots: default_n_boots(),
            quantile: default_quantile(),
            output: OutputMode::default(),
            confidence: true,
            n_confidence_boots: default_n_confidence_boots(),
            confidence_level: default_confidence_level(),
            seed: default_seed(),
        }
    }
}

/// Complete configuration of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Names given to the parameter columns
    #[serde(default = "default_parameter_names")]
    pub parameter_names: Vec<String>,
    /// Master seed; sampling, clustering and bootstrap seeds derive from it
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub sensitivity: SensitivityConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parameter_names: default_parameter_names(),
            seed: default_seed(),
            sampling: SamplingConfig::default(),
            clustering: ClusteringConfig::default(),
            sensitivity: SensitivityConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Seed used for the k-medoids initial medoids
    pub fn clustering_seed(&self) -> u64 {
        self.seed.wrapping_add(1)
    }

    /// Sensitivity settings with the bootstrap seed derived from the master seed
    pub fn seeded_sensitivity(&self) -> SensitivityConfig {
        SensitivityConfig {
            seed: self.seed.wrapping_add(2),
            ..self.sensitivity.clone()
        }
    }

    /// Check that the settings are usable before any work is done
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let fail = |msg: &str| Err(AnalysisError::Config(msg.to_string()));

        if self.parameter_names.is_empty() {
            return fail("at least one parameter name is required");
        }
        if self.sampling.n_samples == 0 {
            return fail("sampling.n_samples must be positive");
        }
        if self.clustering.n_clusters == 0 {
            return fail("clustering.n_clusters must be positive");
        }
        if self.clustering.max_iter == 0 {
            return fail("clustering.max_iter must be positive");
        }
        if self.clustering.tol.is_nan() || self.clustering.tol < 0.0 {
            return fail("clustering.tol must be non-negative");
        }
        if self.sensitivity.n_boots == 0 {
            return fail("sensitivity.n_boots must be positive");
        }
        if !in_unit_interval(self.sensitivity.quantile) {
            return fail("sensitivity.quantile must lie in (0, 1)");
        }
        if self.sensitivity.confidence {
            if self.sensitivity.n_confidence_boots == 0 {
                return fail("sensitivity.n_confidence_boots must be positive");
            }
            if !in_unit_interval(self.sensitivity.confidence_level) {
                return fail("sensitivity.confidence_level must lie in (0, 1)");
            }
        }
        Ok(())
    }
}
