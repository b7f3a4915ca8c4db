//! Distance-based global sensitivity analysis library
//!
//! This crate provides the numeric core of a DGSA workflow:
//! - Latin hypercube sampling of a bounded parameter space
//! - Derivation of synthetic model responses from sampled parameters
//! - Pairwise Euclidean distances between responses
//! - k-medoids clustering of the distance matrix
//! - Standardized sensitivity of each parameter with bootstrap confidence bounds
//!
//! # Pipeline
//!
//! ```ignore
//! use dgsa_core::{AnalysisConfig, latin_hypercube, run_analysis};
//!
//! let config = AnalysisConfig::default();
//! let params = latin_hypercube(200, &config.parameter_names, config.seed)?;
//! let result = run_analysis(&params, &config)?;
//!
//! for entry in result.report.ranked() {
//!     println!("{}: {:.3}", entry.name, entry.sensitivity);
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod clustering;
pub mod distance;
pub mod error;
pub mod io;
pub mod responses;
pub mod sampling;
pub mod sensitivity;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::{AnalysisResult, run_analysis};
pub use clustering::KMedoids;
pub use config::{
    AnalysisConfig, ClusteringConfig, MedoidInit, OutputMode, SamplingConfig, SensitivityConfig,
};
pub use distance::pairwise_distances;
pub use model::{
    Clustering, DistanceMatrix, ParameterTable, ResponseTable, SensitivityEntry,
    SensitivityReport,
};
pub use responses::derive_responses;
pub use sampling::latin_hypercube;
pub use sensitivity::dgsa;
