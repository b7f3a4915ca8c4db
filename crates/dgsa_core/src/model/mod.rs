//! Data model for the sensitivity workflow
//!
//! Every entity is created once by one pipeline stage and read by the next:
//! - `tables` - sampled parameters and derived responses
//! - `distance` - pairwise response distances
//! - `clusters` - k-medoids assignment
//! - `report` - per-parameter sensitivity scores

mod clusters;
mod distance;
mod report;
mod tables;

pub use clusters::Clustering;
pub use distance::DistanceMatrix;
pub use report::{SensitivityEntry, SensitivityReport};
pub use tables::{ParameterTable, ResponseTable};

pub(crate) use tables::Matrix;
