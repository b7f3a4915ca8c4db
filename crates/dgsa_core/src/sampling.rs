//! Latin hypercube sampling of the unit hypercube
//!
//! Each column is split into `n` equal strata. Every stratum receives exactly
//! one point, the strata are permuted independently per column and each point
//! is jittered uniformly inside its stratum.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::TableError;
use crate::model::ParameterTable;

/// Draw an `n_samples` × `names.len()` Latin hypercube sample in `[0, 1)`.
///
/// The same seed always yields the same table.
pub fn latin_hypercube(
    n_samples: usize,
    names: &[String],
    seed: u64,
) -> Result<ParameterTable, TableError> {
    if n_samples == 0 || names.is_empty() {
        return Err(TableError::Empty);
    }

    let cols = names.len();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut data = vec![0.0; n_samples * cols];
    let mut strata: Vec<usize> = (0..n_samples).collect();
    let width = 1.0 / n_samples as f64;

    for col in 0..cols {
        strata.shuffle(&mut rng);
        for (row, &stratum) in strata.iter().enumerate() {
            let jitter: f64 = rng.random();
            // Stay strictly below the upper stratum edge
            let value = ((stratum as f64 + jitter) * width).min(1.0 - f64::EPSILON);
            data[row * cols + col] = value;
        }
    }

    tracing::debug!(samples = n_samples, params = cols, seed, "Generated Latin hypercube sample");

    ParameterTable::from_flat(names.to_vec(), n_samples, data)
}
