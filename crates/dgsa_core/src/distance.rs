//! Pairwise Euclidean distances between response vectors

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::model::{DistanceMatrix, ResponseTable};

/// Straight-line distance between two equally sized vectors
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn fill_row(responses: &ResponseTable, i: usize, out: &mut [f64]) {
    let a = responses.row(i);
    for (j, slot) in out.iter_mut().enumerate() {
        // (x - y)^2 == (y - x)^2 exactly, so rows computed independently stay symmetric
        *slot = if i == j {
            0.0
        } else {
            euclidean(a, responses.row(j))
        };
    }
}

/// Compute the full N × N distance matrix.
pub fn pairwise_distances(responses: &ResponseTable) -> DistanceMatrix {
    let n = responses.len();
    let mut data = vec![0.0; n * n];

    if n > 0 {
        #[cfg(feature = "parallel")]
        data.par_chunks_mut(n)
            .enumerate()
            .for_each(|(i, row)| fill_row(responses, i, row));

        #[cfg(not(feature = "parallel"))]
        data.chunks_mut(n)
            .enumerate()
            .for_each(|(i, row)| fill_row(responses, i, row));
    }

    tracing::debug!(samples = n, "Computed pairwise distance matrix");

    DistanceMatrix::from_flat(n, data)
}
