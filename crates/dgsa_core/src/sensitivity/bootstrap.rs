//! Bootstrap draws for the null thresholds and the confidence bounds
//!
//! Draws are split into fixed-size batches and every batch gets its own
//! generator derived from the seed, so results do not depend on how the
//! batches are scheduled across threads.

use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng, seq::index};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::OutputMode;
use crate::model::ParameterTable;

use super::cdf::{N_PERCENTILES, cdf_distance, inverse_cdf, percentile};

const MAX_BATCH_SIZE: usize = 100;

/// Separates the random streams of the two bootstrap stages
const NULL_STREAM: u64 = 0;
const CONFIDENCE_STREAM: u64 = 1 << 32;

/// Draws of batch `i` out of `num_batches`; only the seed, stream and index
/// decide its values.
fn run_batch<T, F>(
    i: usize,
    num_batches: usize,
    n_draws: usize,
    seed: u64,
    stream: u64,
    draw: &F,
) -> Vec<T>
where
    F: Fn(&mut SmallRng) -> T,
{
    let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(stream).wrapping_add(i as u64));
    let batch_size = if i == num_batches - 1 {
        n_draws - i * MAX_BATCH_SIZE
    } else {
        MAX_BATCH_SIZE
    };
    (0..batch_size)
        .map(|_| {
            let mut draw_rng = SmallRng::seed_from_u64(rng.next_u64());
            draw(&mut draw_rng)
        })
        .collect()
}

/// Run `n_draws` independent draws, batching them like a Monte Carlo sweep.
fn run_batched<T, F>(n_draws: usize, seed: u64, stream: u64, draw: F) -> Vec<T>
where
    T: Send,
    F: Fn(&mut SmallRng) -> T + Sync,
{
    let num_batches = n_draws.div_ceil(MAX_BATCH_SIZE);
    let batch = |i: usize| run_batch(i, num_batches, n_draws, seed, stream, &draw);

    #[cfg(feature = "parallel")]
    let draws = (0..num_batches).into_par_iter().flat_map(batch).collect();

    #[cfg(not(feature = "parallel"))]
    let draws = (0..num_batches).flat_map(batch).collect();

    draws
}

/// CDF distance between the prior and the given sample subset, for every parameter
fn subset_distances(
    params: &ParameterTable,
    prior: &[[f64; N_PERCENTILES]],
    subset: &[usize],
    buffer: &mut Vec<f64>,
) -> Vec<f64> {
    prior
        .iter()
        .enumerate()
        .map(|(j, prior_cdf)| {
            buffer.clear();
            buffer.extend(subset.iter().map(|&i| params.get(i, j)));
            cdf_distance(prior_cdf, &inverse_cdf(buffer))
        })
        .collect()
}

/// Standardize a distance against its null threshold
pub(crate) fn standardize(distance: f64, threshold: f64) -> f64 {
    if threshold > 0.0 {
        distance / threshold
    } else {
        0.0
    }
}

/// Null thresholds indexed `[parameter][cluster]`.
///
/// Each draw picks, for every cluster, a random subset of the cluster's size
/// from all samples without replacement. The threshold is the `quantile` of
/// the resulting CDF distances.
pub(crate) fn null_thresholds(
    params: &ParameterTable,
    prior: &[[f64; N_PERCENTILES]],
    cluster_sizes: &[usize],
    n_boots: usize,
    quantile: f64,
    seed: u64,
) -> Vec<Vec<f64>> {
    let n = params.len();

    // draws[b][c][j]
    let draws: Vec<Vec<Vec<f64>>> = run_batched(n_boots, seed, NULL_STREAM, |rng| {
        let mut buffer = Vec::with_capacity(n);
        cluster_sizes
            .iter()
            .map(|&size| {
                let subset = index::sample(rng, n, size).into_vec();
                subset_distances(params, prior, &subset, &mut buffer)
            })
            .collect()
    });

    let mut samples = Vec::with_capacity(n_boots);
    (0..prior.len())
        .map(|j| {
            (0..cluster_sizes.len())
                .map(|c| {
                    samples.clear();
                    samples.extend(draws.iter().map(|draw| draw[c][j]));
                    percentile(&samples, quantile * 100.0)
                })
                .collect()
        })
        .collect()
}

/// Half-width of the central `level` interval of the aggregated standardized
/// sensitivity, one value per parameter.
///
/// Each draw resamples every cluster's members with replacement and compares
/// the resampled cluster against the same null thresholds.
#[allow(clippy::too_many_arguments)]
pub(crate) fn confidence_bounds(
    params: &ParameterTable,
    prior: &[[f64; N_PERCENTILES]],
    members: &[Vec<usize>],
    thresholds: &[Vec<f64>],
    output: OutputMode,
    n_boots: usize,
    level: f64,
    seed: u64,
) -> Vec<f64> {
    let n_params = prior.len();

    // draws[b][j]
    let draws: Vec<Vec<f64>> = run_batched(n_boots, seed, CONFIDENCE_STREAM, |rng| {
        let mut buffer = Vec::new();
        let mut resampled = Vec::new();
        let per_cluster: Vec<Vec<f64>> = members
            .iter()
            .map(|cluster| {
                resampled.clear();
                resampled.extend(
                    (0..cluster.len()).map(|_| cluster[rng.random_range(0..cluster.len())]),
                );
                subset_distances(params, prior, &resampled, &mut buffer)
            })
            .collect();

        (0..n_params)
            .map(|j| {
                let standardized: Vec<f64> = per_cluster
                    .iter()
                    .enumerate()
                    .map(|(c, distances)| standardize(distances[j], thresholds[j][c]))
                    .collect();
                output.aggregate(&standardized)
            })
            .collect()
    });

    let lower = (1.0 - level) / 2.0 * 100.0;
    let upper = (1.0 + level) / 2.0 * 100.0;
    (0..n_params)
        .map(|j| {
            let values: Vec<f64> = draws.iter().map(|draw| draw[j]).collect();
            (percentile(&values, upper) - percentile(&values, lower)) / 2.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_batched_count_and_determinism() {
        let a = run_batched(250, 7, NULL_STREAM, |rng| rng.next_u64());
        let b = run_batched(250, 7, NULL_STREAM, |rng| rng.next_u64());
        let c = run_batched(250, 7, CONFIDENCE_STREAM, |rng| rng.next_u64());
        assert_eq!(a.len(), 250);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_run_batched_matches_sequential_batches() {
        let n_draws: usize = 345;
        let num_batches = n_draws.div_ceil(MAX_BATCH_SIZE);
        let draw = |rng: &mut SmallRng| rng.random_range(0..1_000_000u32);

        let sequential: Vec<u32> = (0..num_batches)
            .flat_map(|i| run_batch(i, num_batches, n_draws, 11, CONFIDENCE_STREAM, &draw))
            .collect();
        let batched = run_batched(n_draws, 11, CONFIDENCE_STREAM, draw);

        assert_eq!(batched.len(), n_draws);
        assert_eq!(batched, sequential);
    }

    #[test]
    fn test_standardize_zero_threshold() {
        assert_eq!(standardize(0.0, 0.0), 0.0);
        assert_eq!(standardize(3.0, 2.0), 1.5);
    }

    #[test]
    fn test_full_population_subset_has_zero_threshold() {
        let params = ParameterTable::with_default_names(
            (0..10).map(|i| vec![i as f64 / 10.0; 5]).collect(),
        )
        .unwrap();
        let prior: Vec<[f64; N_PERCENTILES]> = (0..5)
            .map(|j| inverse_cdf(&mut params.column(j).collect::<Vec<_>>()))
            .collect();

        let thresholds = null_thresholds(&params, &prior, &[10, 3], 50, 0.95, 1);
        assert_eq!(thresholds.len(), 5);
        for per_param in &thresholds {
            assert_eq!(per_param[0], 0.0);
            assert!(per_param[1] > 0.0);
        }
    }
}
