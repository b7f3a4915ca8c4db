//! k-medoids clustering over a precomputed distance matrix
//!
//! Alternates two steps until the medoid set stops changing:
//! 1. assign every sample to its nearest medoid
//! 2. move each medoid to the member with the smallest total distance to its cluster
//!
//! The run also stops when an iteration improves the total cost by no more
//! than `tol` relative to the previous cost, or after `max_iter` iterations.
//!
//! Initial medoids come either from the greedy BUILD step of PAM or from a
//! seeded uniform draw (see [`MedoidInit`]).

use rand::{SeedableRng, rngs::SmallRng, seq::index};

use crate::config::{ClusteringConfig, MedoidInit};
use crate::error::ClusteringError;
use crate::model::{Clustering, DistanceMatrix};

/// k-medoids settings bound to a seed
#[derive(Debug, Clone, PartialEq)]
pub struct KMedoids {
    pub n_clusters: usize,
    pub max_iter: usize,
    pub tol: f64,
    pub init: MedoidInit,
    /// Only used by [`MedoidInit::Random`]
    pub seed: u64,
}

impl Default for KMedoids {
    fn default() -> Self {
        Self::from_config(&ClusteringConfig::default(), 0)
    }
}

impl KMedoids {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Self::default()
        }
    }

    pub fn from_config(config: &ClusteringConfig, seed: u64) -> Self {
        Self {
            n_clusters: config.n_clusters,
            max_iter: config.max_iter,
            tol: config.tol,
            init: config.init,
            seed,
        }
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn init(mut self, init: MedoidInit) -> Self {
        self.init = init;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cluster the samples described by `distances`.
    pub fn fit(&self, distances: &DistanceMatrix) -> Result<Clustering, ClusteringError> {
        let n = distances.len();
        if n == 0 {
            return Err(ClusteringError::EmptyInput);
        }
        if self.n_clusters == 0 || self.n_clusters > n {
            return Err(ClusteringError::InvalidClusterCount {
                requested: self.n_clusters,
                samples: n,
            });
        }
        if self.max_iter == 0 {
            return Err(ClusteringError::InvalidSettings("max_iter must be positive"));
        }
        if self.tol.is_nan() || self.tol < 0.0 {
            return Err(ClusteringError::InvalidSettings("tol must be non-negative"));
        }

        let mut medoids = match self.init {
            MedoidInit::Build => build_medoids(distances, self.n_clusters),
            MedoidInit::Random => {
                let mut rng = SmallRng::seed_from_u64(self.seed);
                index::sample(&mut rng, n, self.n_clusters).into_vec()
            }
        };
        medoids.sort_unstable();

        let mut labels = assign(distances, &medoids);
        let mut cost = total_cost(distances, &labels, &medoids);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            let updated = update_medoids(distances, &labels, &medoids);
            if updated == medoids {
                converged = true;
                break;
            }

            let updated_labels = assign(distances, &updated);
            let updated_cost = total_cost(distances, &updated_labels, &updated);
            let improvement = cost - updated_cost;

            medoids = updated;
            labels = updated_labels;

            let previous = cost;
            cost = updated_cost;

            if previous > 0.0 && improvement <= self.tol * previous {
                converged = true;
                break;
            }
        }

        tracing::debug!(
            clusters = self.n_clusters,
            iterations,
            converged,
            cost,
            "k-medoids finished"
        );

        Ok(Clustering {
            labels,
            medoids,
            iterations,
            converged,
            cost,
        })
    }
}

/// Greedy BUILD initialisation: start from the most central sample, then keep
/// adding the sample that lowers the total cost the most.
fn build_medoids(distances: &DistanceMatrix, k: usize) -> Vec<usize> {
    let n = distances.len();
    let mut medoids = Vec::with_capacity(k);
    let mut is_medoid = vec![false; n];
    // Distance from every sample to its closest chosen medoid
    let mut nearest = vec![f64::INFINITY; n];

    while medoids.len() < k {
        let mut best: Option<(usize, f64)> = None;
        for candidate in (0..n).filter(|&c| !is_medoid[c]) {
            let row = distances.row(candidate);
            let cost: f64 = nearest
                .iter()
                .zip(row.iter())
                .map(|(&current, &d)| current.min(d))
                .sum();
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((candidate, cost));
            }
        }

        let Some((chosen, _)) = best else { break };
        is_medoid[chosen] = true;
        medoids.push(chosen);
        for (current, &d) in nearest.iter_mut().zip(distances.row(chosen).iter()) {
            *current = current.min(d);
        }
    }
    medoids
}

/// Label every sample with its nearest medoid; ties go to the lower cluster index.
fn assign(distances: &DistanceMatrix, medoids: &[usize]) -> Vec<usize> {
    let mut labels: Vec<usize> = (0..distances.len())
        .map(|i| {
            let row = distances.row(i);
            let mut best = 0;
            for (c, &m) in medoids.iter().enumerate().skip(1) {
                if row[m] < row[medoids[best]] {
                    best = c;
                }
            }
            best
        })
        .collect();

    // Coincident samples could otherwise pull a medoid into another cluster
    for (c, &m) in medoids.iter().enumerate() {
        labels[m] = c;
    }
    labels
}

/// Best medoid for every cluster given the current labels.
fn update_medoids(distances: &DistanceMatrix, labels: &[usize], medoids: &[usize]) -> Vec<usize> {
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); medoids.len()];
    for (i, &label) in labels.iter().enumerate() {
        members[label].push(i);
    }

    medoids
        .iter()
        .zip(members.iter())
        .map(|(&current, cluster)| {
            let within = |candidate: usize| -> f64 {
                let row = distances.row(candidate);
                cluster.iter().map(|&j| row[j]).sum()
            };

            let mut best = current;
            let mut best_cost = within(current);
            for &candidate in cluster {
                let candidate_cost = within(candidate);
                if candidate_cost < best_cost {
                    best = candidate;
                    best_cost = candidate_cost;
                }
            }
            best
        })
        .collect()
}

fn total_cost(distances: &DistanceMatrix, labels: &[usize], medoids: &[usize]) -> f64 {
    labels
        .iter()
        .enumerate()
        .map(|(i, &label)| distances.get(i, medoids[label]))
        .sum()
}
