use serde::{Deserialize, Serialize};

/// Result of a k-medoids run.
///
/// `labels[i]` is the cluster of sample `i`; `medoids[c]` is the sample index
/// representing cluster `c`. Every cluster has at least one member and
/// `labels[medoids[c]] == c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    pub labels: Vec<usize>,
    pub medoids: Vec<usize>,
    /// Number of assign/update rounds performed
    pub iterations: usize,
    /// False when the run stopped on the iteration cap
    pub converged: bool,
    /// Sum of distances from every sample to its medoid
    pub cost: f64,
}

impl Clustering {
    pub fn n_clusters(&self) -> usize {
        self.medoids.len()
    }

    /// Number of clustered samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sample indices belonging to cluster `c`, in ascending order
    pub fn members(&self, c: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == c)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters()];
        for &label in &self.labels {
            if let Some(size) = sizes.get_mut(label) {
                *size += 1;
            }
        }
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_and_sizes() {
        let clustering = Clustering {
            labels: vec![0, 1, 0, 2, 1, 0],
            medoids: vec![0, 1, 3],
            iterations: 1,
            converged: true,
            cost: 0.0,
        };

        assert_eq!(clustering.n_clusters(), 3);
        assert_eq!(clustering.members(0), vec![0, 2, 5]);
        assert_eq!(clustering.members(2), vec![3]);
        assert_eq!(clustering.sizes(), vec![3, 2, 1]);
    }
}
