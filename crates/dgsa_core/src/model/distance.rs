use serde::Serialize;

/// Square matrix of pairwise distances between samples.
///
/// Symmetric with an exactly zero diagonal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    pub(crate) fn from_flat(n: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), n * n);
        Self { n, data }
    }

    /// Number of samples (rows and columns)
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Distances from sample `i` to every sample
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Largest pairwise distance
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0_f64, f64::max)
    }
}
