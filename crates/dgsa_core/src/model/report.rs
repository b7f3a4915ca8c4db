use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::OutputMode;

/// Sensitivity of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityEntry {
    pub name: String,
    /// Standardized sensitivity aggregated across clusters; values >= 1 are significant
    pub sensitivity: f64,
    /// Half-width of the bootstrap confidence interval, when requested
    pub confidence: Option<f64>,
    /// Standardized sensitivity for each cluster
    pub per_cluster: Vec<f64>,
}

impl SensitivityEntry {
    #[must_use]
    pub fn is_sensitive(&self) -> bool {
        self.sensitivity >= 1.0
    }
}

/// Per-parameter sensitivity scores indexed by parameter name.
#[derive(Debug, Clone, Serialize)]
pub struct SensitivityReport {
    entries: Vec<SensitivityEntry>,
    output: OutputMode,
    n_clusters: usize,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl SensitivityReport {
    /// Entries keep the parameter column order.
    pub fn new(entries: Vec<SensitivityEntry>, output: OutputMode, n_clusters: usize) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        Self {
            entries,
            output,
            n_clusters,
            index,
        }
    }

    pub fn entries(&self) -> &[SensitivityEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&SensitivityEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Entries ordered by descending sensitivity, ties broken by name
    pub fn ranked(&self) -> Vec<&SensitivityEntry> {
        let mut ranked: Vec<&SensitivityEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| {
            b.sensitivity
                .partial_cmp(&a.sensitivity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked
    }

    /// 1-based rank of a parameter
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.ranked()
            .iter()
            .position(|e| e.name == name)
            .map(|i| i + 1)
    }
}
