//! Text and JSON renderings of an analysis result

use std::fmt::Write;

use dgsa_core::{AnalysisResult, Clustering, OutputMode, SensitivityReport};
use serde::Serialize;

use crate::util::format::{format_confidence, format_percentage, format_score};

/// Ranked sensitivity table, one parameter per line.
///
/// Sensitive parameters (standardized value of 1 or more) are marked with `*`.
pub fn render_table(report: &SensitivityReport) -> String {
    let name_width = report
        .entries()
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Parameter".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<name_width$} {:>11} {:>10}",
        "Rank", "Parameter", "Sensitivity", "Confidence"
    );
    for (rank, entry) in report.ranked().into_iter().enumerate() {
        let marker = if entry.is_sensitive() { " *" } else { "" };
        let _ = writeln!(
            out,
            "{:<4} {:<name_width$} {:>11} {:>10}{marker}",
            rank + 1,
            entry.name,
            format_score(entry.sensitivity),
            format_confidence(entry.confidence),
        );
    }
    let _ = writeln!(
        out,
        "\n{} aggregation over {} clusters; * marks sensitive parameters",
        report.output_mode().label(),
        report.n_clusters()
    );
    out
}

/// One line per cluster with its size and share of the samples
pub fn render_cluster_summary(clustering: &Clustering) -> String {
    let total = clustering.len().max(1) as f64;
    let mut out = String::new();
    for (c, size) in clustering.sizes().into_iter().enumerate() {
        let _ = writeln!(
            out,
            "Cluster {c}: {size} samples ({}), medoid {}",
            format_percentage(size as f64 / total),
            clustering.medoids[c]
        );
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: jiff::Timestamp,
    samples: usize,
    output: OutputMode,
    clustering: ClusterSummary<'a>,
    parameters: Vec<JsonEntry<'a>>,
}

#[derive(Serialize)]
struct ClusterSummary<'a> {
    n_clusters: usize,
    sizes: Vec<usize>,
    medoids: &'a [usize],
    iterations: usize,
    converged: bool,
    cost: f64,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    rank: usize,
    name: &'a str,
    sensitivity: f64,
    confidence: Option<f64>,
    sensitive: bool,
    per_cluster: &'a [f64],
}

/// Pretty-printed JSON document of the ranked report and clustering summary
pub fn render_json(result: &AnalysisResult) -> serde_json::Result<String> {
    let clustering = &result.clustering;
    let document = JsonReport {
        generated_at: jiff::Timestamp::now(),
        samples: clustering.len(),
        output: result.report.output_mode(),
        clustering: ClusterSummary {
            n_clusters: clustering.n_clusters(),
            sizes: clustering.sizes(),
            medoids: &clustering.medoids,
            iterations: clustering.iterations,
            converged: clustering.converged,
            cost: clustering.cost,
        },
        parameters: result
            .report
            .ranked()
            .into_iter()
            .enumerate()
            .map(|(i, entry)| JsonEntry {
                rank: i + 1,
                name: &entry.name,
                sensitivity: entry.sensitivity,
                confidence: entry.confidence,
                sensitive: entry.is_sensitive(),
                per_cluster: &entry.per_cluster,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&document)
}
