//! End-to-end analysis pipeline
//!
//! Runs the four stages in order and keeps every intermediate result:
//! responses → distances → clusters → sensitivities.

use std::time::Instant;

use crate::clustering::KMedoids;
use crate::config::AnalysisConfig;
use crate::distance::pairwise_distances;
use crate::error::AnalysisError;
use crate::model::{Clustering, DistanceMatrix, ParameterTable, ResponseTable, SensitivityReport};
use crate::responses::derive_responses;
use crate::sensitivity::dgsa;

/// Everything produced by one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub responses: ResponseTable,
    pub distances: DistanceMatrix,
    pub clustering: Clustering,
    pub report: SensitivityReport,
}

/// Run the full workflow on a parameter table.
pub fn run_analysis(
    params: &ParameterTable,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;
    let started = Instant::now();

    let responses = derive_responses(params)?;
    let distances = pairwise_distances(&responses);

    let clustering =
        KMedoids::from_config(&config.clustering, config.clustering_seed()).fit(&distances)?;
    tracing::info!(
        samples = params.len(),
        clusters = clustering.n_clusters(),
        sizes = ?clustering.sizes(),
        iterations = clustering.iterations,
        converged = clustering.converged,
        "Clustered responses"
    );
    if !clustering.converged {
        tracing::warn!(
            max_iter = config.clustering.max_iter,
            "k-medoids stopped on the iteration cap"
        );
    }

    let report = dgsa(params, &clustering, &config.seeded_sensitivity())?;
    tracing::info!(
        params = params.n_params(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Sensitivity analysis complete"
    );

    Ok(AnalysisResult {
        responses,
        distances,
        clustering,
        report,
    })
}
