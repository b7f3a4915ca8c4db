//! End-to-end tests on the synthetic five-parameter problem
//!
//! `z` feeds two of the four responses directly, `x` and `y` feed the other
//! two, and `v`, `w` feed nothing. The ranking must reflect that.

use crate::analysis::run_analysis;
use crate::config::{AnalysisConfig, MedoidInit, OutputMode};
use crate::error::AnalysisError;
use crate::model::ParameterTable;
use crate::sampling::latin_hypercube;

fn test_config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.sensitivity.n_boots = 500;
    config.sensitivity.n_confidence_boots = 200;
    config
}

fn demo_parameters(config: &AnalysisConfig) -> ParameterTable {
    latin_hypercube(config.sampling.n_samples, &config.parameter_names, config.seed).unwrap()
}

#[test]
fn test_z_ranks_at_the_top() {
    let config = test_config();
    let params = demo_parameters(&config);
    let result = run_analysis(&params, &config).unwrap();

    let report = &result.report;
    let z_rank = report.rank_of("z").unwrap();
    assert!(z_rank <= 2, "z ranked {z_rank}: {:?}", report.ranked());

    let z = report.get("z").unwrap();
    assert!(z.is_sensitive(), "z sensitivity {}", z.sensitivity);
    for inert in ["v", "w"] {
        let entry = report.get(inert).unwrap();
        assert!(
            entry.sensitivity < z.sensitivity,
            "{inert} ({}) outranks z ({})",
            entry.sensitivity,
            z.sensitivity
        );
    }
}

#[test]
fn test_pipeline_shapes() {
    let config = test_config();
    let params = demo_parameters(&config);
    let result = run_analysis(&params, &config).unwrap();

    assert_eq!(result.responses.len(), 200);
    assert_eq!(result.responses.n_responses(), 4);
    assert_eq!(result.distances.len(), 200);
    assert_eq!(result.clustering.len(), 200);
    assert_eq!(result.clustering.n_clusters(), 3);
    assert!(result.clustering.sizes().iter().all(|&s| s > 0));

    let report = &result.report;
    assert_eq!(report.entries().len(), 5);
    assert_eq!(report.n_clusters(), 3);
    assert_eq!(report.output_mode(), OutputMode::Mean);
    for entry in report.entries() {
        assert_eq!(entry.per_cluster.len(), 3);
        assert!(entry.sensitivity.is_finite() && entry.sensitivity >= 0.0);
        assert!(entry.confidence.is_some_and(|c| c.is_finite() && c >= 0.0));
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let config = test_config();
    let params = demo_parameters(&config);
    let a = run_analysis(&params, &config).unwrap();
    let b = run_analysis(&params, &config).unwrap();

    assert_eq!(a.clustering, b.clustering);
    assert_eq!(a.report.entries(), b.report.entries());
}

#[test]
fn test_random_medoid_init() {
    let mut config = test_config();
    config.clustering.init = MedoidInit::Random;
    config.sensitivity.confidence = false;
    let params = demo_parameters(&config);

    let a = run_analysis(&params, &config).unwrap();
    let b = run_analysis(&params, &config).unwrap();
    assert_eq!(a.clustering, b.clustering);
    assert_eq!(a.report.entries(), b.report.entries());

    let clustering = &a.clustering;
    assert_eq!(clustering.n_clusters(), 3);
    assert!(clustering.sizes().iter().all(|&s| s > 0));
    for (c, &m) in clustering.medoids.iter().enumerate() {
        assert_eq!(clustering.labels[m], c);
    }
    for entry in a.report.entries() {
        assert!(entry.sensitivity.is_finite() && entry.sensitivity >= 0.0);
    }
}

#[test]
fn test_invalid_config_is_rejected_before_work() {
    let mut config = test_config();
    config.clustering.n_clusters = 0;
    let params = demo_parameters(&AnalysisConfig::default());

    assert!(matches!(
        run_analysis(&params, &config),
        Err(AnalysisError::Config(_))
    ));
}

#[test]
fn test_too_many_clusters_for_samples() {
    let mut config = test_config();
    config.clustering.n_clusters = 8;
    let params = latin_hypercube(5, &config.parameter_names, 1).unwrap();

    assert!(matches!(
        run_analysis(&params, &config),
        Err(AnalysisError::Clustering(_))
    ));
}

#[test]
fn test_four_parameters_cannot_drive_responses() {
    let config = test_config();
    let names = ParameterTable::default_names(4);
    let params = latin_hypercube(20, &names, 1).unwrap();

    assert!(matches!(
        run_analysis(&params, &config),
        Err(AnalysisError::Table(_))
    ));
}
