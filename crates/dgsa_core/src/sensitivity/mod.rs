//! Distance-based generalized sensitivity analysis (DGSA)
//!
//! A parameter is influential when its distribution inside a response cluster
//! differs from its distribution over all samples. For every parameter and
//! cluster this module measures that difference as the L1 distance between
//! the two inverse CDFs, then standardizes it by the `quantile` of the same
//! distance for random subsets of equal size. A standardized value of 1 or
//! more marks the parameter as sensitive for that cluster.
//!
//! # Example
//!
//! ```ignore
//! use dgsa_core::{KMedoids, SensitivityConfig, dgsa, pairwise_distances};
//!
//! let clustering = KMedoids::new(3).fit(&pairwise_distances(&responses))?;
//! let report = dgsa(&params, &clustering, &SensitivityConfig::default())?;
//! let top = report.ranked()[0];
//! ```

mod bootstrap;
mod cdf;

pub use cdf::{N_PERCENTILES, cdf_distance, inverse_cdf, percentile, percentile_sorted};

use crate::config::{SensitivityConfig, in_unit_interval};
use crate::error::SensitivityError;
use crate::model::{Clustering, ParameterTable, SensitivityEntry, SensitivityReport};

use bootstrap::{confidence_bounds, null_thresholds, standardize};

fn validate(
    params: &ParameterTable,
    clustering: &Clustering,
    config: &SensitivityConfig,
) -> Result<Vec<Vec<usize>>, SensitivityError> {
    if clustering.len() != params.len() {
        return Err(SensitivityError::LabelCountMismatch {
            labels: clustering.len(),
            samples: params.len(),
        });
    }
    if config.n_boots == 0 {
        return Err(SensitivityError::InvalidSettings("n_boots must be positive"));
    }
    if !in_unit_interval(config.quantile) {
        return Err(SensitivityError::InvalidSettings("quantile must lie in (0, 1)"));
    }
    if config.confidence
        && (config.n_confidence_boots == 0 || !in_unit_interval(config.confidence_level))
    {
        return Err(SensitivityError::InvalidSettings(
            "confidence needs positive draws and a level in (0, 1)",
        ));
    }

    let k = clustering.n_clusters();
    let mut members = vec![Vec::new(); k];
    for (sample, &label) in clustering.labels.iter().enumerate() {
        members
            .get_mut(label)
            .ok_or(SensitivityError::LabelOutOfRange { sample, label })?
            .push(sample);
    }
    if let Some(c) = members.iter().position(Vec::is_empty) {
        return Err(SensitivityError::EmptyCluster(c));
    }
    Ok(members)
}

/// Compute the sensitivity report for every parameter column.
pub fn dgsa(
    params: &ParameterTable,
    clustering: &Clustering,
    config: &SensitivityConfig,
) -> Result<SensitivityReport, SensitivityError> {
    let members = validate(params, clustering, config)?;
    let sizes: Vec<usize> = members.iter().map(Vec::len).collect();

    let prior: Vec<[f64; N_PERCENTILES]> = (0..params.n_params())
        .map(|j| inverse_cdf(&mut params.column(j).collect::<Vec<_>>()))
        .collect();

    // observed[j][c]
    let mut buffer = Vec::with_capacity(params.len());
    let observed: Vec<Vec<f64>> = prior
        .iter()
        .enumerate()
        .map(|(j, prior_cdf)| {
            members
                .iter()
                .map(|cluster| {
                    buffer.clear();
                    buffer.extend(cluster.iter().map(|&i| params.get(i, j)));
                    cdf_distance(prior_cdf, &inverse_cdf(&mut buffer))
                })
                .collect()
        })
        .collect();

    let thresholds = null_thresholds(
        params,
        &prior,
        &sizes,
        config.n_boots,
        config.quantile,
        config.seed,
    );

    let confidence = config.confidence.then(|| {
        confidence_bounds(
            params,
            &prior,
            &members,
            &thresholds,
            config.output,
            config.n_confidence_boots,
            config.confidence_level,
            config.seed,
        )
    });

    let entries = params
        .names()
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let per_cluster: Vec<f64> = observed[j]
                .iter()
                .zip(thresholds[j].iter())
                .map(|(&d, &t)| standardize(d, t))
                .collect();
            SensitivityEntry {
                name: name.clone(),
                sensitivity: config.output.aggregate(&per_cluster),
                confidence: confidence.as_ref().map(|bounds| bounds[j]),
                per_cluster,
            }
        })
        .collect();

    tracing::debug!(
        params = params.n_params(),
        clusters = members.len(),
        boots = config.n_boots,
        "Computed standardized sensitivities"
    );

    Ok(SensitivityReport::new(entries, config.output, members.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputMode;

    /// Parameter `a` decides the cluster outright, `b` is unrelated to it
    fn separable() -> (ParameterTable, Clustering) {
        let n = 60;
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64;
                let b = ((i * 37) % n) as f64 / n as f64;
                vec![a, b]
            })
            .collect();
        let params = ParameterTable::from_rows(vec!["a".into(), "b".into()], rows).unwrap();
        let labels: Vec<usize> = (0..n).map(|i| if i < n / 2 { 0 } else { 1 }).collect();
        let clustering = Clustering {
            labels,
            medoids: vec![15, 45],
            iterations: 1,
            converged: true,
            cost: 0.0,
        };
        (params, clustering)
    }

    fn quick_config() -> SensitivityConfig {
        SensitivityConfig {
            n_boots: 400,
            n_confidence_boots: 200,
            ..Default::default()
        }
    }

    #[test]
    fn test_cluster_driving_parameter_is_sensitive() {
        let (params, clustering) = separable();
        let report = dgsa(&params, &clustering, &quick_config()).unwrap();

        let a = report.get("a").unwrap();
        let b = report.get("b").unwrap();
        assert!(a.sensitivity > 1.0, "a = {}", a.sensitivity);
        assert!(a.sensitivity > b.sensitivity);
        assert_eq!(report.ranked()[0].name, "a");
        assert_eq!(a.per_cluster.len(), 2);
        assert!(a.confidence.is_some_and(|c| c >= 0.0));
    }

    #[test]
    fn test_confidence_disabled() {
        let (params, clustering) = separable();
        let config = SensitivityConfig {
            confidence: false,
            ..quick_config()
        };
        let report = dgsa(&params, &clustering, &config).unwrap();
        assert!(report.entries().iter().all(|e| e.confidence.is_none()));
    }

    #[test]
    fn test_max_output_dominates_mean() {
        let (params, clustering) = separable();
        let mean = dgsa(&params, &clustering, &quick_config()).unwrap();
        let max = dgsa(
            &params,
            &clustering,
            &SensitivityConfig {
                output: OutputMode::Max,
                ..quick_config()
            },
        )
        .unwrap();

        for (m, x) in mean.entries().iter().zip(max.entries()) {
            assert_eq!(m.per_cluster, x.per_cluster);
            assert!(x.sensitivity >= m.sensitivity);
        }
        assert_eq!(max.output_mode(), OutputMode::Max);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let (params, clustering) = separable();
        let a = dgsa(&params, &clustering, &quick_config()).unwrap();
        let b = dgsa(&params, &clustering, &quick_config()).unwrap();
        assert_eq!(a.entries(), b.entries());
    }

    #[test]
    fn test_rejects_mismatched_labels() {
        let (params, mut clustering) = separable();
        clustering.labels.pop();
        assert_eq!(
            dgsa(&params, &clustering, &quick_config()).unwrap_err(),
            SensitivityError::LabelCountMismatch {
                labels: 59,
                samples: 60
            }
        );
    }

    #[test]
    fn test_rejects_empty_and_unknown_clusters() {
        let (params, mut clustering) = separable();
        clustering.medoids.push(0);
        assert_eq!(
            dgsa(&params, &clustering, &quick_config()).unwrap_err(),
            SensitivityError::EmptyCluster(2)
        );

        let (params, mut clustering) = separable();
        clustering.labels[3] = 9;
        assert_eq!(
            dgsa(&params, &clustering, &quick_config()).unwrap_err(),
            SensitivityError::LabelOutOfRange {
                sample: 3,
                label: 9
            }
        );
    }

    #[test]
    fn test_rejects_bad_quantile() {
        let (params, clustering) = separable();
        let config = SensitivityConfig {
            quantile: 1.5,
            ..quick_config()
        };
        assert!(matches!(
            dgsa(&params, &clustering, &config),
            Err(SensitivityError::InvalidSettings(_))
        ));
    }
}
