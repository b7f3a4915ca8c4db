//! Settings file loading and command-line overrides

use std::path::Path;

use clap::{Args, ValueEnum};
use color_eyre::eyre::WrapErr;
use dgsa_core::{AnalysisConfig, OutputMode};

/// Parse settings from YAML. Missing fields take their defaults.
pub fn parse_config(yaml: &str) -> Result<AnalysisConfig, serde_saphyr::Error> {
    if yaml.trim().is_empty() {
        return Ok(AnalysisConfig::default());
    }
    serde_saphyr::from_str(yaml)
}

/// Load settings from `path`, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> color_eyre::Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read settings file {}", path.display()))?;
    let config = parse_config(&content)
        .wrap_err_with(|| format!("Failed to parse settings file {}", path.display()))?;

    tracing::debug!(path = %path.display(), "Loaded settings");
    Ok(config)
}

/// Default settings rendered as YAML
pub fn default_config_yaml() -> color_eyre::Result<String> {
    serde_saphyr::to_string(&AnalysisConfig::default())
        .wrap_err("Failed to serialize default settings")
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputArg {
    Mean,
    Max,
}

impl From<OutputArg> for OutputMode {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Mean => OutputMode::Mean,
            OutputArg::Max => OutputMode::Max,
        }
    }
}

/// Command-line values that take precedence over the settings file
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Number of response clusters
    #[arg(short = 'k', long)]
    pub clusters: Option<usize>,

    /// k-medoids iteration cap
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// k-medoids relative cost tolerance
    #[arg(long)]
    pub tol: Option<f64>,

    /// Bootstrap draws for the significance thresholds
    #[arg(long)]
    pub boots: Option<usize>,

    /// Skip the bootstrap confidence bounds
    #[arg(long)]
    pub no_confidence: bool,

    /// How cluster sensitivities are aggregated
    #[arg(long, value_enum)]
    pub output: Option<OutputArg>,

    /// Size of the generated sample when no input file is given
    #[arg(short = 'n', long)]
    pub samples: Option<usize>,

    /// Master random seed
    #[arg(short, long)]
    pub seed: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(k) = self.clusters {
            config.clustering.n_clusters = k;
        }
        if let Some(max_iter) = self.max_iter {
            config.clustering.max_iter = max_iter;
        }
        if let Some(tol) = self.tol {
            config.clustering.tol = tol;
        }
        if let Some(boots) = self.boots {
            config.sensitivity.n_boots = boots;
        }
        if self.no_confidence {
            config.sensitivity.confidence = false;
        }
        if let Some(output) = self.output {
            config.sensitivity.output = output.into();
        }
        if let Some(n) = self.samples {
            config.sampling.n_samples = n;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
    }
}

/// Options that only shape a generated sample and so have no effect when the
/// parameters are read from a file
pub fn sample_only_options(
    overrides: &Overrides,
    config: &AnalysisConfig,
) -> Vec<&'static str> {
    let defaults = AnalysisConfig::default();
    let mut ignored = Vec::new();
    if overrides.samples.is_some() {
        ignored.push("--samples");
    } else if config.sampling.n_samples != defaults.sampling.n_samples {
        ignored.push("sampling.n_samples");
    }
    if config.parameter_names != defaults.parameter_names {
        ignored.push("parameter_names");
    }
    ignored
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_partial_config() {
        let yaml = "seed: 7\nclustering:\n  n_clusters: 4\nsensitivity:\n  output: max\n";
        let config = parse_config(yaml).unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.clustering.n_clusters, 4);
        assert_eq!(config.sensitivity.output, OutputMode::Max);
        assert_eq!(config.clustering.max_iter, 3000);
        assert_eq!(config.sensitivity.n_boots, 3000);
        assert!(config.sensitivity.confidence);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse_config("  \n").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_default_yaml_parses_back() {
        let yaml = default_config_yaml().unwrap();
        assert_eq!(parse_config(&yaml).unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_bootstrap_seed_is_not_a_settings_key() {
        let yaml = default_config_yaml().unwrap();
        assert_eq!(yaml.matches("seed:").count(), 1);

        assert!(parse_config("sensitivity:\n  seed: 1\n").is_err());

        let config = parse_config("seed: 999\n").unwrap();
        assert_eq!(config.seeded_sensitivity().seed, 1001);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dgsa.yaml");
        std::fs::write(&path, "sampling:\n  n_samples: 50\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.sampling.n_samples, 50);
        assert_eq!(load_config(None).unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(load_config(Some(dir.path().join("absent.yaml").as_path())).is_err());
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let mut config = AnalysisConfig::default();
        let overrides = Overrides {
            clusters: Some(5),
            no_confidence: true,
            output: Some(OutputArg::Max),
            seed: Some(11),
            ..Default::default()
        };
        overrides.apply(&mut config);

        assert_eq!(config.clustering.n_clusters, 5);
        assert!(!config.sensitivity.confidence);
        assert_eq!(config.sensitivity.output, OutputMode::Max);
        assert_eq!(config.seed, 11);
        assert_eq!(config.clustering.tol, 1e-4);
        assert_eq!(config.sampling.n_samples, 200);
    }

    #[test]
    fn test_sample_only_options() {
        let config = AnalysisConfig::default();
        assert!(sample_only_options(&Overrides::default(), &config).is_empty());

        let overrides = Overrides {
            samples: Some(50),
            ..Default::default()
        };
        let config = parse_config("parameter_names: [a, b, c, d, e]\n").unwrap();
        assert_eq!(
            sample_only_options(&overrides, &config),
            vec!["--samples", "parameter_names"]
        );

        let config = parse_config("sampling:\n  n_samples: 80\n").unwrap();
        assert_eq!(
            sample_only_options(&Overrides::default(), &config),
            vec!["sampling.n_samples"]
        );
    }
}
