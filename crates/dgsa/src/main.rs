use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use dgsa::chart::{DEFAULT_SIZE, render_pareto_svg};
use dgsa::init_logging;
use dgsa::report::{render_cluster_summary, render_json, render_table};
use dgsa::settings::{Overrides, default_config_yaml, load_config, sample_only_options};
use dgsa::util::io::{atomic_write, atomic_write_bytes};
use dgsa_core::io::{load_parameters, parameters_to_npy, parameters_to_text};
use dgsa_core::{AnalysisConfig, ParameterTable, latin_hypercube, run_analysis};

#[derive(Parser, Debug)]
#[command(name = "dgsa")]
#[command(about = "Distance-based global sensitivity analysis")]
struct Cli {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Write logs to dgsa.log in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the analysis and print the ranked sensitivities
    Run {
        /// Parameter file (.npy or text); a Latin hypercube sample is generated when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// YAML settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Where to write the Pareto chart
        #[arg(long, default_value = "pareto.svg")]
        chart: PathBuf,

        /// Print JSON instead of the table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Write a Latin hypercube parameter sample
    Sample {
        /// Output file; `.npy` writes NumPy format, anything else text
        #[arg(short, long)]
        out: PathBuf,

        /// YAML settings file supplying parameter names and defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short = 'n', long)]
        samples: Option<usize>,

        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Print the default settings as YAML
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn generate_sample(config: &AnalysisConfig) -> color_eyre::Result<ParameterTable> {
    let table = latin_hypercube(
        config.sampling.n_samples,
        &config.parameter_names,
        config.seed,
    )
    .wrap_err("Failed to generate Latin hypercube sample")?;
    tracing::info!(
        samples = table.len(),
        params = table.n_params(),
        seed = config.seed,
        "Generated Latin hypercube sample"
    );
    Ok(table)
}

fn run(
    input: Option<&Path>,
    config_path: Option<&Path>,
    chart_path: &Path,
    json: bool,
    overrides: &Overrides,
) -> color_eyre::Result<()> {
    let mut config = load_config(config_path)?;
    overrides.apply(&mut config);

    let params = match input {
        Some(path) => {
            let ignored = sample_only_options(overrides, &config);
            if !ignored.is_empty() {
                tracing::warn!(
                    options = ?ignored,
                    input = %path.display(),
                    "Options for generated samples are ignored when reading an input file"
                );
            }
            load_parameters(path, None)
                .wrap_err_with(|| format!("Failed to load parameters from {}", path.display()))?
        }
        None => generate_sample(&config)?,
    };

    let result = run_analysis(&params, &config).wrap_err("Analysis failed")?;

    if json {
        println!("{}", render_json(&result)?);
    } else {
        print!("{}", render_table(&result.report));
        println!();
        print!("{}", render_cluster_summary(&result.clustering));
    }

    let svg = render_pareto_svg(&result.report, DEFAULT_SIZE)?;
    atomic_write(chart_path, &svg)
        .wrap_err_with(|| format!("Failed to write chart to {}", chart_path.display()))?;
    tracing::info!(path = %chart_path.display(), "Wrote Pareto chart");

    Ok(())
}

fn sample(
    out: &Path,
    config_path: Option<&Path>,
    samples: Option<usize>,
    seed: Option<u64>,
) -> color_eyre::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(n) = samples {
        config.sampling.n_samples = n;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let table = generate_sample(&config)?;
    let is_npy = out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("npy"));
    let written = if is_npy {
        atomic_write_bytes(out, &parameters_to_npy(&table))
    } else {
        atomic_write(out, &parameters_to_text(&table))
    };
    written.wrap_err_with(|| format!("Failed to write sample to {}", out.display()))?;

    tracing::info!(path = %out.display(), "Wrote parameter sample");
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.log_dir.as_deref(), &cli.log_level)?;

    match cli.command {
        Command::Run {
            input,
            config,
            chart,
            json,
            overrides,
        } => run(
            input.as_deref(),
            config.as_deref(),
            &chart,
            json,
            &overrides,
        ),
        Command::Sample {
            out,
            config,
            samples,
            seed,
        } => sample(&out, config.as_deref(), samples, seed),
        Command::Config { out } => {
            let yaml = default_config_yaml()?;
            match out {
                Some(path) => atomic_write(&path, &yaml)
                    .wrap_err_with(|| format!("Failed to write settings to {}", path.display())),
                None => {
                    print!("{yaml}");
                    Ok(())
                }
            }
        }
    }
}
