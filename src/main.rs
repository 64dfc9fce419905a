//! R-metric command-line interface.
//!
//! ```sh
//! r-metric run v_6h.npz --config r_metric.toml --output out/
//! r-metric validate v_6h.npz
//! r-metric config > r_metric.toml
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use r_metric::config::{load_config, RMetricConfig};
use r_metric::io::{open_from_npz, save_metadata, save_to_npz, OutputMetadata};
use r_metric::pipeline;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "r-metric")]
#[command(about = "Rossby wave packet envelopes (R-metric) from meridional wind")]
#[command(version)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the R-metric for a (time, lat, lon) velocity archive.
    Run {
        /// Path to the .npz input archive.
        input: PathBuf,
        /// Path to a TOML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Lowest zonal wavenumber kept (overrides config file setting).
        #[arg(long)]
        kmin: Option<usize>,
        /// Highest zonal wavenumber kept (overrides config file setting).
        #[arg(long)]
        kmax: Option<usize>,
    },
    /// Check an input archive against the configuration without calculating anything.
    Validate {
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn load(config: Option<&Path>) -> Result<RMetricConfig> {
    load_config(config).with_context(|| match config {
        Some(path) => format!("loading configuration {}", path.display()),
        None => "loading default configuration".to_string(),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Run {
            input,
            config,
            output,
            kmin,
            kmax,
        } => {
            let mut job = load(config.as_deref())?;
            if let Some(kmin) = kmin {
                job.band.kmin = kmin;
            }
            if let Some(kmax) = kmax {
                job.band.kmax = kmax;
            }
            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            let field = open_from_npz(&input, &job.output.variable)
                .with_context(|| format!("opening {}", input.display()))?;
            let result = pipeline::run(&field, &job)
                .with_context(|| format!("calculating R-metric for {}", input.display()))?;

            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;
            let out_path = out_dir.join(&job.output.file_name);
            save_to_npz(&result, &out_path, job.output.fill_value)
                .with_context(|| format!("writing {}", out_path.display()))?;

            if job.output.write_metadata {
                let meta_path = out_path.with_extension("json");
                save_metadata(&OutputMetadata::new(&result, &job), &meta_path)
                    .with_context(|| format!("writing {}", meta_path.display()))?;
            }
            Ok(())
        }
        Commands::Validate { input, config } => {
            let job = load(config.as_deref())?;
            let field = open_from_npz(&input, &job.output.variable)
                .with_context(|| format!("opening {}", input.display()))?;
            match pipeline::validate(&field, &job) {
                Ok((time_steps, lon_grids)) => {
                    println!(
                        "{}: ok, up to {} time steps x {} longitudes after smoothing",
                        input.display(),
                        time_steps,
                        lon_grids
                    );
                    Ok(())
                }
                Err(err) => bail!("{}: {}", input.display(), err),
            }
        }
        Commands::Config => {
            print!("{}", RMetricConfig::default().to_toml_string()?);
            Ok(())
        }
    }
}
