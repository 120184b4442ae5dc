//! Slab CLI - Monte Carlo radiative transfer through a scattering slab
//!
//! # Commands
//!
//! - `slab run` - Run a simulation and write the result tables
//! - `slab check` - Validate the resolved parameters
//! - `slab defaults` - Print the default parameter file
//!
//! Parameters come from a TOML file (`slab.toml` unless `--config` is
//! given), then `SLAB_*` environment variables, then command line flags.
//! `RUST_LOG` takes precedence over the configured `log_level`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use config::{ParameterOverrides, DEFAULT_PARAMETER_FILE};
use output::OutputFormat;

/// Monte Carlo radiative transfer through a plane-parallel slab
#[derive(Parser)]
#[command(name = "slab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run {
        /// Parameter file path
        #[arg(short, long, default_value = DEFAULT_PARAMETER_FILE)]
        config: PathBuf,

        #[command(flatten)]
        overrides: ParameterOverrides,

        /// Output format
        #[arg(short, long, value_enum, default_value = "tsv")]
        format: OutputFormat,
    },

    /// Validate the parameters without running
    Check {
        /// Parameter file path
        #[arg(short, long, default_value = DEFAULT_PARAMETER_FILE)]
        config: PathBuf,

        #[command(flatten)]
        overrides: ParameterOverrides,
    },

    /// Print the default parameter file
    Defaults,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            overrides,
            format,
        } => {
            let (params, source) = commands::resolve_parameters(&config, &overrides)?;
            init_tracing(&params.log_level);
            commands::report_source(&source);
            commands::run::run(&params, format)?;
        }
        Commands::Check { config, overrides } => {
            let (params, source) = commands::resolve_parameters(&config, &overrides)?;
            init_tracing(&params.log_level);
            commands::report_source(&source);
            commands::check::run(&params)?;
        }
        Commands::Defaults => commands::defaults::run()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::parse_from([
            "slab",
            "run",
            "--photons",
            "5000",
            "--tau-max",
            "7",
            "--albedo",
            "0.5",
            "--streams",
            "4",
            "--no-moments",
            "--format",
            "json",
        ]);

        match cli.command {
            Commands::Run {
                config,
                overrides,
                format,
            } => {
                assert_eq!(config, PathBuf::from("slab.toml"));
                assert_eq!(overrides.n_photons, Some(5000));
                assert_eq!(overrides.tau_max, Some(7.0));
                assert_eq!(overrides.albedo, Some(0.5));
                assert_eq!(overrides.n_streams, Some(4));
                assert!(overrides.no_moments);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_check_with_config() {
        let cli = Cli::parse_from(["slab", "check", "--config", "params.toml"]);
        assert!(matches!(
            cli.command,
            Commands::Check { ref config, .. } if config == &PathBuf::from("params.toml")
        ));
    }
}
