//! Parameter file management.
//!
//! Simulation parameters are resolved in three layers, later layers winning:
//!
//! 1. the TOML parameter file (or the default table when it is missing)
//! 2. `SLAB_*` environment variables
//! 3. command line flags
//!
//! The resolved [`ParameterFile`] is turned into a validated
//! [`SimulationConfig`] by [`ParameterFile::to_simulation_config`].

use std::path::{Path, PathBuf};

use clap::Args;
use serde::{Deserialize, Serialize};
use slab_transport::config::{
    DEFAULT_ALBEDO, DEFAULT_MU_BINS, DEFAULT_N_LEVELS, DEFAULT_N_PHOTONS,
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_SEED, DEFAULT_TAU_MAX,
};
use slab_transport::SimulationConfig;

use crate::{CliError, Result};

/// Parameter file read when `--config` is not given.
pub const DEFAULT_PARAMETER_FILE: &str = "slab.toml";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Simulation parameter file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterFile {
    /// Number of photon packets
    pub n_photons: u64,
    /// Maximum optical depth of the slab
    pub tau_max: f64,
    /// Single-scattering albedo
    pub albedo: f64,
    /// Number of escape angle bins
    pub mu_bins: usize,
    /// Number of moment levels
    pub n_levels: usize,
    /// Base seed
    pub seed: u64,
    /// Packets between progress reports
    pub output_freq: u64,
    /// Accumulate J, H and K moments
    pub track_moments: bool,
    /// Number of independent random streams
    pub n_streams: usize,
    /// Optional cap on interactions per packet
    pub max_interactions: Option<u64>,
    /// Directory the result files are written to
    pub output_dir: PathBuf,
    /// Log level
    pub log_level: String,
}

impl Default for ParameterFile {
    fn default() -> Self {
        Self {
            n_photons: DEFAULT_N_PHOTONS,
            tau_max: DEFAULT_TAU_MAX,
            albedo: DEFAULT_ALBEDO,
            mu_bins: DEFAULT_MU_BINS,
            n_levels: DEFAULT_N_LEVELS,
            seed: DEFAULT_SEED,
            output_freq: DEFAULT_PROGRESS_INTERVAL,
            track_moments: true,
            n_streams: 1,
            max_interactions: None,
            output_dir: PathBuf::from("."),
            log_level: "info".to_string(),
        }
    }
}

/// Where the parameters were loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterSource {
    /// Read from this file.
    File(PathBuf),
    /// The file at this path does not exist; defaults were used.
    Missing(PathBuf),
}

/// Command line overrides for the parameter file.
#[derive(Debug, Clone, Default, Args)]
pub struct ParameterOverrides {
    /// Number of photon packets
    #[arg(short = 'n', long = "photons")]
    pub n_photons: Option<u64>,

    /// Maximum optical depth of the slab
    #[arg(short = 't', long)]
    pub tau_max: Option<f64>,

    /// Single-scattering albedo, in [0, 1]
    #[arg(short, long)]
    pub albedo: Option<f64>,

    /// Number of escape angle bins
    #[arg(short, long)]
    pub mu_bins: Option<usize>,

    /// Number of moment levels
    #[arg(short = 'l', long = "levels")]
    pub n_levels: Option<usize>,

    /// Base seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of independent random streams
    #[arg(long = "streams")]
    pub n_streams: Option<usize>,

    /// Cap on interactions per packet
    #[arg(long)]
    pub max_interactions: Option<u64>,

    /// Output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Skip the J, H and K moments
    #[arg(long)]
    pub no_moments: bool,
}

impl ParameterFile {
    /// Load parameters from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ParameterRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).map_err(|source| CliError::ParameterParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse parameters from TOML text
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load parameters from `path`, falling back to defaults if it does not exist
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(path: &Path) -> Result<(Self, ParameterSource)> {
        if path.exists() {
            Ok((Self::load(path)?, ParameterSource::File(path.to_path_buf())))
        } else {
            Ok((Self::default(), ParameterSource::Missing(path.to_path_buf())))
        }
    }

    /// Apply `SLAB_*` environment variable overrides
    pub fn with_env_override(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            name: &'static str,
        ) -> Result<Option<T>> {
            match lookup(name) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| CliError::Environment { name, value }),
                None => Ok(None),
            }
        }

        if let Some(v) = parsed(&lookup, "SLAB_N_PHOTONS")? {
            self.n_photons = v;
        }
        if let Some(v) = parsed(&lookup, "SLAB_TAU_MAX")? {
            self.tau_max = v;
        }
        if let Some(v) = parsed(&lookup, "SLAB_ALBEDO")? {
            self.albedo = v;
        }
        if let Some(v) = parsed(&lookup, "SLAB_MU_BINS")? {
            self.mu_bins = v;
        }
        if let Some(v) = parsed(&lookup, "SLAB_N_LEVELS")? {
            self.n_levels = v;
        }
        if let Some(v) = parsed(&lookup, "SLAB_SEED")? {
            self.seed = v;
        }
        if let Some(v) = parsed(&lookup, "SLAB_OUTPUT_FREQ")? {
            self.output_freq = v;
        }
        if let Some(v) = parsed(&lookup, "SLAB_N_STREAMS")? {
            self.n_streams = v;
        }
        if let Some(v) = parsed(&lookup, "SLAB_MAX_INTERACTIONS")? {
            self.max_interactions = Some(v);
        }
        if let Some(v) = parsed(&lookup, "SLAB_TRACK_MOMENTS")? {
            self.track_moments = v;
        }
        if let Some(dir) = lookup("SLAB_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup("SLAB_LOG_LEVEL") {
            self.log_level = level;
        }

        Ok(self)
    }

    /// Apply command line overrides
    pub fn with_cli_overrides(mut self, overrides: &ParameterOverrides) -> Self {
        if let Some(v) = overrides.n_photons {
            self.n_photons = v;
        }
        if let Some(v) = overrides.tau_max {
            self.tau_max = v;
        }
        if let Some(v) = overrides.albedo {
            self.albedo = v;
        }
        if let Some(v) = overrides.mu_bins {
            self.mu_bins = v;
        }
        if let Some(v) = overrides.n_levels {
            self.n_levels = v;
        }
        if let Some(v) = overrides.seed {
            self.seed = v;
        }
        if let Some(v) = overrides.n_streams {
            self.n_streams = v;
        }
        if let Some(v) = overrides.max_interactions {
            self.max_interactions = Some(v);
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = dir.clone();
        }
        if overrides.no_moments {
            self.track_moments = false;
        }
        self
    }

    /// Validate the settings the engine does not check itself
    pub fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(CliError::InvalidArgument(format!(
                "log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(CliError::InvalidArgument(
                "output_dir cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the validated engine configuration
    pub fn to_simulation_config(&self) -> Result<SimulationConfig> {
        self.validate()?;

        let mut builder = SimulationConfig::builder()
            .n_photons(self.n_photons)
            .tau_max(self.tau_max)
            .albedo(self.albedo)
            .mu_bins(self.mu_bins)
            .n_levels(self.n_levels)
            .seed(self.seed)
            .track_moments(self.track_moments)
            .n_streams(self.n_streams)
            .progress_interval(self.output_freq);
        if let Some(cap) = self.max_interactions {
            builder = builder.max_interactions(cap);
        }

        Ok(builder.build()?)
    }

    /// Render the parameters as a TOML document
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
