//! Simulation driver.
//!
//! [`SlabSimulator`] runs `n_photons` independent histories and reduces them
//! into a [`SimulationResult`].
//!
//! # Streams
//!
//! Histories are split across `n_streams` random streams. Stream `k` is
//! seeded with `seed + k` (wrapping) and runs a fixed share of the
//! histories into its own [`Tally`]. With more than one stream the streams
//! run on the Rayon thread pool; the finished tallies are merged in stream
//! order, so the result depends only on the configuration and never on
//! thread scheduling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::histogram::IntensityTable;
use crate::moments::MomentTable;
use crate::rng::SlabRng;
use crate::tally::Tally;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Monte Carlo slab simulator.
///
/// # Examples
///
/// ```rust
/// use slab_transport::{SimulationConfig, SlabSimulator};
///
/// let config = SimulationConfig::builder()
///     .n_photons(2_000)
///     .tau_max(2.0)
///     .albedo(1.0)
///     .mu_bins(10)
///     .seed(7)
///     .build()
///     .unwrap();
///
/// let result = SlabSimulator::new(config).unwrap().run();
///
/// assert_eq!(result.n_escaped, 2_000);
/// assert_eq!(result.intensity.counts.iter().sum::<u64>(), 2_000);
/// ```
#[derive(Clone, Debug)]
pub struct SlabSimulator {
    config: SimulationConfig,
}

impl SlabSimulator {
    /// Creates a simulator for a configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs every history and returns the finalised result.
    pub fn run(&self) -> SimulationResult {
        let config = &self.config;
        let n_streams = config.n_streams();
        info!(
            n_photons = config.n_photons(),
            tau_max = config.tau_max(),
            albedo = config.albedo(),
            n_streams,
            "starting slab simulation"
        );

        let start = Instant::now();
        let progress = AtomicU64::new(0);

        let tallies: Vec<Tally> = if n_streams == 1 {
            vec![self.run_stream(0, &progress)]
        } else {
            (0..n_streams)
                .into_par_iter()
                .map(|index| self.run_stream(index, &progress))
                .collect()
        };

        let mut total = Tally::new(config);
        for tally in &tallies {
            total.merge(tally);
        }

        let elapsed = start.elapsed();
        let result = SimulationResult::from_tally(config.clone(), &total, elapsed);

        info!(
            escaped = result.n_escaped,
            absorbed = result.n_absorbed,
            truncated = result.n_truncated,
            total_interactions = result.total_interactions,
            average_interactions = result.average_interactions_per_photon(),
            elapsed_secs = elapsed.as_secs_f64(),
            "slab simulation complete"
        );

        result
    }

    /// Runs the share of histories assigned to stream `index`.
    fn run_stream(&self, index: usize, progress: &AtomicU64) -> Tally {
        let config = &self.config;
        let n_histories = config.stream_photons(index);
        let mut rng = SlabRng::stream(config.seed(), index);
        let mut tally = Tally::new(config);

        debug!(stream = index, seed = rng.seed(), n_histories, "stream started");

        for _ in 0..n_histories {
            tally.run_history(config, &mut rng);
            if let Some(interval) = config.progress_interval() {
                let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
                if done % interval == 0 {
                    let percent = 100.0 * done as f64 / config.n_photons() as f64;
                    info!("{} photon packets transported ({:.0}%)", done, percent);
                }
            }
        }

        tally
    }
}

/// Finalised output of a simulation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SimulationResult {
    /// Configuration the run used.
    pub config: SimulationConfig,
    /// Escape-angle table.
    pub intensity: IntensityTable,
    /// Radiation field moments, when tracked.
    pub moments: Option<MomentTable>,
    /// Histories that escaped through the top.
    pub n_escaped: u64,
    /// Histories absorbed inside the slab.
    pub n_absorbed: u64,
    /// Histories stopped by the interaction cap.
    pub n_truncated: u64,
    /// Interactions summed over every history.
    pub total_interactions: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl SimulationResult {
    fn from_tally(config: SimulationConfig, tally: &Tally, elapsed: Duration) -> Self {
        let n_photons = config.n_photons();
        Self {
            intensity: tally.histogram().finalise(n_photons),
            moments: tally.moments().map(|m| m.normalise(n_photons)),
            n_escaped: tally.n_escaped(),
            n_absorbed: tally.n_absorbed(),
            n_truncated: tally.n_truncated(),
            total_interactions: tally.total_interactions(),
            elapsed,
            config,
        }
    }

    /// Average number of interactions per history.
    pub fn average_interactions_per_photon(&self) -> f64 {
        self.total_interactions as f64 / self.config.n_photons() as f64
    }

    /// Fraction of histories that escaped.
    pub fn escape_fraction(&self) -> f64 {
        self.n_escaped as f64 / self.config.n_photons() as f64
    }
}
