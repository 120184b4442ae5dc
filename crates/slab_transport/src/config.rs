//! Simulation configuration.
//!
//! This module provides the immutable configuration consumed by the
//! transport engine and a builder that validates it at build time. The
//! configuration is constructed once and passed by reference to the
//! simulator, the transport loop and the accumulators; there is no
//! process-wide state.

use super::error::ConfigError;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Maximum number of photon histories allowed in a single run.
pub const MAX_PHOTONS: u64 = 1_000_000_000;

/// Maximum number of escape-angle bins.
pub const MAX_MU_BINS: usize = 1_000_000;

/// Maximum number of moment levels.
pub const MAX_LEVELS: usize = 1_000_000;

/// Default number of escape-angle bins.
pub const DEFAULT_MU_BINS: usize = 30;

/// Default number of photon histories.
pub const DEFAULT_N_PHOTONS: u64 = 1_000_000;

/// Default number of moment levels (the accumulators hold `n_levels + 1` entries).
pub const DEFAULT_N_LEVELS: usize = 10;

/// Default progress reporting interval, in histories.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// Default maximum optical depth of the slab.
pub const DEFAULT_TAU_MAX: f64 = 5.0;

/// Default single-scattering albedo.
pub const DEFAULT_ALBEDO: f64 = 1.0;

/// Default seed.
pub const DEFAULT_SEED: u64 = 1337;

/// Slab simulation configuration.
///
/// Immutable configuration specifying the physical problem and how the
/// histories are scheduled. Use [`SimulationConfigBuilder`] to construct
/// instances.
///
/// # Examples
///
/// ```rust
/// use slab_transport::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .n_photons(10_000)
///     .tau_max(7.0)
///     .albedo(1.0)
///     .mu_bins(10)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_photons(), 10_000);
/// assert_eq!(config.mu_bins(), 10);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SimulationConfig {
    /// Number of photon histories.
    n_photons: u64,
    /// Maximum optical depth of the slab.
    tau_max: f64,
    /// Probability that an interaction is a scatter.
    albedo: f64,
    /// Number of escape-angle bins.
    mu_bins: usize,
    /// Number of moment levels.
    n_levels: usize,
    /// Base seed; stream `k` is seeded with `seed + k`.
    seed: u64,
    /// Whether J, H and K moments are accumulated.
    track_moments: bool,
    /// Number of independent random streams the histories are split across.
    n_streams: usize,
    /// Histories between progress reports.
    progress_interval: Option<u64>,
    /// Safety cap on interactions per history.
    max_interactions: Option<u64>,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the number of photon histories.
    #[inline]
    pub fn n_photons(&self) -> u64 {
        self.n_photons
    }

    /// Returns the maximum optical depth of the slab.
    #[inline]
    pub fn tau_max(&self) -> f64 {
        self.tau_max
    }

    /// Returns the single-scattering albedo.
    #[inline]
    pub fn albedo(&self) -> f64 {
        self.albedo
    }

    /// Returns the number of escape-angle bins.
    #[inline]
    pub fn mu_bins(&self) -> usize {
        self.mu_bins
    }

    /// Returns the number of moment levels.
    #[inline]
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    /// Returns the base seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns whether the radiation field moments are tracked.
    #[inline]
    pub fn track_moments(&self) -> bool {
        self.track_moments
    }

    /// Returns the number of independent random streams.
    #[inline]
    pub fn n_streams(&self) -> usize {
        self.n_streams
    }

    /// Returns the progress reporting interval, if any.
    #[inline]
    pub fn progress_interval(&self) -> Option<u64> {
        self.progress_interval
    }

    /// Returns the per-history interaction cap, if any.
    #[inline]
    pub fn max_interactions(&self) -> Option<u64> {
        self.max_interactions
    }

    /// Number of histories assigned to stream `index`.
    ///
    /// Histories are shared out as evenly as possible; the first
    /// `n_photons % n_streams` streams take one extra history.
    #[inline]
    pub fn stream_photons(&self, index: usize) -> u64 {
        let n_streams = self.n_streams as u64;
        let base = self.n_photons / n_streams;
        let extra = u64::from((index as u64) < self.n_photons % n_streams);
        base + extra
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_photons` is 0 or greater than 1,000,000,000
    /// - `tau_max` is not finite or not positive
    /// - `albedo` is not finite or outside [0, 1]
    /// - `mu_bins` is 0 or greater than 1,000,000
    /// - `n_levels` is greater than 1,000,000
    /// - `n_streams` is 0 or greater than `n_photons`
    /// - `progress_interval` or `max_interactions` is `Some(0)`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_photons == 0 || self.n_photons > MAX_PHOTONS {
            return Err(ConfigError::InvalidPhotonCount(self.n_photons));
        }
        if !self.tau_max.is_finite() || self.tau_max <= 0.0 {
            return Err(ConfigError::InvalidOpticalDepth(self.tau_max));
        }
        if !(0.0..=1.0).contains(&self.albedo) {
            return Err(ConfigError::InvalidAlbedo(self.albedo));
        }
        if self.mu_bins == 0 || self.mu_bins > MAX_MU_BINS {
            return Err(ConfigError::InvalidBinCount(self.mu_bins));
        }
        if self.n_levels > MAX_LEVELS {
            return Err(ConfigError::InvalidLevelCount(self.n_levels));
        }
        if self.n_streams == 0 || self.n_streams as u64 > self.n_photons {
            return Err(ConfigError::InvalidStreamCount {
                streams: self.n_streams,
                n_photons: self.n_photons,
            });
        }
        if self.progress_interval == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "progress_interval",
                value: "must be positive when set".to_string(),
            });
        }
        if self.max_interactions == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_interactions",
                value: "must be positive when set".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// `n_photons` and `tau_max` must be given explicitly; every other field
/// falls back to the default parameter table.
///
/// # Examples
///
/// ```rust
/// use slab_transport::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .n_photons(50_000)
///     .tau_max(5.0)
///     .albedo(0.9)
///     .n_levels(20)
///     .n_streams(4)
///     .build()
///     .expect("valid config");
///
/// assert_eq!(config.n_streams(), 4);
/// assert!(config.track_moments());
/// ```
#[derive(Clone, Debug)]
pub struct SimulationConfigBuilder {
    n_photons: Option<u64>,
    tau_max: Option<f64>,
    albedo: f64,
    mu_bins: usize,
    n_levels: usize,
    seed: u64,
    track_moments: bool,
    n_streams: usize,
    progress_interval: Option<u64>,
    max_interactions: Option<u64>,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self {
            n_photons: None,
            tau_max: None,
            albedo: DEFAULT_ALBEDO,
            mu_bins: DEFAULT_MU_BINS,
            n_levels: DEFAULT_N_LEVELS,
            seed: DEFAULT_SEED,
            track_moments: true,
            n_streams: 1,
            progress_interval: None,
            max_interactions: None,
        }
    }
}

impl SimulationConfigBuilder {
    /// Sets the number of photon histories.
    #[inline]
    pub fn n_photons(mut self, n_photons: u64) -> Self {
        self.n_photons = Some(n_photons);
        self
    }

    /// Sets the maximum optical depth of the slab.
    #[inline]
    pub fn tau_max(mut self, tau_max: f64) -> Self {
        self.tau_max = Some(tau_max);
        self
    }

    /// Sets the single-scattering albedo, in [0, 1].
    #[inline]
    pub fn albedo(mut self, albedo: f64) -> Self {
        self.albedo = albedo;
        self
    }

    /// Sets the number of escape-angle bins.
    #[inline]
    pub fn mu_bins(mut self, mu_bins: usize) -> Self {
        self.mu_bins = mu_bins;
        self
    }

    /// Sets the number of moment levels.
    #[inline]
    pub fn n_levels(mut self, n_levels: usize) -> Self {
        self.n_levels = n_levels;
        self
    }

    /// Sets the base seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables moment tracking.
    #[inline]
    pub fn track_moments(mut self, track_moments: bool) -> Self {
        self.track_moments = track_moments;
        self
    }

    /// Sets the number of independent random streams.
    ///
    /// Results depend on this value, not on the number of threads that
    /// end up executing the streams.
    #[inline]
    pub fn n_streams(mut self, n_streams: usize) -> Self {
        self.n_streams = n_streams;
        self
    }

    /// Sets the progress reporting interval, in histories.
    #[inline]
    pub fn progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    /// Caps the number of interactions a single history may take.
    #[inline]
    pub fn max_interactions(mut self, max_interactions: u64) -> Self {
        self.max_interactions = Some(max_interactions);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n_photons` or `tau_max` is not set, or if
    /// [`SimulationConfig::validate`] rejects the values.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let n_photons = self.n_photons.ok_or(ConfigError::InvalidParameter {
            name: "n_photons",
            value: "must be specified".to_string(),
        })?;

        let tau_max = self.tau_max.ok_or(ConfigError::InvalidParameter {
            name: "tau_max",
            value: "must be specified".to_string(),
        })?;

        let config = SimulationConfig {
            n_photons,
            tau_max,
            albedo: self.albedo,
            mu_bins: self.mu_bins,
            n_levels: self.n_levels,
            seed: self.seed,
            track_moments: self.track_moments,
            n_streams: self.n_streams,
            progress_interval: self.progress_interval,
            max_interactions: self.max_interactions,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SimulationConfigBuilder {
        SimulationConfig::builder().n_photons(1000).tau_max(5.0)
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = base().build().unwrap();

        assert_eq!(config.n_photons(), 1000);
        assert_eq!(config.tau_max(), 5.0);
        assert_eq!(config.albedo(), DEFAULT_ALBEDO);
        assert_eq!(config.mu_bins(), DEFAULT_MU_BINS);
        assert_eq!(config.n_levels(), DEFAULT_N_LEVELS);
        assert_eq!(config.seed(), DEFAULT_SEED);
        assert!(config.track_moments());
        assert_eq!(config.n_streams(), 1);
        assert_eq!(config.progress_interval(), None);
        assert_eq!(config.max_interactions(), None);
    }

    #[test]
    fn test_config_invalid_zero_photons() {
        let result = base().n_photons(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidPhotonCount(0))));
    }

    #[test]
    fn test_config_invalid_too_many_photons() {
        let result = base().n_photons(MAX_PHOTONS + 1).build();
        assert!(matches!(result, Err(ConfigError::InvalidPhotonCount(_))));
    }

    #[test]
    fn test_config_invalid_tau_max() {
        for tau in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = base().tau_max(tau).build();
            assert!(matches!(result, Err(ConfigError::InvalidOpticalDepth(_))));
        }
    }

    #[test]
    fn test_config_albedo_bounds() {
        assert!(base().albedo(0.0).build().is_ok());
        assert!(base().albedo(1.0).build().is_ok());

        for albedo in [-0.1, 1.1, f64::NAN] {
            let result = base().albedo(albedo).build();
            assert!(matches!(result, Err(ConfigError::InvalidAlbedo(_))));
        }
    }

    #[test]
    fn test_config_invalid_zero_bins() {
        let result = base().mu_bins(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidBinCount(0))));
    }

    #[test]
    fn test_config_invalid_too_many_bins() {
        assert!(base().mu_bins(MAX_MU_BINS).build().is_ok());

        for bins in [MAX_MU_BINS + 1, usize::MAX] {
            let result = base().mu_bins(bins).build();
            assert!(matches!(result, Err(ConfigError::InvalidBinCount(b)) if b == bins));
        }
    }

    #[test]
    fn test_config_invalid_too_many_levels() {
        assert!(base().n_levels(MAX_LEVELS).build().is_ok());

        for levels in [MAX_LEVELS + 1, usize::MAX] {
            let result = base().n_levels(levels).build();
            assert!(matches!(result, Err(ConfigError::InvalidLevelCount(l)) if l == levels));
        }
    }

    #[test]
    fn test_config_zero_levels_allowed() {
        let config = base().n_levels(0).build().unwrap();
        assert_eq!(config.n_levels(), 0);
    }

    #[test]
    fn test_config_invalid_streams() {
        let result = base().n_streams(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidStreamCount { streams: 0, .. })
        ));

        let result = base().n_photons(3).n_streams(4).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidStreamCount {
                streams: 4,
                n_photons: 3
            })
        ));
    }

    #[test]
    fn test_config_zero_intervals_rejected() {
        let result = base().progress_interval(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "progress_interval",
                ..
            })
        ));

        let result = base().max_interactions(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "max_interactions",
                ..
            })
        ));
    }

    #[test]
    fn test_config_missing_photons() {
        let result = SimulationConfig::builder().tau_max(5.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "n_photons",
                ..
            })
        ));
    }

    #[test]
    fn test_config_missing_tau_max() {
        let result = SimulationConfig::builder().n_photons(10).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "tau_max",
                ..
            })
        ));
    }

    #[test]
    fn test_stream_photons_partition() {
        let config = base().n_photons(10).n_streams(4).build().unwrap();
        let shares: Vec<u64> = (0..4).map(|k| config.stream_photons(k)).collect();

        assert_eq!(shares, vec![3, 3, 2, 2]);
        assert_eq!(shares.iter().sum::<u64>(), 10);
    }
}
