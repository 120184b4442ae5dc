//! Error types for the slab transport engine.
//!
//! Only configuration can fail. Everything that happens once histories are
//! running (re-entry below the slab, horizontal moment crossings, very long
//! scattering chains) is ordinary control flow and never surfaces as an error.

use thiserror::Error;

/// Configuration error for the slab simulator.
///
/// These errors occur during construction, before any photon history is
/// transported, and are fatal to the run.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Photon count outside valid range [1, 1_000_000_000].
    #[error("Invalid photon count {0}: must be in range [1, 1_000_000_000]")]
    InvalidPhotonCount(u64),

    /// Maximum optical depth must be finite and strictly positive.
    #[error("Invalid maximum optical depth {0}: must be finite and positive")]
    InvalidOpticalDepth(f64),

    /// Albedo must lie in the closed interval [0, 1].
    #[error("Invalid albedo {0}: must be in range [0, 1]")]
    InvalidAlbedo(f64),

    /// Escape-angle bin count outside valid range [1, 1_000_000].
    #[error("Invalid escape angle bin count {0}: must be in range [1, 1_000_000]")]
    InvalidBinCount(usize),

    /// Moment level count above 1_000_000.
    #[error("Invalid moment level count {0}: must be at most 1_000_000")]
    InvalidLevelCount(usize),

    /// Stream count must be at least one and no larger than the photon count.
    #[error("Invalid stream count {streams}: must be in range [1, {n_photons}]")]
    InvalidStreamCount {
        /// Requested number of streams.
        streams: usize,
        /// Number of photon histories to be shared out.
        n_photons: u64,
    },

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidPhotonCount(0);
        assert!(err.to_string().contains("Invalid photon count 0"));

        let err = ConfigError::InvalidAlbedo(1.5);
        assert!(err.to_string().contains("1.5"));

        let err = ConfigError::InvalidBinCount(0);
        assert!(err.to_string().contains("[1, 1_000_000]"));

        let err = ConfigError::InvalidLevelCount(usize::MAX);
        assert!(err.to_string().contains("moment level count"));

        let err = ConfigError::InvalidStreamCount {
            streams: 8,
            n_photons: 4,
        };
        assert!(err.to_string().contains("[1, 4]"));

        let err = ConfigError::InvalidParameter {
            name: "progress_interval",
            value: "must be positive".to_string(),
        };
        assert!(err.to_string().contains("progress_interval"));
    }
}
