//! Error types for the slab CLI.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the CLI.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Simulation parameters rejected by the engine
    #[error("Configuration error: {0}")]
    Config(#[from] slab_transport::ConfigError),

    /// Parameter file could not be read
    #[error("Cannot read parameter file {path}: {source}")]
    ParameterRead {
        /// Path of the parameter file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Parameter file is not valid TOML or has unknown keys
    #[error("Cannot parse parameter file {path}: {source}")]
    ParameterParse {
        /// Path of the parameter file.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// Environment override could not be parsed
    #[error("Invalid value '{value}' for environment variable {name}")]
    Environment {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// Parameter file validation failed
    #[error("Invalid parameter: {0}")]
    InvalidArgument(String),

    /// Default parameter file could not be rendered
    #[error("Cannot render parameter file: {0}")]
    Render(#[from] toml::ser::Error),

    /// IO error while writing results
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tabular output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: CliError = slab_transport::ConfigError::InvalidAlbedo(2.0).into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("albedo"));
    }

    #[test]
    fn test_environment_error_display() {
        let err = CliError::Environment {
            name: "SLAB_SEED",
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'abc' for environment variable SLAB_SEED"
        );
    }
}
