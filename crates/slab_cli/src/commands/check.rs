//! Check command implementation
//!
//! Resolves and validates the parameters without running a simulation.

use slab_transport::SimulationConfig;
use tracing::info;

use crate::config::ParameterFile;
use crate::Result;

/// Run the check command
pub fn run(params: &ParameterFile) -> Result<SimulationConfig> {
    let config = params.to_simulation_config()?;

    info!("Parameters are valid");
    info!("  Photon packets: {}", config.n_photons());
    info!("  Maximum optical depth: {}", config.tau_max());
    info!("  Albedo: {}", config.albedo());
    info!("  Escape angle bins: {}", config.mu_bins());
    info!("  Moment levels: {}", config.n_levels());
    info!("  Seed: {}", config.seed());
    info!("  Streams: {}", config.n_streams());
    info!("  Output directory: {}", params.output_dir.display());

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;

    #[test]
    fn test_check_accepts_defaults() {
        let config = run(&ParameterFile::default()).unwrap();
        assert_eq!(config.n_photons(), 1_000_000);
    }

    #[test]
    fn test_check_rejects_bad_streams() {
        let params = ParameterFile {
            n_photons: 2,
            n_streams: 3,
            ..Default::default()
        };
        assert!(matches!(run(&params), Err(CliError::Config(_))));
    }
}
