//! Run command implementation
//!
//! Runs a slab simulation and writes the result files.

use std::time::Duration;

use slab_transport::{SimulationResult, SlabSimulator};
use tracing::info;

use crate::config::ParameterFile;
use crate::output::{write_results, OutputFormat};
use crate::Result;

/// Run the simulation command
pub fn run(params: &ParameterFile, format: OutputFormat) -> Result<SimulationResult> {
    let config = params.to_simulation_config()?;
    let simulator = SlabSimulator::new(config)?;

    info!("Starting slab simulation...");
    let result = simulator.run();

    info!("Simulation complete");
    info!("  Escaped packets: {}", result.n_escaped);
    info!("  Absorbed packets: {}", result.n_absorbed);
    if result.n_truncated > 0 {
        info!("  Truncated packets: {}", result.n_truncated);
    }
    info!("  Total interactions: {}", result.total_interactions);
    info!(
        "  Average interactions per packet: {:.2}",
        result.average_interactions_per_photon()
    );
    info!("  Run time: {}", format_elapsed(result.elapsed));

    write_results(&result, &params.output_dir, format)?;
    Ok(result)
}

/// Formats a wall-clock duration as `HH:MM:SS.sss`.
fn format_elapsed(elapsed: Duration) -> String {
    let elapsed =
        chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero());
    let millis = elapsed.num_milliseconds() % 60_000;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        elapsed.num_hours(),
        elapsed.num_minutes() % 60,
        millis / 1000,
        millis % 1000
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{INTENSITY_FILE, JSON_FILE, MOMENTS_FILE, PARAMS_FILE};

    fn params(output_dir: &std::path::Path) -> ParameterFile {
        ParameterFile {
            n_photons: 1_000,
            tau_max: 3.0,
            albedo: 1.0,
            mu_bins: 10,
            output_dir: output_dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_writes_tables() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(&params(dir.path()), OutputFormat::Tsv).unwrap();

        assert_eq!(result.n_escaped, 1_000);
        assert!(dir.path().join(INTENSITY_FILE).exists());
        assert!(dir.path().join(MOMENTS_FILE).exists());
        assert!(dir.path().join(PARAMS_FILE).exists());
    }

    #[test]
    fn test_run_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        run(&params(dir.path()), OutputFormat::Json).unwrap();

        assert!(dir.path().join(JSON_FILE).exists());
        assert!(!dir.path().join(INTENSITY_FILE).exists());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(500)), "00:00:00.500");
        assert_eq!(format_elapsed(Duration::from_millis(3_725_250)), "01:02:05.250");
        // Hours are not wrapped at a day.
        assert_eq!(format_elapsed(Duration::from_millis(90_061_500)), "25:01:01.500");
        // Sub-millisecond remainders are dropped.
        assert_eq!(format_elapsed(Duration::from_micros(59_999_999)), "00:00:59.999");
    }
}
