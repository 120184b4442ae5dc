//! Result file writers.
//!
//! Tables are tab-separated with six decimal places:
//!
//! - `binned_intens.txt`: `theta`, `counts`, `intensity`
//! - `moments.txt`: `level` and the six moment columns (when tracked)
//! - `sim_params.txt`: the resolved parameters and a timestamp
//!
//! With [`OutputFormat::Json`] the whole result goes to `results.json`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use slab_transport::{IntensityTable, MomentTable, SimulationConfig, SimulationResult};
use tracing::info;

use crate::Result;

/// Escape-angle table file name.
pub const INTENSITY_FILE: &str = "binned_intens.txt";
/// Moments table file name.
pub const MOMENTS_FILE: &str = "moments.txt";
/// Parameter record file name.
pub const PARAMS_FILE: &str = "sim_params.txt";
/// JSON result file name.
pub const JSON_FILE: &str = "results.json";

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated tables
    #[default]
    Tsv,
    /// Single JSON document
    Json,
}

/// Writes a simulation result to `output_dir`, returning the files written.
pub fn write_results(
    result: &SimulationResult,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let written = match format {
        OutputFormat::Tsv => {
            let mut written = vec![
                write_intensity(&result.intensity, &output_dir.join(INTENSITY_FILE))?,
            ];
            if let Some(moments) = &result.moments {
                written.push(write_moments(moments, &output_dir.join(MOMENTS_FILE))?);
            }
            written.push(write_params(&result.config, &output_dir.join(PARAMS_FILE))?);
            written
        }
        OutputFormat::Json => vec![write_json(result, &output_dir.join(JSON_FILE))?],
    };

    for path in &written {
        info!(path = %path.display(), "result file written");
    }

    Ok(written)
}

fn tsv_writer(path: &Path) -> Result<csv::Writer<File>> {
    Ok(csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?)
}

fn fixed(value: f64) -> String {
    format!("{:.6}", value)
}

/// Writes the escape-angle table.
pub fn write_intensity(table: &IntensityTable, path: &Path) -> Result<PathBuf> {
    let mut writer = tsv_writer(path)?;
    writer.write_record(["theta", "counts", "intensity"])?;
    for (theta, count, intensity) in table.rows() {
        writer.write_record([fixed(theta), count.to_string(), fixed(intensity)])?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

/// Writes the moments table.
pub fn write_moments(table: &MomentTable, path: &Path) -> Result<PathBuf> {
    let mut writer = tsv_writer(path)?;
    writer.write_record([
        "level", "j_plus", "j_minus", "h_plus", "h_minus", "k_plus", "k_minus",
    ])?;
    for (i, level) in table.levels.iter().enumerate() {
        writer.write_record([
            level.to_string(),
            fixed(table.j_plus[i]),
            fixed(table.j_minus[i]),
            fixed(table.h_plus[i]),
            fixed(table.h_minus[i]),
            fixed(table.k_plus[i]),
            fixed(table.k_minus[i]),
        ])?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

/// Writes the parameter record.
pub fn write_params(config: &SimulationConfig, path: &Path) -> Result<PathBuf> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "# -------------")?;
    writeln!(file, "# Parameters:")?;
    writeln!(file, "# -------------")?;
    writeln!(file)?;
    writeln!(file, "N_PHOTONS        :: {}", config.n_photons())?;
    writeln!(file, "MU_BINS          :: {}", config.mu_bins())?;
    writeln!(file, "N_LEVELS         :: {}", config.n_levels())?;
    writeln!(file, "SEED             :: {}", config.seed())?;
    if let Some(interval) = config.progress_interval() {
        writeln!(file, "OUTPUT_FREQ      :: {}", interval)?;
    }
    writeln!(file, "TAU_MAX          :: {:.3}", config.tau_max())?;
    writeln!(file, "ALBEDO           :: {:.3}", config.albedo())?;
    writeln!(file, "TRACK_MOMENTS    :: {}", config.track_moments())?;
    writeln!(file, "N_STREAMS        :: {}", config.n_streams())?;
    if let Some(cap) = config.max_interactions() {
        writeln!(file, "MAX_INTERACTIONS :: {}", cap)?;
    }
    writeln!(file)?;
    writeln!(file, "# Written {}", chrono::Local::now().to_rfc3339())?;

    file.flush()?;
    Ok(path.to_path_buf())
}

/// Writes the whole result as JSON.
pub fn write_json(result: &SimulationResult, path: &Path) -> Result<PathBuf> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, result)?;
    Ok(path.to_path_buf())
}
