//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod defaults;
pub mod run;

use std::path::Path;

use tracing::{info, warn};

use crate::config::{ParameterFile, ParameterOverrides, ParameterSource};
use crate::Result;

/// Resolves the parameters for a command: file, then environment, then flags.
pub fn resolve_parameters(
    path: &Path,
    overrides: &ParameterOverrides,
) -> Result<(ParameterFile, ParameterSource)> {
    let (params, source) = ParameterFile::load_or_default(path)?;
    let params = params.with_env_override()?.with_cli_overrides(overrides);
    Ok((params, source))
}

/// Logs where the parameters came from.
pub fn report_source(source: &ParameterSource) {
    match source {
        ParameterSource::File(path) => info!(path = %path.display(), "parameter file loaded"),
        ParameterSource::Missing(path) => warn!(
            path = %path.display(),
            "parameter file not found, using default parameters"
        ),
    }
}
