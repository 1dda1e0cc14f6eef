mod history;
mod results;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use history::{TimeHistory, N_COLUMNS, SIGNAL_LABELS};
pub use results::{
    AeroTimestep, ResultsFile, SettingsEcho, StructureTimestep, SurfaceVelocities,
};

#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("Failed to access results file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to parse results file: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Unsupported results schema version {found} (supported: {supported})")]
    UnsupportedVersion { found: String, supported: String },
    #[error("Results file is missing a record: {0}")]
    MissingRecord(&'static str),
}

/// Path of a case's results container under the solver output folder.
pub fn results_path(output_folder: &Path, case: &str) -> PathBuf {
    output_folder
        .join(case)
        .join("savedata")
        .join(format!("{case}.data.json"))
}

/// Extracts the time history of `case` from `output_folder` and writes it
/// as `<case>.txt` under `result_folder`.
pub fn extract_case(
    output_folder: &Path,
    result_folder: &Path,
    case: &str,
) -> Result<PathBuf, ResultsError> {
    let results = ResultsFile::open(results_path(output_folder, case))?;
    let history = TimeHistory::extract(&results)?;
    let table_path = result_folder.join(format!("{case}.txt"));
    history.write(&table_path)?;
    Ok(table_path)
}
