//! The aircraft-model handle: owns the case directories, the structural and
//! aerodynamic sub-models, and the lifecycle that writes the solver input
//! files and launches the external solver on them.

mod aero;
mod structure;

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use crate::settings::CaseSettings;

pub use aero::{AeroModel, AeroParams};
pub use structure::{StructureModel, StructureParams};

/// Environment variable naming the external solver executable.
pub const SOLVER_ENV: &str = "AEROELASTIC_SOLVER";
/// Executable looked up on PATH when nothing else is configured.
const SOLVER_DEFAULT: &str = "aeroelastic-solver";

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to access case files: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to serialize model input: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("The {0} model has not been initialised")]
    NotInitialised(&'static str),
    #[error("No settings file has been written for case '{0}'")]
    NoSettings(String),
    #[error("Failed to launch solver '{command}': {source}")]
    SolverLaunch {
        command: String,
        source: std::io::Error,
    },
    #[error("Solver exited with status {0}")]
    SolverFailed(std::process::ExitStatus),
}

/// Handle to one simulation case of the flexible-wing aircraft model.
#[derive(Debug, Clone)]
pub struct FlexopModel {
    case_name: String,
    cases_route: PathBuf,
    output_route: PathBuf,
    solver_path: Option<PathBuf>,
    structure: Option<StructureModel>,
    aero: Option<AeroModel>,
    settings_file: Option<PathBuf>,
}

impl FlexopModel {
    pub fn new(
        case_name: impl Into<String>,
        cases_route: impl Into<PathBuf>,
        output_route: impl Into<PathBuf>,
    ) -> Self {
        Self {
            case_name: case_name.into(),
            cases_route: cases_route.into(),
            output_route: output_route.into(),
            solver_path: None,
            structure: None,
            aero: None,
            settings_file: None,
        }
    }

    /// Overrides the solver executable instead of consulting the
    /// environment.
    pub fn with_solver(mut self, solver: impl Into<PathBuf>) -> Self {
        self.solver_path = Some(solver.into());
        self
    }

    pub fn case_name(&self) -> &str {
        &self.case_name
    }

    /// Directory the case input files are written to.
    pub fn case_route(&self) -> PathBuf {
        self.cases_route.join(&self.case_name)
    }

    pub fn output_route(&self) -> &Path {
        &self.output_route
    }

    pub fn structure(&self) -> Option<&StructureModel> {
        self.structure.as_ref()
    }

    pub fn structure_mut(&mut self) -> Option<&mut StructureModel> {
        self.structure.as_mut()
    }

    pub fn aero(&self) -> Option<&AeroModel> {
        self.aero.as_ref()
    }

    /// Removes any input files left over from a previous run of this case.
    pub fn clean(&self) -> Result<(), ModelError> {
        match fs::remove_dir_all(self.case_route()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn init_structure(&mut self, params: StructureParams) {
        self.structure = Some(StructureModel::new(params));
    }

    pub fn init_aero(&mut self, params: AeroParams) {
        self.aero = Some(AeroModel::new(params));
    }

    pub fn set_thrust(&mut self, thrust: f64) -> Result<(), ModelError> {
        self.structure_mut()
            .ok_or(ModelError::NotInitialised("structural"))?
            .set_thrust(thrust);
        Ok(())
    }

    /// Writes the structural and aerodynamic model input files for the case.
    pub fn generate(&self) -> Result<(), ModelError> {
        let structure = self
            .structure()
            .ok_or(ModelError::NotInitialised("structural"))?;
        let aero = self.aero().ok_or(ModelError::NotInitialised("aerodynamic"))?;

        let route = self.case_route();
        fs::create_dir_all(&route)?;
        write_json(&route.join("structure.json"), structure)?;
        write_json(&route.join("aero.json"), aero)?;
        Ok(())
    }

    /// Writes the solver settings file and remembers it for `run`.
    pub fn create_settings(&mut self, settings: &CaseSettings) -> Result<(), ModelError> {
        let route = self.case_route();
        fs::create_dir_all(&route)?;
        let path = route.join(format!("{}.settings.json", self.case_name));
        write_json(&path, settings)?;
        self.settings_file = Some(path);
        Ok(())
    }

    /// Invokes the external solver on the case. The executable comes from
    /// `with_solver`, then the `AEROELASTIC_SOLVER` environment variable,
    /// then the default name on PATH.
    pub fn run(&self) -> Result<(), ModelError> {
        let settings_file = self
            .settings_file
            .as_ref()
            .ok_or_else(|| ModelError::NoSettings(self.case_name.clone()))?;

        let command = self.solver_command();
        let status = Command::new(&command)
            .arg(settings_file)
            .status()
            .map_err(|source| ModelError::SolverLaunch {
                command: command.to_string_lossy().into_owned(),
                source,
            })?;

        if !status.success() {
            return Err(ModelError::SolverFailed(status));
        }
        Ok(())
    }

    fn solver_command(&self) -> PathBuf {
        if let Some(path) = &self.solver_path {
            return path.clone();
        }
        std::env::var_os(SOLVER_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SOLVER_DEFAULT))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ModelError> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialised_model(dir: &Path) -> FlexopModel {
        let mut model = FlexopModel::new("unit_case", dir.join("cases"), dir.join("output"));
        model.init_structure(StructureParams::default());
        model.init_aero(AeroParams::default());
        model
    }

    #[test]
    fn generate_requires_initialised_models() {
        let model = FlexopModel::new("bare", "./cases", "./output");
        assert!(matches!(
            model.generate(),
            Err(ModelError::NotInitialised("structural"))
        ));
    }

    #[test]
    fn generate_writes_model_input_files() {
        let dir = tempfile::tempdir().unwrap();
        let model = initialised_model(dir.path());

        model.generate().unwrap();

        let route = model.case_route();
        assert!(route.join("structure.json").is_file());
        assert!(route.join("aero.json").is_file());
    }

    #[test]
    fn controllable_flag_reaches_the_aero_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = FlexopModel::new("unit_case", dir.path().join("cases"), dir.path().join("output"));
        model.init_structure(StructureParams::default());
        model.init_aero(AeroParams {
            controllable: true,
            ..AeroParams::default()
        });

        model.generate().unwrap();

        let contents = fs::read_to_string(model.case_route().join("aero.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["controllable"], serde_json::Value::Bool(true));
    }

    #[test]
    fn clean_removes_the_case_directory() {
        let dir = tempfile::tempdir().unwrap();
        let model = initialised_model(dir.path());
        model.generate().unwrap();
        assert!(model.case_route().exists());

        model.clean().unwrap();
        assert!(!model.case_route().exists());

        // cleaning an already-clean case is fine
        model.clean().unwrap();
    }

    #[test]
    fn run_without_settings_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let model = initialised_model(dir.path());
        assert!(matches!(model.run(), Err(ModelError::NoSettings(_))));
    }

    #[test]
    fn set_thrust_reaches_the_structural_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = initialised_model(dir.path());
        model.set_thrust(2.29).unwrap();
        assert_eq!(model.structure().unwrap().thrust, 2.29);
    }
}
