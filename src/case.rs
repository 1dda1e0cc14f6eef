//! Case presets and the driver sequence shared by the binaries.
//!
//! Each preset captures the parameters of one case family; `prepare` walks
//! the model lifecycle (clean, init, generate, settings) and `execute`
//! additionally launches the external solver.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::{AeroParams, FlexopModel, ModelError, StructureParams};
use crate::settings::{
    CaseSettings, ConfigError, Discretisation, FlightConditions, Flow, GustDescriptor, KrylovRom,
    Numerics, SimulationOptions,
};

#[derive(Error, Debug)]
pub enum CaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A model prepared up to the point where only the solver launch is left.
#[derive(Debug)]
pub struct PreparedCase {
    pub model: FlexopModel,
    pub settings: CaseSettings,
    pub dt: f64,
    pub n_tstep: usize,
}

impl PreparedCase {
    pub fn run(&self) -> Result<(), CaseError> {
        self.model.run()?;
        Ok(())
    }
}

/// Preset for a nonlinear dynamic gust-response case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GustResponseCase {
    pub case_name: String,
    pub cases_route: PathBuf,
    pub output_route: PathBuf,

    /// Material stiffness factor (0.3: the softened variant)
    pub sigma: f64,
    pub n_elem_multiplier: usize,
    pub lifting_only: bool,
    pub wing_only: bool,

    pub num_chord_panels: usize,
    pub wake_length: usize,
    /// Stretched wake discretisation (cheaper, releases CFL 1)
    pub wake_discretisation: bool,

    /// Angle of attack at trim [rad]
    pub alpha: f64,
    /// Control-surface deflection at trim [rad]
    pub delta: f64,
    /// Thrust at trim [N]
    pub thrust: f64,
    pub u_inf: f64,
    pub rho: f64,

    /// Search for the trim point instead of starting from the preset values
    pub use_trim: bool,
    pub free_flight: bool,
    pub gravity: bool,
    pub controllable: bool,

    pub gust_length: f64,
    /// Gust intensity as a fraction of the freestream speed
    pub gust_intensity: f64,
    /// Timesteps between simulation start and gust encounter
    pub gust_offset_steps: usize,

    /// Physical time to simulate [s]
    pub simulation_time: f64,
    pub cfl: f64,
    pub num_cores: usize,
    pub tolerance: f64,
    pub fsi_tolerance: f64,
    pub structural_relaxation_factor: f64,
    pub relaxation_factor: f64,
    pub newmark_damp: f64,
}

impl Default for GustResponseCase {
    fn default() -> Self {
        Self {
            case_name: "superflexop_free_L_10_I_10".to_string(),
            cases_route: PathBuf::from("./cases"),
            output_route: PathBuf::from("./output"),
            sigma: 0.3,
            n_elem_multiplier: 2,
            lifting_only: true,
            wing_only: false,
            num_chord_panels: 8,
            wake_length: 10,
            wake_discretisation: false,
            alpha: 6.796482976011756e-3,
            delta: -1.784287512500099e-3,
            thrust: 2.2900770748346804,
            u_inf: 45.0,
            rho: 1.1336, // 800 m altitude
            use_trim: false,
            free_flight: true,
            gravity: true,
            controllable: false,
            gust_length: 10.0,
            gust_intensity: 0.1,
            gust_offset_steps: 10,
            simulation_time: 120.0,
            cfl: 1.0,
            num_cores: 4,
            tolerance: 1e-6,
            fsi_tolerance: 1e-4,
            structural_relaxation_factor: 0.6,
            relaxation_factor: 0.2,
            newmark_damp: 0.5e-4,
        }
    }
}

impl GustResponseCase {
    /// Loads a preset from a YAML file; absent fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    fn init_model(&self) -> Result<FlexopModel, CaseError> {
        let mut model = FlexopModel::new(&self.case_name, &self.cases_route, &self.output_route);
        model.clean()?;
        model.init_structure(StructureParams {
            sigma: self.sigma,
            n_elem_multiplier: self.n_elem_multiplier,
            n_elem_multiplier_fuselage: 1,
            lifting_only: self.lifting_only,
            wing_only: self.wing_only,
        });
        model.init_aero(AeroParams {
            m: self.num_chord_panels,
            cs_deflection: self.delta,
            controllable: self.controllable,
        });
        model.set_thrust(self.thrust)?;
        Ok(model)
    }

    /// Builds the model and settings and writes all solver input files.
    pub fn prepare(&self) -> Result<PreparedCase, CaseError> {
        let mut model = self.init_model()?;

        let dt = model
            .aero()
            .ok_or(ConfigError::ModelNotInitialised("aerodynamic"))?
            .timestep(self.cfl, self.u_inf);
        let n_tstep = (self.simulation_time / dt) as usize;

        let gust = GustDescriptor::one_minus_cosine(self.gust_length, self.gust_intensity)
            .with_offset(self.gust_offset_steps as f64 * dt * self.u_inf);

        let options = SimulationOptions {
            conditions: FlightConditions {
                alpha: self.alpha,
                u_inf: self.u_inf,
                rho: self.rho,
                thrust: self.thrust,
                cs_deflection: self.delta,
            },
            discretisation: Discretisation {
                wake_length: self.wake_length,
                horseshoe: false,
                variable_wake: self.wake_discretisation,
            },
            numerics: Numerics {
                tolerance: self.tolerance,
                fsi_tolerance: self.fsi_tolerance,
                structural_relaxation_factor: self.structural_relaxation_factor,
                relaxation_factor: self.relaxation_factor,
                newmark_damp: self.newmark_damp,
                num_cores: self.num_cores,
                n_tstep,
                ..Numerics::default()
            },
            gust: Some(gust),
            free_flight: self.free_flight,
            gravity: self.gravity,
            ..SimulationOptions::default()
        };

        let flow = Flow::gust_response(self.use_trim);
        let settings = CaseSettings::assemble(&model, &flow, dt, &options)?;

        model.generate()?;
        model.create_settings(&settings)?;

        Ok(PreparedCase {
            model,
            settings,
            dt,
            n_tstep,
        })
    }

    /// Prepares the case and launches the external solver on it.
    pub fn execute(&self) -> Result<PreparedCase, CaseError> {
        let prepared = self.prepare()?;
        prepared.run()?;
        Ok(prepared)
    }
}

/// Preset for a linearised state-space extraction case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearSystemCase {
    pub case_name: String,
    pub cases_route: PathBuf,
    pub output_route: PathBuf,

    pub sigma: f64,
    pub n_elem_multiplier: usize,
    pub lifting_only: bool,
    pub wing_only: bool,
    pub num_chord_panels: usize,
    pub wake_length: usize,

    pub alpha: f64,
    pub delta: f64,
    pub thrust: f64,
    pub u_inf: f64,
    pub rho: f64,

    pub free_flight: bool,
    pub gravity: bool,
    /// Modes retained in the modal projection
    pub num_modes: usize,
    /// Request a Krylov reduced-order model of the assembled system
    pub use_rom: bool,

    pub cfl: f64,
    pub num_cores: usize,
    pub tolerance: f64,
    pub fsi_tolerance: f64,
    pub structural_relaxation_factor: f64,
    pub relaxation_factor: f64,
    pub newmark_damp: f64,
}

impl Default for LinearSystemCase {
    fn default() -> Self {
        Self {
            case_name: "flexop_sigma_03_free_flight_linear".to_string(),
            cases_route: PathBuf::from("./cases"),
            output_route: PathBuf::from("./output"),
            sigma: 0.3,
            n_elem_multiplier: 2,
            lifting_only: true,
            wing_only: false,
            num_chord_panels: 8,
            wake_length: 10,
            alpha: 6.796482976011756e-3,
            delta: -1.784287512500099e-3,
            thrust: 2.2900770748346804,
            u_inf: 45.0,
            rho: 1.1336,
            free_flight: true,
            gravity: true,
            num_modes: 21,
            use_rom: false,
            cfl: 1.0,
            num_cores: 4,
            tolerance: 1e-6,
            fsi_tolerance: 1e-4,
            structural_relaxation_factor: 0.6,
            relaxation_factor: 0.2,
            newmark_damp: 0.5e-4,
        }
    }
}

impl LinearSystemCase {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Builds the model and settings and writes all solver input files.
    pub fn prepare(&self) -> Result<PreparedCase, CaseError> {
        let mut model = FlexopModel::new(&self.case_name, &self.cases_route, &self.output_route);
        model.clean()?;
        model.init_structure(StructureParams {
            sigma: self.sigma,
            n_elem_multiplier: self.n_elem_multiplier,
            n_elem_multiplier_fuselage: 1,
            lifting_only: self.lifting_only,
            wing_only: self.wing_only,
        });
        model.init_aero(AeroParams {
            m: self.num_chord_panels,
            cs_deflection: self.delta,
            controllable: false,
        });
        model.set_thrust(self.thrust)?;

        let dt = model
            .aero()
            .ok_or(ConfigError::ModelNotInitialised("aerodynamic"))?
            .timestep(self.cfl, self.u_inf);

        let options = SimulationOptions {
            conditions: FlightConditions {
                alpha: self.alpha,
                u_inf: self.u_inf,
                rho: self.rho,
                thrust: self.thrust,
                cs_deflection: self.delta,
            },
            discretisation: Discretisation {
                wake_length: self.wake_length,
                ..Discretisation::default()
            },
            numerics: Numerics {
                tolerance: self.tolerance,
                fsi_tolerance: self.fsi_tolerance,
                structural_relaxation_factor: self.structural_relaxation_factor,
                relaxation_factor: self.relaxation_factor,
                newmark_damp: self.newmark_damp,
                num_cores: self.num_cores,
                // a single coupled step settles the reference state the
                // system is linearised about
                n_tstep: 1,
                ..Numerics::default()
            },
            gust: None,
            free_flight: self.free_flight,
            gravity: self.gravity,
            num_modes: self.num_modes,
            rom: self.use_rom.then(KrylovRom::default),
            ..SimulationOptions::default()
        };

        let flow = Flow::linear_assembly();
        let settings = CaseSettings::assemble(&model, &flow, dt, &options)?;

        model.generate()?;
        model.create_settings(&settings)?;

        Ok(PreparedCase {
            model,
            settings,
            dt,
            n_tstep: 1,
        })
    }

    pub fn execute(&self) -> Result<PreparedCase, CaseError> {
        let prepared = self.prepare()?;
        prepared.run()?;
        Ok(prepared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::settings::{GustInput, StageKind, VelocityField};

    fn case_in(dir: &Path) -> GustResponseCase {
        GustResponseCase {
            cases_route: dir.join("cases"),
            output_route: dir.join("output"),
            simulation_time: 1.0,
            ..GustResponseCase::default()
        }
    }

    #[test]
    fn prepare_derives_timestep_and_step_count() {
        let dir = tempfile::tempdir().unwrap();
        let prepared = case_in(dir.path()).prepare().unwrap();

        let dt = 0.471 / 8.0 / 45.0;
        assert_relative_eq!(prepared.dt, dt);
        assert_eq!(prepared.n_tstep, (1.0 / dt) as usize);
    }

    #[test]
    fn prepare_offsets_the_gust_by_ten_steps() {
        let dir = tempfile::tempdir().unwrap();
        let prepared = case_in(dir.path()).prepare().unwrap();

        let step_uvlm = prepared.settings.step_uvlm.as_ref().unwrap();
        match &step_uvlm.velocity_field {
            VelocityField::Gust(field) => {
                assert_relative_eq!(field.offset, 10.0 * prepared.dt * 45.0);
                match field.gust {
                    GustInput::OneMinusCosine { gust_intensity, .. } => {
                        assert_relative_eq!(gust_intensity, 4.5)
                    }
                    _ => panic!("expected a 1-cos gust"),
                }
            }
            _ => panic!("gust case must use the gust velocity field"),
        }
    }

    #[test]
    fn prepare_writes_all_input_files() {
        let dir = tempfile::tempdir().unwrap();
        let prepared = case_in(dir.path()).prepare().unwrap();

        let route = prepared.model.case_route();
        assert!(route.join("structure.json").is_file());
        assert!(route.join("aero.json").is_file());
        assert!(route
            .join("superflexop_free_L_10_I_10.settings.json")
            .is_file());
    }

    #[test]
    fn trim_switch_selects_the_static_stage() {
        let dir = tempfile::tempdir().unwrap();
        let trimmed = GustResponseCase {
            use_trim: true,
            ..case_in(dir.path())
        };
        let prepared = trimmed.prepare().unwrap();

        assert!(prepared
            .settings
            .simulation
            .flow
            .contains(&StageKind::StaticTrim.name().to_string()));
    }

    #[test]
    fn linear_case_requests_the_assembler() {
        let dir = tempfile::tempdir().unwrap();
        let case = LinearSystemCase {
            cases_route: dir.path().join("cases"),
            output_route: dir.path().join("output"),
            use_rom: true,
            ..LinearSystemCase::default()
        };
        let prepared = case.prepare().unwrap();

        let assembler = prepared.settings.linear_assembler.as_ref().unwrap();
        assert_eq!(
            assembler.linear_system_settings.beam_settings.num_modes,
            21
        );
        assert!(assembler
            .linear_system_settings
            .aero_settings
            .rom
            .is_some());
        assert!(prepared.settings.save_data.as_ref().unwrap().save_rom);
    }

    #[test]
    fn partial_yaml_preset_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.yaml");
        std::fs::write(&path, "case_name: short_gust\ngust_length: 5.0\n").unwrap();

        let case = GustResponseCase::from_file(&path).unwrap();
        assert_eq!(case.case_name, "short_gust");
        assert_relative_eq!(case.gust_length, 5.0);
        // untouched fields fall back to the preset defaults
        assert_relative_eq!(case.u_inf, 45.0);
        assert_relative_eq!(case.sigma, 0.3);
    }
}
