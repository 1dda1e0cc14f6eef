//! Typed per-stage settings records.
//!
//! Each solver stage has its own settings struct; `CaseSettings` collects
//! them under named optional fields so the serialized settings file is a
//! mapping from stage name to its options mapping, with absent stages
//! omitted entirely.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::settings::{Flow, StageKind};

/// Case header: identification, execution order and log destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationHeader {
    pub case: String,
    pub route: PathBuf,
    pub flow: Vec<String>,
    pub write_screen: bool,
    pub write_log: bool,
    pub log_folder: PathBuf,
    pub log_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamLoaderSettings {
    pub unsteady: bool,
    /// Initial body attitude as a scalar-first unit quaternion
    pub orientation: [f64; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeroForcesCalculatorSettings {
    pub coefficients: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonLinearStaticSettings {
    pub print_info: bool,
    pub max_iterations: usize,
    pub num_load_steps: usize,
    pub delta_curved: f64,
    pub min_delta: f64,
    pub gravity_on: bool,
    pub gravity: f64,
}

/// Velocity-field generator selection for the UVLM stages. Serializes as the
/// generator name plus its input mapping, the way the solver reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "velocity_field_generator", content = "velocity_field_input")]
pub enum VelocityField {
    #[serde(rename = "SteadyVelocityField")]
    Steady(SteadyVelocityField),
    #[serde(rename = "GustVelocityField")]
    Gust(GustVelocityField),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteadyVelocityField {
    pub u_inf: f64,
    pub u_inf_direction: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GustVelocityField {
    pub u_inf: f64,
    pub u_inf_direction: [f64; 3],
    /// The gust moves with the body frame when the aircraft is clamped
    pub relative_motion: bool,
    pub offset: f64,
    #[serde(flatten)]
    pub gust: GustInput,
}

/// Gust shape and its parameters as the solver reads them. The gust
/// intensity here is an absolute velocity, already scaled by the freestream
/// speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gust_shape", content = "gust_parameters")]
pub enum GustInput {
    #[serde(rename = "1-cos")]
    OneMinusCosine { gust_length: f64, gust_intensity: f64 },
    #[serde(rename = "time varying")]
    TimeVarying { file: PathBuf, gust_component: Vec<usize> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticUvlmSettings {
    pub print_info: bool,
    pub horseshoe: bool,
    pub num_cores: usize,
    pub n_rollup: usize,
    #[serde(flatten)]
    pub velocity_field: VelocityField,
    pub rho: f64,
    pub cfl1: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticCoupledSettings {
    pub print_info: bool,
    pub structural_solver: StageKind,
    pub structural_solver_settings: NonLinearStaticSettings,
    pub aero_solver: StageKind,
    pub aero_solver_settings: StaticUvlmSettings,
    pub max_iter: usize,
    pub n_load_steps: usize,
    pub tolerance: f64,
    pub relaxation_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticTrimSettings {
    pub solver: StageKind,
    pub solver_settings: StaticCoupledSettings,
    pub initial_alpha: f64,
    pub initial_deflection: f64,
    pub initial_thrust: f64,
    /// Control-surface indices of the trim tail surfaces
    pub tail_cs_index: Vec<usize>,
    pub thrust_nodes: Vec<usize>,
    pub fz_tolerance: f64,
    pub fx_tolerance: f64,
    pub m_tolerance: f64,
    pub save_info: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StraightWakeInput {
    pub u_inf: f64,
    pub u_inf_direction: [f64; 3],
    pub dt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AerogridLoaderSettings {
    pub unsteady: bool,
    pub aligned_grid: bool,
    /// Number of wake panel rows
    pub mstar: usize,
    pub wake_shape_generator: String,
    pub wake_shape_generator_input: StraightWakeInput,
}

/// Newmark-beta structural timestep settings, shared between the free-flight
/// and the clamped integrator entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicStepSettings {
    pub print_info: bool,
    pub max_iterations: usize,
    pub delta_curved: f64,
    pub min_delta: f64,
    pub newmark_damp: f64,
    pub gravity_on: bool,
    pub gravity: f64,
    pub num_steps: usize,
    pub dt: f64,
    /// Initial rigid-body velocity; only set for the free-flight integrator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_velocity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamLoadsSettings {
    pub csv_output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepUvlmSettings {
    pub num_cores: usize,
    pub convection_scheme: usize,
    pub gamma_dot_filtering: usize,
    pub cfl1: bool,
    #[serde(flatten)]
    pub velocity_field: VelocityField,
    pub rho: f64,
    pub n_time_steps: usize,
    pub dt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveDataSettings {
    pub save_aero: bool,
    pub save_struct: bool,
    pub save_linear: bool,
    pub save_linear_uvlm: bool,
    pub save_rom: bool,
}

/// Settings for the postprocessors run after each dynamic coupling step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostprocessorSettings {
    #[serde(rename = "BeamLoads", skip_serializing_if = "Option::is_none")]
    pub beam_loads: Option<BeamLoadsSettings>,
    #[serde(rename = "SaveData", skip_serializing_if = "Option::is_none")]
    pub save_data: Option<SaveDataSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicCoupledSettings {
    pub structural_solver: StageKind,
    pub structural_solver_settings: DynamicStepSettings,
    pub aero_solver: StageKind,
    pub aero_solver_settings: StepUvlmSettings,
    pub fsi_substeps: usize,
    pub fsi_tolerance: f64,
    pub relaxation_factor: f64,
    pub minimum_steps: usize,
    pub relaxation_steps: usize,
    pub final_relaxation_factor: f64,
    pub n_time_steps: usize,
    pub dt: f64,
    pub include_unsteady_force_contribution: bool,
    pub postprocessors: Vec<StageKind>,
    pub postprocessors_settings: PostprocessorSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalSettings {
    pub print_info: bool,
    pub use_undamped_modes: bool,
    #[serde(rename = "NumLambda")]
    pub num_lambda: usize,
    pub rigid_body_modes: bool,
    pub write_modes_vtk: bool,
    pub print_matrices: bool,
    pub continuous_eigenvalues: bool,
    pub dt: f64,
    pub plot_eigenvalues: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearBeamSettings {
    pub modal_projection: bool,
    pub inout_coords: String,
    pub discrete_time: bool,
    pub newmark_damp: f64,
    pub discr_method: String,
    pub dt: f64,
    pub proj_modes: String,
    pub num_modes: usize,
    pub print_info: bool,
    pub gravity: bool,
    pub remove_dofs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RomRequest {
    pub rom_method: Vec<String>,
    pub rom_method_settings: std::collections::BTreeMap<String, crate::settings::KrylovRom>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearUvlmSettings {
    pub dt: f64,
    pub integr_order: usize,
    pub density: f64,
    pub remove_predictor: bool,
    pub use_sparse: bool,
    pub gust_assembler: String,
    #[serde(flatten)]
    pub rom: Option<RomRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearAeroelasticSettings {
    pub beam_settings: LinearBeamSettings,
    pub aero_settings: LinearUvlmSettings,
    pub track_body: bool,
    pub use_euler: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearAssemblerSettings {
    pub linear_system: String,
    pub inout_coordinates: String,
    pub linear_system_settings: LinearAeroelasticSettings,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub remove_inputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsymptoticStabilitySettings {
    pub print_info: bool,
    pub frequency_cutoff: f64,
    pub export_eigenvalues: bool,
    pub modes_to_plot: usize,
    /// Start speed, end speed and number of points of the velocity sweep
    pub velocity_analysis: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftDistributionSettings {
    pub rho: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeamPlotSettings {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AerogridPlotSettings {
    pub include_rbm: bool,
    pub include_applied_forces: bool,
    pub minus_m_star: usize,
    pub u_inf: f64,
}

/// The complete settings set for one case: the header plus one optional
/// entry per solver stage. Serializes to the stage-name -> options mapping
/// consumed by the external solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSettings {
    pub simulation: SimulationHeader,
    #[serde(rename = "BeamLoader", skip_serializing_if = "Option::is_none")]
    pub beam_loader: Option<BeamLoaderSettings>,
    #[serde(rename = "AerogridLoader", skip_serializing_if = "Option::is_none")]
    pub aerogrid_loader: Option<AerogridLoaderSettings>,
    #[serde(rename = "NonLinearStatic", skip_serializing_if = "Option::is_none")]
    pub non_linear_static: Option<NonLinearStaticSettings>,
    #[serde(rename = "StaticUvlm", skip_serializing_if = "Option::is_none")]
    pub static_uvlm: Option<StaticUvlmSettings>,
    #[serde(rename = "StaticCoupled", skip_serializing_if = "Option::is_none")]
    pub static_coupled: Option<StaticCoupledSettings>,
    #[serde(rename = "StaticTrim", skip_serializing_if = "Option::is_none")]
    pub static_trim: Option<StaticTrimSettings>,
    #[serde(rename = "BeamLoads", skip_serializing_if = "Option::is_none")]
    pub beam_loads: Option<BeamLoadsSettings>,
    #[serde(rename = "BeamPlot", skip_serializing_if = "Option::is_none")]
    pub beam_plot: Option<BeamPlotSettings>,
    #[serde(rename = "AerogridPlot", skip_serializing_if = "Option::is_none")]
    pub aerogrid_plot: Option<AerogridPlotSettings>,
    #[serde(rename = "AeroForcesCalculator", skip_serializing_if = "Option::is_none")]
    pub aero_forces_calculator: Option<AeroForcesCalculatorSettings>,
    #[serde(
        rename = "NonLinearDynamicCoupledStep",
        skip_serializing_if = "Option::is_none"
    )]
    pub non_linear_dynamic_coupled_step: Option<DynamicStepSettings>,
    #[serde(
        rename = "NonLinearDynamicPrescribedStep",
        skip_serializing_if = "Option::is_none"
    )]
    pub non_linear_dynamic_prescribed_step: Option<DynamicStepSettings>,
    #[serde(rename = "StepUvlm", skip_serializing_if = "Option::is_none")]
    pub step_uvlm: Option<StepUvlmSettings>,
    #[serde(rename = "DynamicCoupled", skip_serializing_if = "Option::is_none")]
    pub dynamic_coupled: Option<DynamicCoupledSettings>,
    #[serde(rename = "Modal", skip_serializing_if = "Option::is_none")]
    pub modal: Option<ModalSettings>,
    #[serde(rename = "LinearAssembler", skip_serializing_if = "Option::is_none")]
    pub linear_assembler: Option<LinearAssemblerSettings>,
    #[serde(rename = "AsymptoticStability", skip_serializing_if = "Option::is_none")]
    pub asymptotic_stability: Option<AsymptoticStabilitySettings>,
    #[serde(rename = "LiftDistribution", skip_serializing_if = "Option::is_none")]
    pub lift_distribution: Option<LiftDistributionSettings>,
    #[serde(rename = "SaveData", skip_serializing_if = "Option::is_none")]
    pub save_data: Option<SaveDataSettings>,
}

impl CaseSettings {
    /// Whether an entry exists for the given stage.
    pub fn contains(&self, stage: StageKind) -> bool {
        match stage {
            StageKind::BeamLoader => self.beam_loader.is_some(),
            StageKind::AerogridLoader => self.aerogrid_loader.is_some(),
            StageKind::NonLinearStatic => self.non_linear_static.is_some(),
            StageKind::StaticUvlm => self.static_uvlm.is_some(),
            StageKind::StaticCoupled => self.static_coupled.is_some(),
            StageKind::StaticTrim => self.static_trim.is_some(),
            StageKind::BeamLoads => self.beam_loads.is_some(),
            StageKind::BeamPlot => self.beam_plot.is_some(),
            StageKind::AerogridPlot => self.aerogrid_plot.is_some(),
            StageKind::AeroForcesCalculator => self.aero_forces_calculator.is_some(),
            StageKind::NonLinearDynamicCoupledStep => {
                self.non_linear_dynamic_coupled_step.is_some()
            }
            StageKind::NonLinearDynamicPrescribedStep => {
                self.non_linear_dynamic_prescribed_step.is_some()
            }
            StageKind::StepUvlm => self.step_uvlm.is_some(),
            StageKind::DynamicCoupled => self.dynamic_coupled.is_some(),
            StageKind::Modal => self.modal.is_some(),
            StageKind::LinearAssembler => self.linear_assembler.is_some(),
            StageKind::AsymptoticStability => self.asymptotic_stability.is_some(),
            StageKind::LiftDistribution => self.lift_distribution.is_some(),
            StageKind::SaveData => self.save_data.is_some(),
        }
    }

    /// Checks that every stage named in the flow has a settings entry.
    pub fn validate_flow(&self, flow: &Flow) -> Result<(), StageKind> {
        for stage in flow.iter() {
            if !self.contains(*stage) {
                return Err(*stage);
            }
        }
        Ok(())
    }
}
