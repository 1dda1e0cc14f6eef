use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::settings::StageKind;

/// Flight condition the case is set up for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightConditions {
    /// Angle of attack [rad]
    pub alpha: f64,
    /// Freestream speed [m/s]
    pub u_inf: f64,
    /// Air density [kg/m3]
    pub rho: f64,
    /// Engine thrust [N]
    pub thrust: f64,
    /// Initial control-surface deflection [rad]
    pub cs_deflection: f64,
}

impl Default for FlightConditions {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            u_inf: 10.0,
            rho: 1.225, // sea level
            thrust: 0.0,
            cs_deflection: 0.0,
        }
    }
}

/// Aerodynamic lattice discretisation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discretisation {
    /// Wake length in main-wing chord lengths
    pub wake_length: usize,
    /// Model the wake as a single horseshoe panel row
    pub horseshoe: bool,
    /// Allow a stretched (variable) wake discretisation
    pub variable_wake: bool,
}

impl Discretisation {
    /// Panel convection at CFL 1 only holds for an unstretched wake.
    pub fn cfl1(&self) -> bool {
        !self.variable_wake
    }
}

impl Default for Discretisation {
    fn default() -> Self {
        Self {
            wake_length: 10,
            horseshoe: false,
            variable_wake: false,
        }
    }
}

/// Numerical tolerances and iteration controls shared between the structural
/// solver and the fluid-structure coupling loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Numerics {
    pub tolerance: f64,
    pub fsi_tolerance: f64,
    pub n_load_steps: usize,
    pub structural_relaxation_factor: f64,
    pub relaxation_factor: f64,
    pub newmark_damp: f64,
    pub num_cores: usize,
    /// Number of dynamic timesteps to run
    pub n_tstep: usize,
}

impl Default for Numerics {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            fsi_tolerance: 1e-4,
            n_load_steps: 5,
            structural_relaxation_factor: 0.0,
            relaxation_factor: 0.0,
            newmark_damp: 0.5e-4,
            num_cores: 2,
            n_tstep: 1,
        }
    }
}

/// Shape of the transient gust disturbance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GustShape {
    /// Discrete 1-cosine gust
    OneMinusCosine {
        /// Gust length [m]
        length: f64,
        /// Gust intensity as a fraction of the freestream speed
        intensity: f64,
    },
    /// Time series of gust velocities read from file
    TimeVarying {
        file: PathBuf,
        /// Velocity components considered (0: U_x, 1: U_y, 2: U_z)
        components: Vec<usize>,
    },
}

/// Gust velocity-field descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GustDescriptor {
    pub shape: GustShape,
    /// Distance ahead of the aircraft at which the gust starts [m]
    pub offset: f64,
}

impl GustDescriptor {
    pub fn one_minus_cosine(length: f64, intensity: f64) -> Self {
        Self {
            shape: GustShape::OneMinusCosine { length, intensity },
            offset: 0.0,
        }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }
}

/// Krylov reduced-order-model request for the linear assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KrylovRom {
    pub algorithm: String,
    /// Krylov subspace dimension
    pub r: usize,
    /// Expansion frequencies [rad/s]
    pub frequency: Vec<f64>,
    pub single_side: String,
}

impl Default for KrylovRom {
    fn default() -> Self {
        Self {
            algorithm: "mimo_rational_arnoldi".to_string(),
            r: 4,
            frequency: vec![0.0],
            single_side: "observability".to_string(),
        }
    }
}

/// The full set of tunable case options consumed by the settings builder.
/// Every field has a tested default; drivers override only what their case
/// needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    pub conditions: FlightConditions,
    pub discretisation: Discretisation,
    pub numerics: Numerics,
    /// Gust velocity field; `None` keeps the steady freestream
    pub gust: Option<GustDescriptor>,
    /// Free-flight (rigid-body degrees of freedom released) vs clamped
    pub free_flight: bool,
    pub gravity: bool,
    /// Number of modes retained by the modal solver
    pub num_modes: usize,
    /// Reduced-order model request for the linear assembler
    pub rom: Option<KrylovRom>,
    /// Remove the gust input channel from the assembled state space
    pub remove_gust_input_in_statespace: bool,
    /// Postprocessors run after each dynamic coupling step
    pub postprocessors: Vec<StageKind>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            conditions: FlightConditions::default(),
            discretisation: Discretisation::default(),
            numerics: Numerics::default(),
            gust: None,
            free_flight: false,
            gravity: true,
            num_modes: 10,
            rom: None,
            remove_gust_input_in_statespace: true,
            postprocessors: vec![StageKind::BeamLoads],
        }
    }
}
