use serde::{Deserialize, Serialize};

/// Reference component masses of the flexible-wing demonstrator [kg].
const MASS_FUSELAGE: f64 = 21.05;
const MASS_WING: f64 = 13.3;
const MASS_TAIL: f64 = 2.1;
const MASS_SYSTEMS: f64 = 15.25;

/// Reference beam element counts per component at multiplier 1.
const N_ELEM_WING: usize = 10;
const N_ELEM_TAIL: usize = 4;
const N_ELEM_FUSELAGE: usize = 6;

/// Parameters for the structural beam model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureParams {
    /// Material stiffness scaling factor (1.0: baseline, 0.3: the softened
    /// high-flexibility variant)
    pub sigma: f64,
    /// Element multiplier for wing and tail beams
    pub n_elem_multiplier: usize,
    /// Element multiplier for the fuselage beam
    pub n_elem_multiplier_fuselage: usize,
    /// Ignore non-lifting bodies
    pub lifting_only: bool,
    /// Wing-only model instead of the full wing + tail configuration
    pub wing_only: bool,
}

impl Default for StructureParams {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            n_elem_multiplier: 1,
            n_elem_multiplier_fuselage: 1,
            lifting_only: true,
            wing_only: false,
        }
    }
}

/// The structural side of the aircraft model: beam discretisation, stiffness
/// scaling and the thrust applied at the root node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureModel {
    pub params: StructureParams,
    /// Thrust applied at the thrust nodes [N]
    pub thrust: f64,
}

impl StructureModel {
    pub fn new(params: StructureParams) -> Self {
        Self {
            params,
            thrust: 0.0,
        }
    }

    pub fn set_thrust(&mut self, thrust: f64) {
        self.thrust = thrust;
    }

    /// Beam elements in one wing half.
    pub fn n_elem_wing(&self) -> usize {
        N_ELEM_WING * self.params.n_elem_multiplier
    }

    /// Beam elements in one tail half; zero for a wing-only model.
    pub fn n_elem_tail(&self) -> usize {
        if self.params.wing_only {
            0
        } else {
            N_ELEM_TAIL * self.params.n_elem_multiplier
        }
    }

    pub fn n_elem_fuselage(&self) -> usize {
        if self.params.wing_only {
            0
        } else {
            N_ELEM_FUSELAGE * self.params.n_elem_multiplier_fuselage
        }
    }

    /// Total beam element count over both halves plus the fuselage.
    pub fn n_elem(&self) -> usize {
        2 * (self.n_elem_wing() + self.n_elem_tail()) + self.n_elem_fuselage()
    }

    /// Total aircraft mass from the reference component masses. The
    /// stiffness factor sigma does not change the mass distribution.
    pub fn calculate_aircraft_mass(&self) -> f64 {
        let mut mass = MASS_SYSTEMS + 2.0 * MASS_WING;
        if !self.params.wing_only {
            mass += MASS_FUSELAGE + 2.0 * MASS_TAIL;
        }
        mass
    }
}
