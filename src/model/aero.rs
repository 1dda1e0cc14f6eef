use serde::{Deserialize, Serialize};

/// Main-wing root chord of the flexible-wing demonstrator [m].
const CHORD_MAIN_ROOT: f64 = 0.471;
/// Main-wing tip chord [m].
const CHORD_MAIN_TIP: f64 = 0.236;
/// Main-wing span over both halves [m].
const WING_SPAN: f64 = 7.07;

/// Parameters for the aerodynamic lattice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AeroParams {
    /// Chordwise panel count
    pub m: usize,
    /// Initial control-surface deflection [rad]
    pub cs_deflection: f64,
    /// Expose the control surfaces as runtime inputs (closed-loop cases)
    pub controllable: bool,
}

impl Default for AeroParams {
    fn default() -> Self {
        Self {
            m: 4,
            cs_deflection: 0.0,
            controllable: false,
        }
    }
}

/// The aerodynamic side of the aircraft model: lattice discretisation and
/// the fixed planform geometry the timestep is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeroModel {
    /// Chordwise panel count
    pub m: usize,
    pub cs_deflection: f64,
    pub controllable: bool,
    pub chord_main_root: f64,
    pub chord_main_tip: f64,
    pub wing_span: f64,
}

impl AeroModel {
    pub fn new(params: AeroParams) -> Self {
        Self {
            m: params.m,
            cs_deflection: params.cs_deflection,
            controllable: params.controllable,
            chord_main_root: CHORD_MAIN_ROOT,
            chord_main_tip: CHORD_MAIN_TIP,
            wing_span: WING_SPAN,
        }
    }

    /// Timestep at which one chordwise panel convects past the root chord
    /// per step, scaled by the CFL number.
    pub fn timestep(&self, cfl: f64, u_inf: f64) -> f64 {
        cfl * self.chord_main_root / self.m as f64 / u_inf
    }

    pub fn half_span(&self) -> f64 {
        self.wing_span / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn timestep_follows_panel_convection() {
        let aero = AeroModel::new(AeroParams {
            m: 8,
            ..AeroParams::default()
        });

        // dt = 0.471 / 8 / 45
        assert_relative_eq!(aero.timestep(1.0, 45.0), 0.471 / 8.0 / 45.0);
        assert_relative_eq!(aero.timestep(2.0, 45.0), 2.0 * 0.471 / 8.0 / 45.0);
    }

    #[test]
    fn planform_constants_are_wired_in() {
        let aero = AeroModel::new(AeroParams::default());
        assert_relative_eq!(aero.chord_main_root, 0.471);
        assert_relative_eq!(aero.half_span(), 3.535);
    }
}
