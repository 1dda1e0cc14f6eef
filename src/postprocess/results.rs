//! Typed reader over the solver's persisted results container.
//!
//! The container is a hierarchical JSON document with a fixed,
//! solver-defined schema; the schema version is checked once on open and
//! everything downstream works on the typed records.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::postprocess::ResultsError;

/// Schema versions this reader understands.
const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// External velocity field sampled on one lattice surface,
/// indexed [component][chordwise][spanwise].
pub type SurfaceVelocities = Vec<Vec<Vec<f64>>>;

#[derive(Debug, Clone, Deserialize)]
pub struct ResultsFile {
    pub version: String,
    pub data: CaseData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseData {
    pub settings: SettingsEcho,
    pub structure: StructureHistory,
    pub aero: AeroHistory,
}

/// The slice of the settings echo the extraction needs. Everything else in
/// the echo is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsEcho {
    #[serde(rename = "DynamicCoupled")]
    pub dynamic_coupled: Option<DynamicCoupledEcho>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DynamicCoupledEcho {
    pub dt: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructureHistory {
    /// Timestep records keyed by zero-padded timestep index
    pub timestep_info: BTreeMap<String, StructureTimestep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructureTimestep {
    /// Nodal positions [m]
    pub pos: Vec<[f64; 3]>,
    /// Nodal velocities [m/s]
    pub pos_dot: Vec<[f64; 3]>,
    /// Cartesian rotation vectors per element and local node
    pub psi: Vec<[[f64; 3]; 3]>,
    pub psi_dot: Vec<[[f64; 3]; 3]>,
    /// Body attitude as a scalar-first unit quaternion
    pub quat: [f64; 4],
    pub postproc_cell: PostprocCell,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostprocCell {
    /// Internal loads per element: [Fx, Fy, Fz, Mx, My, Mz]
    pub loads: Vec<[f64; 6]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AeroHistory {
    pub timestep_info: BTreeMap<String, AeroTimestep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AeroTimestep {
    /// External velocity field per lattice surface, keyed by surface index
    pub u_ext: BTreeMap<String, SurfaceVelocities>,
}

impl ResultsFile {
    /// Opens a results container and validates its schema version.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ResultsError> {
        let contents = fs::read_to_string(path)?;
        let file: ResultsFile = serde_json::from_str(&contents)?;
        if !SUPPORTED_VERSIONS.contains(&file.version.as_str()) {
            return Err(ResultsError::UnsupportedVersion {
                found: file.version,
                supported: SUPPORTED_VERSIONS.join(", "),
            });
        }
        Ok(file)
    }

    /// Timestep size of the dynamic coupling loop.
    pub fn dt(&self) -> Result<f64, ResultsError> {
        self.data
            .settings
            .dynamic_coupled
            .as_ref()
            .map(|dc| dc.dt)
            .ok_or(ResultsError::MissingRecord(
                "settings echo has no dynamic coupling entry",
            ))
    }

    /// Number of complete timestep records. The last two records of a run
    /// are written while the solver shuts down and are dropped as
    /// incomplete.
    pub fn n_complete_timesteps(&self) -> usize {
        self.data.structure.timestep_info.len().saturating_sub(2)
    }

    /// The structural record of timestep `index`.
    pub fn structure_timestep(&self, index: usize) -> Result<&StructureTimestep, ResultsError> {
        self.data
            .structure
            .timestep_info
            .get(&timestep_key(index))
            .ok_or(ResultsError::MissingRecord("structural timestep record"))
    }

    /// The aerodynamic record of timestep `index`.
    pub fn aero_timestep(&self, index: usize) -> Result<&AeroTimestep, ResultsError> {
        self.data
            .aero
            .timestep_info
            .get(&timestep_key(index))
            .ok_or(ResultsError::MissingRecord("aerodynamic timestep record"))
    }

    /// Index of the wingtip node: the node with the largest spanwise (y)
    /// coordinate in the undeformed first record.
    pub fn tip_node(&self) -> Result<usize, ResultsError> {
        let first = self.structure_timestep(0)?;
        first
            .pos
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a[1].total_cmp(&b[1]))
            .map(|(i, _)| i)
            .ok_or(ResultsError::MissingRecord("no structural nodes recorded"))
    }

    /// Beam element holding the wingtip node. Two-noded intermediate
    /// points per three-noded element make this the rounded half-index.
    pub fn tip_element(&self, tip_node: usize) -> usize {
        ((tip_node as f64 - 1.0) / 2.0 - 0.1).round().max(0.0) as usize
    }
}

fn timestep_key(index: usize) -> String {
    format!("{index:05}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestep_keys_are_zero_padded() {
        assert_eq!(timestep_key(0), "00000");
        assert_eq!(timestep_key(123), "00123");
    }

    #[test]
    fn tip_element_maps_node_to_element() {
        let file = ResultsFile {
            version: "1.0".to_string(),
            data: CaseData {
                settings: SettingsEcho {
                    dynamic_coupled: None,
                },
                structure: StructureHistory {
                    timestep_info: BTreeMap::new(),
                },
                aero: AeroHistory {
                    timestep_info: BTreeMap::new(),
                },
            },
        };

        // node 26 sits at the far end of element 12
        assert_eq!(file.tip_element(26), 12);
        assert_eq!(file.tip_element(1), 0);
        assert_eq!(file.tip_element(0), 0);
    }
}
