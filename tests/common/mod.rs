//! Shared fixtures for the integration tests.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Number of structural nodes in the fixture model.
pub const N_NODES: usize = 5;
/// Node with the largest spanwise coordinate.
pub const TIP_NODE: usize = 4;

/// Builds a synthetic results container with `n_steps` recorded timesteps.
/// The vertical gust velocity at the leading edge of surface 0 is
/// `0.5 * its` and the body pitch angle is 0.02 rad at every step.
pub fn results_fixture(n_steps: usize, dt: f64) -> Value {
    let quat = {
        let half = 0.01_f64; // pitch 0.02 rad
        [half.cos(), 0.0, half.sin(), 0.0]
    };

    let mut structure = serde_json::Map::new();
    let mut aero = serde_json::Map::new();
    for its in 0..n_steps {
        let key = format!("{its:05}");
        let pos: Vec<[f64; 3]> = (0..N_NODES).map(|n| [0.1, n as f64, 0.01 * its as f64]).collect();
        let pos_dot: Vec<[f64; 3]> = (0..N_NODES).map(|_| [0.0, 0.0, 0.02]).collect();
        let psi = vec![[[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.01, 0.02, 0.03]]; 2];
        let psi_dot = vec![[[0.0; 3]; 3]; 2];
        let loads = vec![[0.0, 0.0, 0.0, 3.5, 40.0, 0.0]; 2];

        structure.insert(
            key.clone(),
            json!({
                "pos": pos,
                "pos_dot": pos_dot,
                "psi": psi,
                "psi_dot": psi_dot,
                "quat": quat,
                "postproc_cell": { "loads": loads },
            }),
        );

        let w = 0.5 * its as f64;
        aero.insert(
            key,
            json!({
                "u_ext": {
                    "00000": [
                        [[1.0, 1.0], [1.0, 1.0]],
                        [[0.0, 0.0], [0.0, 0.0]],
                        [[w, 0.0], [0.0, 0.0]],
                    ]
                }
            }),
        );
    }

    json!({
        "version": "1.0",
        "data": {
            "settings": { "DynamicCoupled": { "dt": dt } },
            "structure": { "timestep_info": structure },
            "aero": { "timestep_info": aero },
        }
    })
}

/// Writes the fixture under the solver output layout and returns the
/// output folder.
pub fn write_results_fixture(dir: &Path, case: &str, n_steps: usize, dt: f64) -> PathBuf {
    let output_folder = dir.join("output");
    let savedata = output_folder.join(case).join("savedata");
    std::fs::create_dir_all(&savedata).unwrap();
    std::fs::write(
        savedata.join(format!("{case}.data.json")),
        serde_json::to_string(&results_fixture(n_steps, dt)).unwrap(),
    )
    .unwrap();
    output_folder
}
