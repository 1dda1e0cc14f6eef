//! Flattens a results container into a scalar time-history table.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::algebra::quat_to_euler;
use crate::postprocess::{ResultsError, ResultsFile};

/// Column labels following the time column: vertical gust velocity at the
/// leading edge, tip displacement and velocity, tip rotation and rotation
/// rate, out-of-plane root bending load, root torsion load, pitch angle.
pub const SIGNAL_LABELS: [&str; 16] = [
    "omega_z", "x", "y", "z", "x_dot", "y_dot", "z_dot", "r", "p", "q", "r_dot", "p_dot", "q_dot",
    "OOP", "MT", "Pitch",
];

/// Columns per row: time plus the signals.
pub const N_COLUMNS: usize = SIGNAL_LABELS.len() + 1;

/// Index of the root node at the wing attachment.
const NODE_ROOT: usize = 0;

/// Scalar time-history table extracted from a results container, one row
/// per complete timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeHistory {
    pub rows: Vec<[f64; N_COLUMNS]>,
}

impl TimeHistory {
    /// Walks every complete timestep of `results` and copies the fixed
    /// field slices into a flat row, with the time column set to
    /// `timestep_index * dt`.
    pub fn extract(results: &ResultsFile) -> Result<Self, ResultsError> {
        let dt = results.dt()?;
        let tip_node = results.tip_node()?;
        let tip_element = results.tip_element(tip_node);

        let mut rows = Vec::with_capacity(results.n_complete_timesteps());
        for its in 0..results.n_complete_timesteps() {
            let structure = results.structure_timestep(its)?;
            let aero = results.aero_timestep(its)?;

            let u_ext = aero
                .u_ext
                .values()
                .next()
                .ok_or(ResultsError::MissingRecord("no aerodynamic surfaces"))?;
            let gust_w = *u_ext
                .get(2)
                .and_then(|comp| comp.first())
                .and_then(|chord| chord.first())
                .ok_or(ResultsError::MissingRecord(
                    "vertical velocity at the leading edge",
                ))?;

            let pos = structure
                .pos
                .get(tip_node)
                .ok_or(ResultsError::MissingRecord("tip node position"))?;
            let pos_dot = structure
                .pos_dot
                .get(tip_node)
                .ok_or(ResultsError::MissingRecord("tip node velocity"))?;
            // rotation at the outermost local node of the tip element
            let psi = structure
                .psi
                .get(tip_element)
                .map(|element| element[2])
                .ok_or(ResultsError::MissingRecord("tip element rotation"))?;
            let psi_dot = structure
                .psi_dot
                .get(tip_element)
                .map(|element| element[2])
                .ok_or(ResultsError::MissingRecord("tip element rotation rate"))?;
            let loads = structure
                .postproc_cell
                .loads
                .get(NODE_ROOT)
                .ok_or(ResultsError::MissingRecord("root loads"))?;
            let pitch = quat_to_euler(&structure.quat)[1];

            rows.push([
                its as f64 * dt,
                gust_w,
                pos[0],
                pos[1],
                pos[2],
                pos_dot[0],
                pos_dot[1],
                pos_dot[2],
                psi[0],
                psi[1],
                psi[2],
                psi_dot[0],
                psi_dot[1],
                psi_dot[2],
                loads[4],
                loads[3],
                pitch,
            ]);
        }

        Ok(Self { rows })
    }

    pub fn header() -> String {
        let mut header = String::from("time");
        for label in SIGNAL_LABELS {
            header.push_str(", ");
            header.push_str(label);
        }
        header
    }

    /// Writes the table as comma-delimited text with a header row, creating
    /// the parent directory if needed.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ResultsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = BufWriter::new(fs::File::create(path)?);
        writeln!(out, "{}", Self::header())?;
        for row in &self.rows {
            let formatted: Vec<String> = row.iter().copied().map(format_float).collect();
            writeln!(out, "{}", formatted.join(", "))?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Scientific notation with a signed two-digit exponent, matching the
/// C-style `%e` layout other tooling expects.
fn format_float(v: f64) -> String {
    let s = format!("{v:.6e}");
    match s.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            format!("{mantissa}e{exponent:+03}")
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_starts_with_time() {
        let header = TimeHistory::header();
        assert!(header.starts_with("time, omega_z"));
        assert_eq!(header.split(", ").count(), N_COLUMNS);
    }

    #[test]
    fn write_produces_one_line_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("case.txt");

        let history = TimeHistory {
            rows: vec![[0.0; N_COLUMNS], [1.0; N_COLUMNS]],
        };
        history.write(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], TimeHistory::header());
        assert!(lines[1].starts_with("0.000000e+00"));
    }

    #[test]
    fn floats_carry_a_signed_two_digit_exponent() {
        assert_eq!(format_float(0.0), "0.000000e+00");
        assert_eq!(format_float(4.5), "4.500000e+00");
        assert_eq!(format_float(-1.5e-3), "-1.500000e-03");
        assert_eq!(format_float(2.3e12), "2.300000e+12");
    }
}
