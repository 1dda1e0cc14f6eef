//! Integration checks of the results reader and time-history extraction
//! against a synthetic results container.

mod common;

use approx::assert_relative_eq;

use flexwing::postprocess::extract_case;
use flexwing::{ResultsError, ResultsFile, TimeHistory};

const DT: f64 = 1.0 / 800.0;

#[test]
fn one_row_per_complete_timestep() {
    let dir = tempfile::tempdir().unwrap();
    let output = common::write_results_fixture(dir.path(), "fixture", 12, DT);

    let results = ResultsFile::open(output.join("fixture/savedata/fixture.data.json")).unwrap();
    let history = TimeHistory::extract(&results).unwrap();

    // the last two records are dropped as incomplete
    assert_eq!(history.rows.len(), 10);
    for (its, row) in history.rows.iter().enumerate() {
        assert_relative_eq!(row[0], its as f64 * DT);
    }
}

#[test]
fn signals_come_from_the_fixed_slices() {
    let dir = tempfile::tempdir().unwrap();
    let output = common::write_results_fixture(dir.path(), "fixture", 5, DT);

    let results = ResultsFile::open(output.join("fixture/savedata/fixture.data.json")).unwrap();
    assert_eq!(results.tip_node().unwrap(), common::TIP_NODE);

    let history = TimeHistory::extract(&results).unwrap();
    let row = &history.rows[2];

    // gust velocity 0.5 * its at the leading edge
    assert_relative_eq!(row[1], 1.0);
    // tip position (x, y, z)
    assert_relative_eq!(row[2], 0.1);
    assert_relative_eq!(row[3], common::TIP_NODE as f64);
    assert_relative_eq!(row[4], 0.02);
    // root loads: OOP bending then torsion
    assert_relative_eq!(row[14], 40.0);
    assert_relative_eq!(row[15], 3.5);
    // pitch angle recovered from the attitude quaternion
    assert_relative_eq!(row[16], 0.02, epsilon = 1e-12);
}

#[test]
fn extract_case_writes_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let case = "superflexop_free_L_10_I_10";
    let output = common::write_results_fixture(dir.path(), case, 6, DT);
    let result_folder = dir.path().join("results_gust_response");

    let table = extract_case(&output, &result_folder, case).unwrap();
    let contents = std::fs::read_to_string(&table).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    assert!(lines[0].starts_with("time, omega_z"));
    assert_eq!(lines.len(), 1 + 4);
    let first_row: Vec<&str> = lines[1].split(", ").collect();
    assert_eq!(first_row.len(), flexwing::postprocess::N_COLUMNS);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = common::results_fixture(5, DT);
    fixture["version"] = serde_json::json!("2.7");
    let path = dir.path().join("bad.data.json");
    std::fs::write(&path, serde_json::to_string(&fixture).unwrap()).unwrap();

    let err = ResultsFile::open(&path).unwrap_err();
    assert!(matches!(err, ResultsError::UnsupportedVersion { .. }));
}

#[test]
fn missing_results_file_surfaces_the_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = extract_case(dir.path(), &dir.path().join("results"), "nope").unwrap_err();
    assert!(matches!(err, ResultsError::FileError(_)));
}
