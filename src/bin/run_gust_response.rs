//! Sets up and runs a nonlinear dynamic gust-response case: builds the
//! structural and aerodynamic model files, assembles the solver settings and
//! launches the external solver. An optional YAML preset file overrides the
//! default case parameters.

use std::env;

use flexwing::GustResponseCase;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let case = match env::args().nth(1) {
        Some(path) => {
            println!("Loading case preset from {path}...");
            GustResponseCase::from_file(&path)?
        }
        None => GustResponseCase::default(),
    };

    println!("Preparing case '{}'", case.case_name);
    println!(
        "  u_inf = {} m/s, rho = {} kg/m3, gust L = {} m, I = {}",
        case.u_inf, case.rho, case.gust_length, case.gust_intensity
    );

    let prepared = case.prepare()?;
    let mass = prepared
        .model
        .structure()
        .expect("structure initialised during prepare")
        .calculate_aircraft_mass();
    println!("  aircraft mass: {mass:.2} kg");
    println!(
        "  dt = {:.6} s, {} timesteps ({} s)",
        prepared.dt,
        prepared.n_tstep,
        case.simulation_time
    );
    println!(
        "  input files written to {}",
        prepared.model.case_route().display()
    );

    println!("Launching solver...");
    prepared.run()?;
    println!("Done.");

    Ok(())
}
