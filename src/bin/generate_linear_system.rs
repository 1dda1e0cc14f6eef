//! Sets up and runs a linearised state-space extraction case: settles the
//! reference state with a single coupled step, projects onto the structural
//! modes and assembles the linear aeroelastic system, optionally with a
//! Krylov reduced-order model. An optional YAML preset file overrides the
//! default case parameters.

use std::env;

use flexwing::LinearSystemCase;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let case = match env::args().nth(1) {
        Some(path) => {
            println!("Loading case preset from {path}...");
            LinearSystemCase::from_file(&path)?
        }
        None => LinearSystemCase::default(),
    };

    println!("Preparing case '{}'", case.case_name);
    println!(
        "  u_inf = {} m/s, {} modes, ROM: {}",
        case.u_inf, case.num_modes, case.use_rom
    );

    let prepared = case.prepare()?;
    println!(
        "  input files written to {}",
        prepared.model.case_route().display()
    );

    println!("Launching solver...");
    prepared.run()?;
    println!("Done.");

    Ok(())
}
