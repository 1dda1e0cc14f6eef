//! Extracts scalar time histories (gust velocity, tip displacement and
//! rotation, root loads, pitch angle) from finished gust-response cases and
//! writes them as delimited text tables.
//!
//! Usage: postprocess_gust_response <output_folder> <result_folder> <case>...

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use flexwing::postprocess::extract_case;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("usage: postprocess_gust_response <output_folder> <result_folder> <case>...");
        return ExitCode::FAILURE;
    }

    let output_folder = PathBuf::from(&args[0]);
    let result_folder = PathBuf::from(&args[1]);

    let mut failed = false;
    for case in &args[2..] {
        match extract_case(&output_folder, &result_folder, case) {
            Ok(table) => println!("{case}: wrote {}", table.display()),
            Err(e) => {
                eprintln!("{case}: {e}");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
