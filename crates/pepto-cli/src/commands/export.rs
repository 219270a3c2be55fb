use std::path::Path;
use std::time::SystemTime;

use pepto_core::date_stamp;
use pepto_core::export::{export_grouped, export_samples};

use super::{RunOptions, dataset_or_exit, print_ingest_report};

pub fn run(opts: &RunOptions, date: Option<&str>, out: &str, samples: bool) {
    let (data, report) = dataset_or_exit(opts);
    print_ingest_report(&report);

    let date = date
        .map(str::to_string)
        .unwrap_or_else(|| date_stamp(SystemTime::now()));
    let dir = Path::new(out);
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Error creating {out}: {e}");
        std::process::exit(1);
    }

    match export_grouped(&data, dir, &date) {
        Ok(path) => println!("\nGrouped results written to {}", path.display()),
        Err(e) => {
            eprintln!("Failed to write grouped CSV: {e}");
            std::process::exit(1);
        }
    }

    if samples {
        match export_samples(&data, dir, &date) {
            Ok(path) => println!("Per-sample results written to {}", path.display()),
            Err(e) => {
                eprintln!("Failed to write per-sample CSV: {e}");
                std::process::exit(1);
            }
        }
    }
}
