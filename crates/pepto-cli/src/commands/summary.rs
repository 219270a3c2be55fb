use pepto_core::{render_grid, render_summary};

use super::{RunOptions, dataset_or_exit, print_ingest_report};

pub fn run(opts: &RunOptions, quantity: &str) {
    let (data, report) = dataset_or_exit(opts);

    let grid = match render_grid(&data, quantity) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("{grid}");
    print!("{}", render_summary(&data.summary_table()));
    println!();
    print_ingest_report(&report);
}
