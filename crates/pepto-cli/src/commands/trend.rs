use std::path::Path;

use pepto_core::{Dataset, IngestReport, RunReport, render_trends};

use super::{RunOptions, dataset_or_exit, ingest_totals};

pub fn run(opts: &RunOptions, output: Option<&str>) {
    let (data, report) = dataset_or_exit(opts);
    println!("{}\n", ingest_totals(&report));

    println!("S vs composite W (both anneal states pooled)\n");
    print!("{}", render_trends(&data.s_vs_w_trends()));

    if let Some(path) = output {
        match write_report(&data, &report, path) {
            Ok(()) => println!("\nResults written to {path}"),
            Err(e) => {
                eprintln!("\nFailed to write {path}: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn write_report(data: &Dataset, report: &IngestReport, path: &str) -> std::io::Result<()> {
    RunReport::new(data, report).write_json(Path::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pepto_core::{AxisIndex, SampleRecord, ingest_all};

    fn dataset() -> (Dataset, IngestReport) {
        let records = vec![SampleRecord::from_values(
            "gold_annealed_1",
            &[0.55, 0.003, 0.25, 0.002, 0.26, 0.002],
        )];
        ingest_all(AxisIndex::new(["gold"]).unwrap(), &records)
    }

    #[test]
    fn test_write_report_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("trend.json");
        let (data, report) = dataset();
        write_report(&data, &report, &path.to_string_lossy()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_report_into_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing").join("trend.json");
        let (data, report) = dataset();
        assert!(write_report(&data, &report, &path.to_string_lossy()).is_err());
    }
}
