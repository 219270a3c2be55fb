//! Integration tests for pepto-core.
//!
//! These tests verify the full aggregation pipeline:
//! file discovery → ingestion → dataset queries → export.

use std::path::Path;

use pepto_core::export::{grouped_file_name, write_grouped_csv};
use pepto_core::{
    AxisIndex, COUNT_DEPTH, DirectorySource, Ingestor, Quantity, RunConfig, RunReport,
    SampleRecord, Treatment, ingest_all,
};

fn write_pappy(dir: &Path, stem: &str, values: [f64; 6]) {
    let header = "Sample,S Parameter,S Uncertainty,Left W Parameter,Left W Uncertainty,\
                  Right W Parameter,Right W Uncertainty,";
    let row: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    let body = format!("{header}\n{stem},{},\n", row.join(","));
    std::fs::write(dir.join(format!("{stem}_pappy.csv")), body).unwrap();
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

fn sample_records() -> Vec<SampleRecord> {
    vec![
        SampleRecord::from_values("gold_annealed_1", &[0.55, 0.003, 0.25, 0.002, 0.26, 0.002]),
        SampleRecord::from_values("gold_annealed_2", &[0.57, 0.0032, 0.24, 0.002, 0.27, 0.002]),
        SampleRecord::from_values("gold_unannealed_1", &[0.51, 0.004, 0.3, 0.003, 0.31, 0.003]),
        SampleRecord::from_values("copper_annealed_1", &[0.49, 0.002, 0.28, 0.001, 0.29, 0.001]),
        SampleRecord::from_values("copper_annealed_2", &[0.5, 0.002, 0.27, 0.001, 0.3, 0.001]),
        SampleRecord::from_values("lead_annealed_1", &[0.6, 0.002, 0.2, 0.001, 0.2, 0.001]),
    ]
}

#[test]
fn directory_run_aggregates_gold_samples() {
    let tmp = tempfile::tempdir().unwrap();
    let nested = tmp.path().join("june");
    std::fs::create_dir_all(&nested).unwrap();
    write_pappy(tmp.path(), "gold_treated_1", [0.55, 0.003, 0.25, 0.002, 0.26, 0.002]);
    write_pappy(&nested, "gold_treated_2", [0.57, 0.0032, 0.24, 0.002, 0.27, 0.002]);
    std::fs::write(tmp.path().join("readme.txt"), "not a pappy file").unwrap();

    let index = AxisIndex::new(["gold", "copper"]).unwrap();
    let (data, report) = ingest_all(index, &DirectorySource::new(tmp.path()));

    assert_eq!(report.ingested, 2);
    assert!(report.rejected.is_empty());
    let s = data
        .mean_by_name("gold", Treatment::Annealed, "S Parameter")
        .unwrap()
        .unwrap();
    assert!(approx(s, 0.56));
    let unc = data
        .mean_by_name("gold", Treatment::Annealed, "S Uncertainty")
        .unwrap()
        .unwrap();
    assert!(approx(unc, 0.0031));
    assert_eq!(
        data.mean_by_name("gold", Treatment::Unannealed, "S Parameter")
            .unwrap(),
        None
    );
    assert_eq!(data.grid().count(0, 0), 2);
}

#[test]
fn every_cell_count_matches_sequence_lengths() {
    let index = AxisIndex::new(["gold", "copper"]).unwrap();
    let (data, _) = ingest_all(index, &sample_records());
    let (rows, cols, _) = data.grid().shape();
    for row in 0..rows {
        for col in 0..cols {
            let count = data.grid().count(row, col);
            for q in Quantity::ALL {
                assert_eq!(data.cell(row, col).values(q).len(), count);
            }
            assert_eq!(data.composite_width_series(row, col).len(), count);
        }
    }
    assert!(data.grid().is_consistent());
}

#[test]
fn total_count_excludes_unscoped_and_rejected_records() {
    let mut records = sample_records();
    records.push(SampleRecord::new("gold_annealed_3", ["0.5", "oops"]));
    records.push(SampleRecord::from_values(
        "gold_quenched_1",
        &[0.5, 0.1, 0.2, 0.1, 0.2, 0.1],
    ));

    let index = AxisIndex::new(["gold", "copper"]).unwrap();
    let (data, report) = ingest_all(index, &records);

    assert_eq!(report.ingested, 5);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.rejected.len(), 2);
    assert_eq!(report.total(), records.len());
    assert_eq!(data.grid().total_count(), report.ingested);
}

#[test]
fn repeated_runs_over_one_source_are_identical() {
    let records = sample_records();
    let index = AxisIndex::new(["gold", "copper"]).unwrap();
    let (a, report_a) = ingest_all(index.clone(), &records);
    let (b, report_b) = ingest_all(index, &records);
    assert_eq!(a, b);
    assert_eq!(report_a, report_b);
}

#[test]
fn record_order_does_not_change_the_dataset() {
    let records = sample_records();
    let n = records.len();

    let reversed: Vec<SampleRecord> = records.iter().rev().cloned().collect();
    let rotated: Vec<SampleRecord> = records.iter().cycle().skip(2).take(n).cloned().collect();
    // Odd positions first, then even.
    let interleaved: Vec<SampleRecord> = records
        .iter()
        .skip(1)
        .step_by(2)
        .chain(records.iter().step_by(2))
        .cloned()
        .collect();

    let index = AxisIndex::new(["gold", "copper"]).unwrap();
    let (base, base_report) = ingest_all(index.clone(), &records);

    for order in [reversed, rotated, interleaved] {
        assert_eq!(order.len(), n);
        let (other, report) = ingest_all(index.clone(), &order);
        assert_eq!(report.ingested, base_report.ingested);
        assert_eq!(report.skipped, base_report.skipped);

        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(base.grid().count(row, col), other.grid().count(row, col));
                for q in Quantity::ALL {
                    assert_eq!(
                        sorted(base.cell(row, col).values(q)),
                        sorted(other.cell(row, col).values(q)),
                        "cell ({row}, {col}) {q}"
                    );
                }
                for depth in 0..=COUNT_DEPTH {
                    match (base.mean_of(row, col, depth), other.mean_of(row, col, depth)) {
                        (Some(x), Some(y)) => assert!(approx(x, y)),
                        (x, y) => assert_eq!(x, y),
                    }
                }
            }
        }
    }
}

#[test]
fn unreadable_file_for_unscoped_material_is_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    write_pappy(tmp.path(), "gold_annealed_1", [0.55, 0.003, 0.25, 0.002, 0.26, 0.002]);
    std::fs::write(tmp.path().join("lead_annealed_1_pappy.csv"), "").unwrap();

    let index = AxisIndex::new(["gold"]).unwrap();
    let (data, report) = ingest_all(index, &DirectorySource::new(tmp.path()));

    assert_eq!(report.ingested, 1);
    assert_eq!(report.skipped, 1);
    assert!(report.rejected.is_empty());
    assert_eq!(data.grid().total_count(), 1);
}

#[test]
fn unreadable_file_for_scoped_material_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("gold_annealed_2_pappy.csv"), "Sample\n").unwrap();

    let index = AxisIndex::new(["gold"]).unwrap();
    let (data, report) = ingest_all(index, &DirectorySource::new(tmp.path()));

    assert_eq!(report.skipped, 0);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].name, "gold_annealed_2_pappy.csv");
    assert_eq!(data.grid().total_count(), 0);
}

#[test]
fn incremental_ingestor_matches_batch_run() {
    let records = sample_records();
    let index = AxisIndex::new(["gold", "copper"]).unwrap();

    let mut ingestor = Ingestor::new(index.clone());
    for record in &records {
        let _ = ingestor.ingest_record(record);
    }
    let (incremental, _) = ingestor.finish();
    let (batch, _) = ingest_all(index, &records);
    assert_eq!(incremental, batch);
}

#[test]
fn summary_and_trends_follow_axis_order() {
    let index = AxisIndex::new(["copper", "gold"]).unwrap();
    let (data, _) = ingest_all(index, &sample_records());

    let summary = data.summary_table();
    assert_eq!(summary.entries.len(), 4);
    assert_eq!(summary.entries[0].material, "copper");
    assert_eq!(summary.entries[0].count, 2);
    assert_eq!(summary.entries[3].material, "gold");
    assert_eq!(summary.entries[3].treatment, Treatment::Unannealed);
    assert_eq!(summary.entries[3].count, 1);

    let trends = data.s_vs_w_trends();
    assert_eq!(trends.len(), 2);
    assert_eq!(trends[1].material, "gold");
    assert_eq!(trends[1].samples, 3);
    let fit = trends[1].fit.as_ref().unwrap();
    assert_eq!(fit.points, 3);
    assert!(fit.r_squared >= 0.0 && fit.r_squared <= 1.0);
}

#[test]
fn grouped_export_lists_raw_sequences() {
    let index = AxisIndex::new(["gold"]).unwrap();
    let (data, _) = ingest_all(index, &sample_records());

    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(grouped_file_name("06_15_2023"));
    let mut file = std::fs::File::create(&path).unwrap();
    write_grouped_csv(&data, &mut file).unwrap();
    drop(file);

    let csv = std::fs::read_to_string(&path).unwrap();
    let gold = csv
        .lines()
        .find(|l| l.starts_with("gold,annealed,"))
        .unwrap();
    assert!(gold.contains("\"[0.55, 0.57]\""));
    assert!(gold.ends_with(",2"));
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn json_report_roundtrips_through_serde() {
    let index = AxisIndex::new(["gold", "copper"]).unwrap();
    let (data, ingest) = ingest_all(index, &sample_records());

    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("report.json");
    RunReport::new(&data, &ingest).write_json(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["ingest"]["ingested"], 5);
    assert_eq!(value["ingest"]["skipped"], 1);
    assert_eq!(value["summary"]["entries"].as_array().unwrap().len(), 4);
    assert_eq!(value["trends"][0]["material"], "gold");
}

#[test]
fn config_file_drives_a_run() {
    let tmp = tempfile::tempdir().unwrap();
    let data_dir = tmp.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    write_pappy(&data_dir, "copper_unannealed_4", [0.5, 0.01, 0.2, 0.02, 0.3, 0.03]);
    write_pappy(&data_dir, "nickel_annealed_1", [0.5, 0.01, 0.2, 0.02, 0.3, 0.03]);

    let cfg_path = tmp.path().join("pepto.json");
    let cfg_json = serde_json::json!({
        "materials": ["copper"],
        "root": data_dir,
    });
    std::fs::write(&cfg_path, cfg_json.to_string()).unwrap();

    let cfg = RunConfig::from_json_path(&cfg_path).unwrap();
    let source = DirectorySource::new(cfg.root.clone()).follow_links(cfg.follow_links);
    let (data, report) = ingest_all(cfg.axis_index().unwrap(), &source);

    assert_eq!(report.ingested, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(data.grid().count(1, 0), 1);
}
