use pepto_core::{IngestOutcome, Ingestor, RecordSource};

use super::{RunOptions, checked_source, config_or_exit, ingest_totals};

pub fn run(opts: &RunOptions) {
    let cfg = config_or_exit(opts);
    let prepared = cfg
        .axis_index()
        .and_then(|index| Ok((index, checked_source(&cfg)?)));
    let (index, source) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Scanning {} for pappy files (materials: {})\n",
        source.root().display(),
        cfg.materials.join(", ")
    );

    let mut ingestor = Ingestor::new(index);
    for record in source.records() {
        let (name, outcome) = match record {
            Ok(record) => (record.name.clone(), ingestor.ingest_record(&record)),
            Err(e) => (e.record_name().to_string(), ingestor.ingest_failure(e)),
        };
        match outcome {
            Ok(IngestOutcome::Ingested { label, .. }) => {
                println!("  \u{2705} {name:<40} {label}");
            }
            Ok(IngestOutcome::Skipped { material }) => {
                println!("  \u{23ED}  {name:<40} '{material}' not in scope");
            }
            Err(e) => println!("  \u{274C} {name:<40} {e}"),
        }
    }

    if ingestor.report().total() == 0 {
        println!("  (none found)");
    }
    println!();
    let (_, report) = ingestor.finish();
    println!("{}", ingest_totals(&report));
}
