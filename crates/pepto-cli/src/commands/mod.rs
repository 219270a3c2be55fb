pub mod export;
pub mod scan;
pub mod summary;
pub mod trend;

use std::path::Path;

use pepto_core::{
    ConfigurationError, Dataset, DirectorySource, IngestReport, RunConfig, ingest_all,
};

/// Run options collected from the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunOptions<'a> {
    pub root: Option<&'a str>,
    pub materials: Option<&'a str>,
    pub config: Option<&'a str>,
}

/// Resolve the run config: file (if given), then flag overrides.
pub fn load_config(opts: &RunOptions) -> Result<RunConfig, ConfigurationError> {
    let mut cfg = match opts.config {
        Some(path) => RunConfig::from_json_path(Path::new(path))?,
        None => RunConfig::default(),
    };
    if let Some(list) = opts.materials {
        cfg = cfg.with_material_list(list);
    }
    if let Some(root) = opts.root {
        cfg = cfg.with_root(root);
    }
    // Validate up front so a bad scope fails before any file is read.
    cfg.axis_index()?;
    Ok(cfg)
}

/// Load the config or exit with status 1.
pub fn config_or_exit(opts: &RunOptions) -> RunConfig {
    match load_config(opts) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

pub fn directory_source(cfg: &RunConfig) -> DirectorySource {
    DirectorySource::new(cfg.root.clone()).follow_links(cfg.follow_links)
}

/// Source for the configured root, which must be an existing directory.
pub fn checked_source(cfg: &RunConfig) -> Result<DirectorySource, ConfigurationError> {
    let source = directory_source(cfg);
    source.check_root()?;
    Ok(source)
}

/// Ingest every pappy file under the configured root.
pub fn build_dataset(cfg: &RunConfig) -> Result<(Dataset, IngestReport), ConfigurationError> {
    let index = cfg.axis_index()?;
    let source = checked_source(cfg)?;
    log::debug!(
        "root={} materials={:?} follow_links={}",
        cfg.root.display(),
        cfg.materials,
        cfg.follow_links
    );
    Ok(ingest_all(index, &source))
}

/// [`build_dataset`] or exit with status 1.
pub fn dataset_or_exit(opts: &RunOptions) -> (Dataset, IngestReport) {
    let cfg = config_or_exit(opts);
    match build_dataset(&cfg) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// `N file(s): a ingested, b out of scope, c rejected`
pub fn ingest_totals(report: &IngestReport) -> String {
    format!(
        "{} file(s): {} ingested, {} out of scope, {} rejected",
        report.total(),
        report.ingested,
        report.skipped,
        report.rejected.len()
    )
}

/// Ingestion totals plus every rejection.
pub fn print_ingest_report(report: &IngestReport) {
    println!("{}", ingest_totals(report));
    for rejection in &report.rejected {
        println!("  \u{274C} {:<40} {}", rejection.name, rejection.reason);
    }
}
