//! # pepto-core
//!
//! **Aggregation engine for positron annihilation pappy files.**
//!
//! Each `*_pappy.csv` file holds one sample: an S parameter, left and right
//! W wing parameters, and their uncertainties. The file name encodes the
//! material, the anneal state, and the trial number. `pepto-core` discovers
//! those files, folds them into an anneal × material × quantity grid, and
//! answers statistical queries over it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pepto_core::{DirectorySource, RunConfig, ingest_all};
//!
//! let config = RunConfig::default()
//!     .with_material_list("gold,copper")
//!     .with_root("data/june");
//! let index = config.axis_index()?;
//! let source = DirectorySource::new(config.root.clone());
//! let (dataset, report) = ingest_all(index, &source);
//!
//! println!("{} ingested, {} rejected", report.ingested, report.rejected.len());
//! for entry in dataset.summary_table().entries {
//!     println!("{} {} {:?}", entry.material, entry.treatment, entry.mean_s);
//! }
//! # Ok::<(), pepto_core::ConfigurationError>(())
//! ```
//!
//! ## Architecture
//!
//! RecordSource → Ingestor (decode, fold) → Dataset (read-only) → export
//!
//! Rows are the two anneal states, columns the configured materials, and the
//! depth axis the six measured quantities plus a sample count. Every cell
//! holds raw sequences, not running statistics, so means and fits are always
//! computed from the samples themselves. An empty cell reports no data,
//! never `0.0`.

pub mod axis;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod grid;
pub mod ingest;
pub mod label;
pub mod quantity;
pub mod source;
pub mod stats;

pub use axis::AxisIndex;
pub use config::{DEFAULT_MATERIALS, RunConfig};
pub use dataset::{Dataset, MaterialTrend, SummaryEntry, SummaryTable};
pub use error::{ConfigurationError, DecodeError, InsufficientDataError, LookupError};
pub use export::{RunReport, TrendEntry, date_stamp, render_grid, render_summary, render_trends};
pub use grid::{AggregationGrid, Cell};
pub use ingest::{IngestOutcome, IngestReport, Ingestor, Rejection, ingest_all};
pub use label::{LabelTriple, Treatment};
pub use quantity::{COUNT_DEPTH, GRID_DEPTH, N_SAMPLES, Quantity};
pub use source::{DirectorySource, RecordSource, SampleRecord};
pub use stats::{LinearFit, WidthSample, linear_fit};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
