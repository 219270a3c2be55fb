//! Ingestion: fold raw records into the aggregation grid.
//!
//! Each record is decoded completely before anything is written, so a record
//! either lands in every quantity slot of its cell plus one count, or not at
//! all. Records for materials outside the run's scope are skipped without
//! error; anything malformed is rejected with a [`DecodeError`].

use serde::Serialize;

use crate::axis::AxisIndex;
use crate::dataset::Dataset;
use crate::error::DecodeError;
use crate::grid::AggregationGrid;
use crate::label::{LabelTokens, LabelTriple};
use crate::quantity::Quantity;
use crate::source::{RecordSource, SampleRecord};

/// What happened to one record.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Folded into the grid at `(row, col)`.
    Ingested {
        label: LabelTriple,
        row: usize,
        col: usize,
    },
    /// Material not in the analysis scope.
    Skipped { material: String },
}

/// A record that could not be ingested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub name: String,
    pub reason: String,
}

/// Totals for one ingestion pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub ingested: usize,
    pub skipped: usize,
    pub rejected: Vec<Rejection>,
}

impl IngestReport {
    /// Records seen, whatever their outcome.
    pub fn total(&self) -> usize {
        self.ingested + self.skipped + self.rejected.len()
    }
}

/// Result of decoding a record against the run's axes.
enum Decision {
    Fold(Decoded),
    /// Material outside the scope.
    Skip(String),
}

/// A fully decoded, in-scope record ready to be written.
struct Decoded {
    label: LabelTriple,
    row: usize,
    col: usize,
    values: [f64; Quantity::COUNT],
}

/// Owns the grid while it is being filled.
///
/// Consumed by [`Ingestor::finish`], after which the grid is only reachable
/// read-only through the returned [`Dataset`].
#[derive(Debug)]
pub struct Ingestor {
    index: AxisIndex,
    grid: AggregationGrid,
    report: IngestReport,
}

impl Ingestor {
    /// Start a run with an empty grid shaped by `index`.
    pub fn new(index: AxisIndex) -> Self {
        let grid = AggregationGrid::new(index.rows(), index.cols());
        Self {
            index,
            grid,
            report: IngestReport::default(),
        }
    }

    pub fn index(&self) -> &AxisIndex {
        &self.index
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    /// Decode and fold a single record.
    pub fn ingest_record(&mut self, record: &SampleRecord) -> Result<IngestOutcome, DecodeError> {
        match decode(&self.index, record) {
            Ok(Decision::Fold(decoded)) => {
                self.grid
                    .push_sample(decoded.row, decoded.col, &decoded.values);
                self.report.ingested += 1;
                log::debug!("{}", decoded.label);
                Ok(IngestOutcome::Ingested {
                    label: decoded.label,
                    row: decoded.row,
                    col: decoded.col,
                })
            }
            Ok(Decision::Skip(material)) => {
                self.report.skipped += 1;
                log::debug!("{}: material '{material}' not in scope, skipped", record.name);
                Ok(IngestOutcome::Skipped { material })
            }
            Err(e) => {
                self.reject(&record.name, &e);
                Err(e)
            }
        }
    }

    /// Fold every record from a source. Per-record failures are collected in
    /// the report and never stop the pass.
    pub fn ingest_source<S: RecordSource + ?Sized>(&mut self, source: &S) -> &IngestReport {
        self.ingest(source.records())
    }

    /// Account for a record the source could not read or parse.
    ///
    /// Scope is still checked first: a failure on a file whose name resolves
    /// to a material outside the run is a skip, not a rejection.
    pub fn ingest_failure(&mut self, e: DecodeError) -> Result<IngestOutcome, DecodeError> {
        let name = e.record_name();
        let unscoped = LabelTokens::split(name)
            .ok()
            .filter(|tokens| self.index.col_of(tokens.material).is_none())
            .map(|tokens| tokens.material.to_string());

        match unscoped {
            Some(material) => {
                self.report.skipped += 1;
                log::debug!("{name}: material '{material}' not in scope, skipped");
                Ok(IngestOutcome::Skipped { material })
            }
            None => {
                let name = name.to_string();
                self.reject(&name, &e);
                Err(e)
            }
        }
    }

    /// Fold a sequence of records (or upstream read failures).
    pub fn ingest<I>(&mut self, records: I) -> &IngestReport
    where
        I: IntoIterator<Item = Result<SampleRecord, DecodeError>>,
    {
        for record in records {
            // Rejections are recorded as they happen.
            let _ = match record {
                Ok(record) => self.ingest_record(&record),
                Err(e) => self.ingest_failure(e),
            };
        }
        &self.report
    }

    /// End the ingestion pass.
    pub fn finish(self) -> (Dataset, IngestReport) {
        debug_assert!(self.grid.is_consistent());
        log::info!(
            "ingested {} record(s), skipped {}, rejected {}",
            self.report.ingested,
            self.report.skipped,
            self.report.rejected.len()
        );
        (Dataset::new(self.index, self.grid), self.report)
    }

    fn reject(&mut self, name: &str, e: &DecodeError) {
        log::warn!("rejected record: {e}");
        self.report.rejected.push(Rejection {
            name: name.to_string(),
            reason: e.to_string(),
        });
    }
}

/// Convenience: one full run over a source.
pub fn ingest_all<S: RecordSource + ?Sized>(index: AxisIndex, source: &S) -> (Dataset, IngestReport) {
    let mut ingestor = Ingestor::new(index);
    ingestor.ingest_source(source);
    ingestor.finish()
}

/// Decode a record against the run's axes.
///
/// Material is resolved before treatment and trial so unwanted records never
/// fail on their label.
fn decode(index: &AxisIndex, record: &SampleRecord) -> Result<Decision, DecodeError> {
    let name = record.name.as_str();
    let tokens = LabelTokens::split(name)?;

    let Some(col) = index.col_of(tokens.material) else {
        return Ok(Decision::Skip(tokens.material.to_string()));
    };
    let row = index
        .row_of(tokens.treatment)
        .ok_or_else(|| DecodeError::UnknownTreatment {
            name: name.to_string(),
            token: tokens.treatment.to_string(),
        })?;
    let trial = tokens.trial(name)?;
    let values = parse_values(name, &record.fields)?;

    Ok(Decision::Fold(Decoded {
        label: LabelTriple {
            material: tokens.material.to_string(),
            treatment: index.treatments()[row],
            trial,
        },
        row,
        col,
        values,
    }))
}

/// Parse the six quantity fields in schema order; trailing fields are ignored.
fn parse_values(name: &str, fields: &[String]) -> Result<[f64; Quantity::COUNT], DecodeError> {
    if fields.len() < Quantity::COUNT {
        return Err(DecodeError::FieldCount {
            name: name.to_string(),
            expected: Quantity::COUNT,
            found: fields.len(),
        });
    }

    let mut values = [0.0; Quantity::COUNT];
    for (slot, (quantity, raw)) in values.iter_mut().zip(Quantity::ALL.iter().zip(fields)) {
        *slot = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| DecodeError::NonNumeric {
                name: name.to_string(),
                field: quantity.name(),
                value: raw.clone(),
            })?;
    }
    Ok(values)
}
