//! Error types for the aggregation pipeline.
//!
//! Each failure class has its own type so callers can tell a bad run
//! configuration (abort) from a single malformed record (report and continue)
//! or a statistic that has nothing to work with (render "no data").

use thiserror::Error;

/// Invalid material scope or run configuration. Aborts the run before ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("material scope is empty; select at least one material to analyze")]
    EmptyMaterials,

    #[error("material label at position {position} is blank")]
    BlankMaterial { position: usize },

    #[error("material '{material}' is listed more than once")]
    DuplicateMaterial { material: String },

    #[error("data root {path} is not a readable directory")]
    MissingRoot { path: String },

    #[error("failed to read config {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("invalid config {path}: {reason}")]
    Invalid { path: String, reason: String },
}

/// A record whose name or body does not follow the pappy file schema.
///
/// Fatal for that record only; ingestion keeps going with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{name}: expected at least 3 '_'-separated tokens, found {found}")]
    MalformedName { name: String, found: usize },

    #[error("{name}: unknown anneal type '{token}' (expected annealed or unannealed)")]
    UnknownTreatment { name: String, token: String },

    #[error("{name}: trial token '{token}' is not a number")]
    BadTrial { name: String, token: String },

    #[error("{name}: expected {expected} quantity fields, found {found}")]
    FieldCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("{name}: field '{field}' has non-numeric value '{value}'")]
    NonNumeric {
        name: String,
        field: &'static str,
        value: String,
    },

    #[error("{name}: no data row after the header")]
    MissingDataRow { name: String },

    #[error("{name}: {reason}")]
    Unreadable { name: String, reason: String },
}

impl DecodeError {
    /// Name of the record that failed.
    pub fn record_name(&self) -> &str {
        match self {
            DecodeError::MalformedName { name, .. }
            | DecodeError::UnknownTreatment { name, .. }
            | DecodeError::BadTrial { name, .. }
            | DecodeError::FieldCount { name, .. }
            | DecodeError::NonNumeric { name, .. }
            | DecodeError::MissingDataRow { name }
            | DecodeError::Unreadable { name, .. } => name,
        }
    }
}

/// A label-addressed query named something outside the run's axes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("quantity '{name}' not found; expected one of: {expected}")]
    UnknownQuantity { name: String, expected: String },

    #[error("material '{material}' is not part of this analysis")]
    UnscopedMaterial { material: String },
}

/// A derived statistic was requested over too little data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsufficientDataError {
    #[error("need at least {needed} paired samples for a line fit, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("x and y sample counts differ ({xs} vs {ys})")]
    Unpaired { xs: usize, ys: usize },

    #[error("all x values are identical; slope is undefined")]
    ZeroVariance,
}
