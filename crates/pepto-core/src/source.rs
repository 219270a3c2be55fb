//! Record sources: where raw pappy records come from.
//!
//! A source only enumerates and reads; it never decides whether a record is
//! in scope or well formed. That is left to [`crate::ingest`].
//!
//! # File layout
//!
//! A pappy file is a small CSV: one header row, then a data row whose first
//! column is the sample name and whose next six columns are the quantities in
//! schema order. Extra trailing columns (pandas leaves an unnamed index
//! column behind) are ignored downstream.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ConfigurationError, DecodeError};

/// File name suffix of pappy result files.
pub const PAPPY_SUFFIX: &str = "_pappy.csv";

/// A raw record: identifying name plus the body fields after the name column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    /// Name the label triple is decoded from (usually the path relative to the root).
    pub name: String,
    /// Raw quantity fields, not yet parsed.
    pub fields: Vec<String>,
}

impl SampleRecord {
    pub fn new<N, I, F>(name: N, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a record from already-numeric values.
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().map(|v| v.to_string()))
    }
}

/// Anything that can enumerate raw records.
///
/// Failures reading an individual record are returned in place so one bad
/// file never hides the others.
pub trait RecordSource {
    fn records(&self) -> Vec<Result<SampleRecord, DecodeError>>;
}

impl RecordSource for Vec<SampleRecord> {
    fn records(&self) -> Vec<Result<SampleRecord, DecodeError>> {
        self.iter().cloned().map(Ok).collect()
    }
}

impl RecordSource for [SampleRecord] {
    fn records(&self) -> Vec<Result<SampleRecord, DecodeError>> {
        self.iter().cloned().map(Ok).collect()
    }
}

// ---------------------------------------------------------------------------
// Directory source
// ---------------------------------------------------------------------------

/// Recursively discovers `*_pappy.csv` files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    follow_links: bool,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
        }
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fail early when the root is not a directory. The walk itself only
    /// warns about entries it cannot read.
    pub fn check_root(&self) -> Result<(), ConfigurationError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(ConfigurationError::MissingRoot {
                path: self.root.display().to_string(),
            })
        }
    }

    /// All pappy files below the root, sorted by path.
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(&self.root);
        if self.follow_links {
            walker = walker.follow_links(true);
        }
        let mut paths: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("skipping unreadable directory entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| is_pappy_file(entry.path()))
            .map(|entry| entry.into_path())
            .collect();
        paths.sort();
        log::debug!(
            "discovered {} pappy file(s) under {}",
            paths.len(),
            self.root.display()
        );
        paths
    }

    /// Name a discovered path is reported under: relative to the root when possible.
    fn record_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

impl RecordSource for DirectorySource {
    fn records(&self) -> Vec<Result<SampleRecord, DecodeError>> {
        self.discover()
            .iter()
            .map(|path| {
                let name = self.record_name(path);
                let contents = fs::read_to_string(path).map_err(|e| DecodeError::Unreadable {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
                parse_record(&name, &contents)
            })
            .collect()
    }
}

/// True for regular pappy result file names.
pub fn is_pappy_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(PAPPY_SUFFIX))
}

/// Parse the body of a pappy file: skip the header, take the first data row,
/// drop the leading name column.
pub fn parse_record(name: &str, contents: &str) -> Result<SampleRecord, DecodeError> {
    let row = contents
        .lines()
        .skip(1)
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| DecodeError::MissingDataRow {
            name: name.to_string(),
        })?;

    let fields = split_csv_line(row).into_iter().skip(1).collect();
    Ok(SampleRecord {
        name: name.to_string(),
        fields,
    })
}

/// Split one CSV line, honouring double-quoted fields.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches(['\r', '\n']).chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields.into_iter().map(|f| f.trim().to_string()).collect()
}
