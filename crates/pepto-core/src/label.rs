//! Label decoding for pappy file names.
//!
//! A name looks like `{material}_{anneal}_{id}_trial_{nn}_pappy.csv`. The
//! extension and the trailing `pappy` token are dropped; the first token is
//! the material, the second the anneal type, and the last the trial number.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DecodeError;

/// Trailing token that marks a pappy result file.
pub const PAPPY_TOKEN: &str = "pappy";

/// The closed treatment axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Treatment {
    /// Heat-treated samples.
    Annealed,
    /// Untreated samples.
    Unannealed,
}

impl Treatment {
    /// Both treatments in row order.
    pub const ALL: [Treatment; 2] = [Treatment::Annealed, Treatment::Unannealed];

    /// Canonical token, as written in file names and exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Treatment::Annealed => "annealed",
            Treatment::Unannealed => "unannealed",
        }
    }

    /// Grid row of this treatment.
    pub fn row(self) -> usize {
        self as usize
    }

    pub fn from_row(row: usize) -> Option<Treatment> {
        Treatment::ALL.get(row).copied()
    }
}

impl fmt::Display for Treatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Treatment {
    type Err = ();

    /// Accepts the canonical tokens and the generic `treated` / `untreated`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "annealed" | "treated" => Ok(Treatment::Annealed),
            "unannealed" | "untreated" => Ok(Treatment::Unannealed),
            _ => Err(()),
        }
    }
}

/// Raw label tokens split out of a record name.
///
/// Nothing here is validated beyond token count: the material is resolved
/// (or skipped) against the run's scope before the treatment and trial are
/// decoded, so a record for an unwanted material never fails on its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTokens<'a> {
    pub material: &'a str,
    pub treatment: &'a str,
    pub trial: &'a str,
}

impl<'a> LabelTokens<'a> {
    /// Split a record name (file name or full path) into label tokens.
    pub fn split(name: &'a str) -> Result<Self, DecodeError> {
        let stem = file_stem(name);
        let mut tokens: Vec<&str> = stem.split('_').collect();
        if tokens.len() > 1 && tokens.last() == Some(&PAPPY_TOKEN) {
            tokens.pop();
        }
        if tokens.len() < 3 || tokens.iter().take(2).any(|t| t.is_empty()) {
            return Err(DecodeError::MalformedName {
                name: name.to_string(),
                found: tokens.len(),
            });
        }
        Ok(Self {
            material: tokens[0],
            treatment: tokens[1],
            trial: tokens[tokens.len() - 1],
        })
    }

    pub fn treatment(&self, name: &str) -> Result<Treatment, DecodeError> {
        self.treatment
            .parse()
            .map_err(|_| DecodeError::UnknownTreatment {
                name: name.to_string(),
                token: self.treatment.to_string(),
            })
    }

    pub fn trial(&self, name: &str) -> Result<u32, DecodeError> {
        self.trial.parse().map_err(|_| DecodeError::BadTrial {
            name: name.to_string(),
            token: self.trial.to_string(),
        })
    }
}

/// Fully decoded label of one sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LabelTriple {
    pub material: String,
    pub treatment: Treatment,
    pub trial: u32,
}

impl LabelTriple {
    /// Decode every part of a record name.
    pub fn parse(name: &str) -> Result<Self, DecodeError> {
        let tokens = LabelTokens::split(name)?;
        Ok(Self {
            material: tokens.material.to_string(),
            treatment: tokens.treatment(name)?,
            trial: tokens.trial(name)?,
        })
    }
}

impl fmt::Display for LabelTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Material: {} | Anneal Type: {} | Trial {}",
            title_case(&self.material),
            title_case(self.treatment.as_str()),
            self.trial
        )
    }
}

/// Capitalize the first character, as labels are shown in reports.
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Last path component with any extension removed.
fn file_stem(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    }
}
