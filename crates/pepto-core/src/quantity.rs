//! The fixed quantity schema of a pappy record.
//!
//! Six measured quantities occupy depths 0..6 of the grid in file column
//! order; depth 6 is the reserved sample-count slot.

use std::fmt;

use serde::Serialize;

/// Name of the reserved count slot as it appears in exports.
pub const N_SAMPLES: &str = "N Samples";

/// Depth of the count slot.
pub const COUNT_DEPTH: usize = Quantity::COUNT;

/// Total grid depth: every measured quantity plus the count slot.
pub const GRID_DEPTH: usize = Quantity::COUNT + 1;

/// One measured quantity of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Quantity {
    SParameter,
    SUncertainty,
    LeftWParameter,
    LeftWUncertainty,
    RightWParameter,
    RightWUncertainty,
}

impl Quantity {
    /// Number of measured quantities (the count slot is not a quantity).
    pub const COUNT: usize = 6;

    /// All quantities in file column / grid depth order.
    pub const ALL: [Quantity; Quantity::COUNT] = [
        Quantity::SParameter,
        Quantity::SUncertainty,
        Quantity::LeftWParameter,
        Quantity::LeftWUncertainty,
        Quantity::RightWParameter,
        Quantity::RightWUncertainty,
    ];

    /// Column name used in pappy files and exports.
    pub fn name(self) -> &'static str {
        match self {
            Quantity::SParameter => "S Parameter",
            Quantity::SUncertainty => "S Uncertainty",
            Quantity::LeftWParameter => "Left W Parameter",
            Quantity::LeftWUncertainty => "Left W Uncertainty",
            Quantity::RightWParameter => "Right W Parameter",
            Quantity::RightWUncertainty => "Right W Uncertainty",
        }
    }

    /// Grid depth of this quantity.
    pub fn depth(self) -> usize {
        self as usize
    }

    /// Quantity stored at `depth`, or `None` for the count slot and beyond.
    pub fn from_depth(depth: usize) -> Option<Quantity> {
        Quantity::ALL.get(depth).copied()
    }

    /// Exact-name lookup against the schema.
    pub fn from_name(name: &str) -> Option<Quantity> {
        Quantity::ALL.into_iter().find(|q| q.name() == name)
    }

    /// The uncertainty paired with a parameter, or `None` if `self` already is one.
    pub fn uncertainty(self) -> Option<Quantity> {
        match self {
            Quantity::SParameter => Some(Quantity::SUncertainty),
            Quantity::LeftWParameter => Some(Quantity::LeftWUncertainty),
            Quantity::RightWParameter => Some(Quantity::RightWUncertainty),
            _ => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every name accepted by depth lookups, count slot included, in depth order.
pub fn schema_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Quantity::ALL.iter().map(|q| q.name()).collect();
    names.push(N_SAMPLES);
    names
}
