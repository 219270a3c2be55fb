//! Run configuration: which materials are analyzed and where files live.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::axis::AxisIndex;
use crate::error::ConfigurationError;

/// Materials analyzed when the caller does not choose.
pub const DEFAULT_MATERIALS: &[&str] = &["nickel", "aluminum", "tungsten", "gold", "copper", "lead"];

/// Configuration for one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Materials in scope, in report column order.
    pub materials: Vec<String>,
    /// Directory searched recursively for pappy files.
    pub root: PathBuf,
    /// Follow symlinks while searching.
    pub follow_links: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            materials: DEFAULT_MATERIALS.iter().map(|m| m.to_string()).collect(),
            root: PathBuf::from("."),
            follow_links: false,
        }
    }
}

impl RunConfig {
    /// Load a JSON config file. Missing keys fall back to defaults.
    pub fn from_json_path(path: &Path) -> Result<Self, ConfigurationError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigurationError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|e| ConfigurationError::Invalid {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Replace the material scope with a comma-separated list.
    pub fn with_material_list(mut self, list: &str) -> Self {
        self.materials = parse_material_list(list);
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Validate the material scope and build the run's axis index.
    pub fn axis_index(&self) -> Result<AxisIndex, ConfigurationError> {
        AxisIndex::new(self.materials.iter().cloned())
    }
}

/// Split `"gold, copper ,lead"` into trimmed names. Empty entries are kept so
/// that validation can point at them.
pub fn parse_material_list(list: &str) -> Vec<String> {
    list.split(',').map(|m| m.trim().to_string()).collect()
}
