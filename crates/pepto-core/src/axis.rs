//! Bidirectional label ↔ coordinate mapping for the three grid axes.

use std::collections::HashMap;

use crate::error::{ConfigurationError, LookupError};
use crate::label::Treatment;
use crate::quantity::{self, COUNT_DEPTH, GRID_DEPTH, N_SAMPLES, Quantity};

/// Axis index for one aggregation run.
///
/// Rows are the two anneal types, columns the materials in caller order,
/// depths the quantity schema followed by the count slot. Fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisIndex {
    materials: Vec<String>,
    material_cols: HashMap<String, usize>,
}

impl AxisIndex {
    /// Build the index from the materials selected for analysis.
    pub fn new<I, S>(materials: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let materials: Vec<String> = materials.into_iter().map(Into::into).collect();
        if materials.is_empty() {
            return Err(ConfigurationError::EmptyMaterials);
        }

        let mut material_cols = HashMap::with_capacity(materials.len());
        for (col, material) in materials.iter().enumerate() {
            if material.trim().is_empty() {
                return Err(ConfigurationError::BlankMaterial { position: col });
            }
            if material_cols.insert(material.clone(), col).is_some() {
                return Err(ConfigurationError::DuplicateMaterial {
                    material: material.clone(),
                });
            }
        }

        Ok(Self {
            materials,
            material_cols,
        })
    }

    /// Row of an anneal-type token, `None` for anything outside the closed axis.
    ///
    /// The caller owns the record name and builds the decode error from it.
    pub fn row_of(&self, treatment: &str) -> Option<usize> {
        treatment.parse::<Treatment>().ok().map(Treatment::row)
    }

    /// Column of a material, or `None` when it is outside the analysis scope.
    pub fn col_of(&self, material: &str) -> Option<usize> {
        self.material_cols.get(material).copied()
    }

    /// Depth of a quantity name, count slot included.
    pub fn depth_of(&self, quantity_name: &str) -> Result<usize, LookupError> {
        if quantity_name == N_SAMPLES {
            return Ok(COUNT_DEPTH);
        }
        Quantity::from_name(quantity_name)
            .map(Quantity::depth)
            .ok_or_else(|| LookupError::UnknownQuantity {
                name: quantity_name.to_string(),
                expected: quantity::schema_names().join(", "),
            })
    }

    /// Column of a material, as a lookup failure when unscoped.
    pub fn require_col(&self, material: &str) -> Result<usize, LookupError> {
        self.col_of(material)
            .ok_or_else(|| LookupError::UnscopedMaterial {
                material: material.to_string(),
            })
    }

    /// Materials in caller order.
    pub fn materials(&self) -> &[String] {
        &self.materials
    }

    /// Treatments in row order.
    pub fn treatments(&self) -> [Treatment; 2] {
        Treatment::ALL
    }

    pub fn material_at(&self, col: usize) -> Option<&str> {
        self.materials.get(col).map(String::as_str)
    }

    pub fn rows(&self) -> usize {
        Treatment::ALL.len()
    }

    pub fn cols(&self) -> usize {
        self.materials.len()
    }

    /// Grid shape as `(rows, cols, depth)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.rows(), self.cols(), GRID_DEPTH)
    }
}
