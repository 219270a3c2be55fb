//! Read-only view of a finished ingestion run.
//!
//! A [`Dataset`] pairs the run's [`AxisIndex`] with its filled grid and
//! answers every statistical query. It has no mutators; a new run needs a
//! new [`Ingestor`](crate::ingest::Ingestor).

use serde::Serialize;

use crate::axis::AxisIndex;
use crate::error::{InsufficientDataError, LookupError};
use crate::grid::{AggregationGrid, Cell};
use crate::label::Treatment;
use crate::quantity::{COUNT_DEPTH, GRID_DEPTH, Quantity};
use crate::stats::{self, LinearFit, WidthSample};

/// One row of the cross-tabulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub material: String,
    pub treatment: Treatment,
    pub count: usize,
    /// Mean S parameter, `None` when the cell has no samples.
    pub mean_s: Option<f64>,
    /// Mean S uncertainty, `None` when the cell has no samples.
    pub mean_s_uncertainty: Option<f64>,
}

/// Material × anneal cross-tabulation in axis order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub entries: Vec<SummaryEntry>,
}

impl SummaryTable {
    pub fn get(&self, material: &str, treatment: Treatment) -> Option<&SummaryEntry> {
        self.entries
            .iter()
            .find(|e| e.material == material && e.treatment == treatment)
    }
}

/// S-vs-W fit for one material, both anneal states pooled.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialTrend {
    pub material: String,
    pub samples: usize,
    pub fit: Result<LinearFit, InsufficientDataError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    index: AxisIndex,
    grid: AggregationGrid,
}

impl Dataset {
    pub(crate) fn new(index: AxisIndex, grid: AggregationGrid) -> Self {
        Self { index, grid }
    }

    pub fn index(&self) -> &AxisIndex {
        &self.index
    }

    pub fn grid(&self) -> &AggregationGrid {
        &self.grid
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.grid.cell(row, col)
    }

    /// Mean of the sequence at `(row, col, depth)`.
    ///
    /// `None` means no samples. At the count depth the count itself is
    /// returned, again `None` when it is zero.
    ///
    /// # Panics
    /// If `depth` is past the count slot, like an out-of-range cell.
    pub fn mean_of(&self, row: usize, col: usize, depth: usize) -> Option<f64> {
        assert!(
            depth < GRID_DEPTH,
            "depth {depth} outside grid depth {GRID_DEPTH}"
        );
        if depth == COUNT_DEPTH {
            let count = self.grid.count(row, col);
            return (count > 0).then_some(count as f64);
        }
        self.grid
            .sequence(row, col, depth)
            .and_then(stats::mean)
    }

    /// [`mean_of`](Self::mean_of) addressed by labels.
    pub fn mean_by_name(
        &self,
        material: &str,
        treatment: Treatment,
        quantity: &str,
    ) -> Result<Option<f64>, LookupError> {
        let col = self.index.require_col(material)?;
        let depth = self.index.depth_of(quantity)?;
        Ok(self.mean_of(treatment.row(), col, depth))
    }

    /// Count, mean S and mean S uncertainty for every material × anneal cell.
    pub fn summary_table(&self) -> SummaryTable {
        let entries = self
            .index
            .materials()
            .iter()
            .enumerate()
            .flat_map(|(col, material)| {
                self.index.treatments().into_iter().map(move |treatment| {
                    let row = treatment.row();
                    SummaryEntry {
                        material: material.clone(),
                        treatment,
                        count: self.grid.count(row, col),
                        mean_s: self.mean_of(row, col, Quantity::SParameter.depth()),
                        mean_s_uncertainty: self.mean_of(
                            row,
                            col,
                            Quantity::SUncertainty.depth(),
                        ),
                    }
                })
            })
            .collect();
        SummaryTable { entries }
    }

    /// Per-sample composite W width and its propagated uncertainty.
    pub fn composite_width_series(&self, row: usize, col: usize) -> Vec<WidthSample> {
        let cell = self.grid.cell(row, col);
        let left = cell.values(Quantity::LeftWParameter);
        let left_unc = cell.values(Quantity::LeftWUncertainty);
        let right = cell.values(Quantity::RightWParameter);
        let right_unc = cell.values(Quantity::RightWUncertainty);

        (0..cell.count())
            .map(|i| WidthSample::from_wings(left[i], left_unc[i], right[i], right_unc[i]))
            .collect()
    }

    /// Fit S against W for one cell.
    pub fn s_vs_w_fit(&self, row: usize, col: usize) -> Result<LinearFit, InsufficientDataError> {
        let widths: Vec<f64> = self
            .composite_width_series(row, col)
            .iter()
            .map(|w| w.width)
            .collect();
        stats::linear_fit(&widths, self.cell(row, col).values(Quantity::SParameter))
    }

    /// Fit S against W for every material, pooling both anneal states in row order.
    pub fn s_vs_w_trends(&self) -> Vec<MaterialTrend> {
        self.index
            .materials()
            .iter()
            .enumerate()
            .map(|(col, material)| {
                let mut widths = Vec::new();
                let mut s_values = Vec::new();
                for treatment in self.index.treatments() {
                    let row = treatment.row();
                    widths.extend(
                        self.composite_width_series(row, col)
                            .iter()
                            .map(|w| w.width),
                    );
                    s_values.extend_from_slice(self.cell(row, col).values(Quantity::SParameter));
                }
                MaterialTrend {
                    material: material.clone(),
                    samples: widths.len(),
                    fit: stats::linear_fit(&widths, &s_values),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ingest_all;
    use crate::source::SampleRecord;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn gold_dataset() -> Dataset {
        let records = vec![
            SampleRecord::from_values("gold_treated_1", &[0.55, 0.003, 0.25, 0.002, 0.26, 0.002]),
            SampleRecord::from_values("gold_treated_2", &[0.57, 0.0032, 0.24, 0.002, 0.27, 0.002]),
        ];
        let index = AxisIndex::new(["gold", "copper"]).unwrap();
        ingest_all(index, &records).0
    }

    #[test]
    fn test_mean_of_filled_cell() {
        let data = gold_dataset();
        assert!(approx(data.mean_of(0, 0, 0).unwrap(), 0.56));
        assert!(approx(data.mean_of(0, 0, 1).unwrap(), 0.0031));
        assert_eq!(data.mean_of(0, 0, COUNT_DEPTH), Some(2.0));
    }

    #[test]
    fn test_mean_of_empty_cell_is_no_data() {
        let data = gold_dataset();
        assert_eq!(data.mean_of(1, 0, 0), None);
        assert_eq!(data.mean_of(0, 1, 3), None);
        assert_eq!(data.mean_of(0, 1, COUNT_DEPTH), None);
    }

    #[test]
    #[should_panic(expected = "outside grid depth")]
    fn test_mean_of_depth_past_count_slot_panics() {
        let _ = gold_dataset().mean_of(0, 0, GRID_DEPTH);
    }

    #[test]
    fn test_mean_by_name() {
        let data = gold_dataset();
        let m = data
            .mean_by_name("gold", Treatment::Annealed, "Left W Parameter")
            .unwrap()
            .unwrap();
        assert!(approx(m, 0.245));
        assert!(matches!(
            data.mean_by_name("gold", Treatment::Annealed, "W"),
            Err(LookupError::UnknownQuantity { .. })
        ));
        assert!(matches!(
            data.mean_by_name("lead", Treatment::Annealed, "S Parameter"),
            Err(LookupError::UnscopedMaterial { .. })
        ));
    }

    #[test]
    fn test_summary_table_order_and_values() {
        let table = gold_dataset().summary_table();
        let keys: Vec<(&str, Treatment)> = table
            .entries
            .iter()
            .map(|e| (e.material.as_str(), e.treatment))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("gold", Treatment::Annealed),
                ("gold", Treatment::Unannealed),
                ("copper", Treatment::Annealed),
                ("copper", Treatment::Unannealed),
            ]
        );
        let gold = table.get("gold", Treatment::Annealed).unwrap();
        assert_eq!(gold.count, 2);
        assert!(approx(gold.mean_s.unwrap(), 0.56));
        let copper = table.get("copper", Treatment::Unannealed).unwrap();
        assert_eq!(copper.count, 0);
        assert_eq!(copper.mean_s, None);
    }

    #[test]
    fn test_composite_width_series_matches_count() {
        let data = gold_dataset();
        let series = data.composite_width_series(0, 0);
        assert_eq!(series.len(), data.grid().count(0, 0));
        assert!(approx(series[0].width, (0.25f64 * 0.25 + 0.26 * 0.26).sqrt()));
        assert!(approx(series[0].uncertainty, (2.0f64 * 0.002 * 0.002).sqrt()));
        assert!(data.composite_width_series(1, 1).is_empty());
    }

    #[test]
    fn test_s_vs_w_fit_two_points() {
        let data = gold_dataset();
        let fit = data.s_vs_w_fit(0, 0).unwrap();
        assert_eq!(fit.points, 2);
        assert!(approx(fit.r_squared, 1.0));
        assert!(matches!(
            data.s_vs_w_fit(1, 0),
            Err(InsufficientDataError::TooFewPoints { got: 0, .. })
        ));
    }

    #[test]
    fn test_trends_cover_every_material() {
        let trends = gold_dataset().s_vs_w_trends();
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].material, "gold");
        assert_eq!(trends[0].samples, 2);
        assert!(trends[0].fit.is_ok());
        assert_eq!(trends[1].samples, 0);
        assert!(trends[1].fit.is_err());
    }
}
