//! Dense anneal × material × quantity grid of raw sample sequences.

use crate::quantity::{GRID_DEPTH, Quantity};

/// One (row, col) cell: a sequence per measured quantity plus the sample count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    sequences: [Vec<f64>; Quantity::COUNT],
    count: usize,
}

impl Cell {
    /// Raw values of one quantity in ingestion order.
    pub fn values(&self, quantity: Quantity) -> &[f64] {
        &self.sequences[quantity.depth()]
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Per-sample rows: the six quantities of sample `i` in depth order.
    pub fn samples(&self) -> impl Iterator<Item = [f64; Quantity::COUNT]> + '_ {
        (0..self.count).map(move |i| std::array::from_fn(|d| self.sequences[d][i]))
    }

    /// Append one sample to every sequence and bump the count as a single step.
    fn push(&mut self, values: &[f64; Quantity::COUNT]) {
        for (seq, &v) in self.sequences.iter_mut().zip(values) {
            seq.push(v);
        }
        self.count += 1;
    }
}

/// Shape `(2, M, 7)` grid. Cells are stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl AggregationGrid {
    /// Empty grid with `rows × cols` cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, GRID_DEPTH)
    }

    /// Cell at `(row, col)`.
    ///
    /// # Panics
    /// If the coordinate is outside the grid. Coordinates come from the
    /// run's [`AxisIndex`](crate::axis::AxisIndex), so this is a caller bug.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[self.offset(row, col)]
    }

    /// Raw sequence at `(row, col, depth)`; `None` for the count slot.
    pub fn sequence(&self, row: usize, col: usize, depth: usize) -> Option<&[f64]> {
        Quantity::from_depth(depth).map(|q| self.cell(row, col).values(q))
    }

    /// Count slot at `(row, col)`.
    pub fn count(&self, row: usize, col: usize) -> usize {
        self.cell(row, col).count
    }

    /// Samples across every cell.
    pub fn total_count(&self) -> usize {
        self.cells.iter().map(|c| c.count).sum()
    }

    /// True when every cell's count equals the length of each of its sequences.
    pub fn is_consistent(&self) -> bool {
        self.cells
            .iter()
            .all(|c| c.sequences.iter().all(|s| s.len() == c.count))
    }

    /// Fold one fully decoded record into `(row, col)`.
    pub(crate) fn push_sample(&mut self, row: usize, col: usize, values: &[f64; Quantity::COUNT]) {
        let offset = self.offset(row, col);
        self.cells[offset].push(values);
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) outside grid of {} rows x {} cols",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}
