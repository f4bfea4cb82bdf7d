//! # Counters
//!
//! A set of counters that makes searching during presolving unnecessary.
use crate::data::linear_algebra::matrix::RowMatrix;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_program::model::Model;

/// Avoiding searching during presolving.
pub(super) struct Counters<'a> {
    /// Number of entries still in each row.
    ///
    /// The row should at least be considered when the counter drops below 2.
    pub row: Vec<usize>,
    /// Number of entries still in each column.
    pub column: Vec<usize>,

    pub is_row_active: Vec<bool>,
    pub is_column_active: Vec<bool>,

    /// Row major representation of the constraint matrix.
    rows: RowMatrix,
    model: &'a Model,
}

impl<'a> Counters<'a> {
    /// Create a new instance.
    ///
    /// Create a row major representation of the problem, which is expensive. Doing this once allows
    /// quick iteration over rows, which is helpful for interacting with the constraints.
    pub fn new(model: &'a Model) -> Self {
        let rows = model.row_matrix();

        Self {
            row: (0..model.nr_rows()).map(|i| rows.major_len(i)).collect(),
            column: (0..model.nr_columns()).map(|j| model.matrix().major_len(j)).collect(),

            is_row_active: vec![true; model.nr_rows()],
            is_column_active: vec![true; model.nr_columns()],

            rows,
            model,
        }
    }

    /// Iterate over the entries of a row that are in columns that are still active.
    pub fn iter_active_row(&self, row: usize) -> impl Iterator<Item = SparseTuple<f64>> + '_ {
        debug_assert!(self.is_row_active[row]);

        self.rows.row(row).filter(move |&(j, _)| self.is_column_active[j])
    }

    /// Iterate over the entries of a column that are in rows that are still active.
    pub fn iter_active_column(&self, column: usize) -> impl Iterator<Item = SparseTuple<f64>> + '_ {
        debug_assert!(self.is_column_active[column]);

        self.model.matrix().column(column).filter(move |&(i, _)| self.is_row_active[i])
    }
}
