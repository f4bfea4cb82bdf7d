//! # Substitute a fixed column
//!
//! Adapt the bounds of the remaining rows and update the objective offset.
use crate::data::linear_program::model::presolve::{Index, Reduction};

impl Index<'_> {
    /// Substitute a column with a known value in the rows in which it appears.
    ///
    /// # Arguments
    ///
    /// * `column`: Index of a column with equal bounds.
    pub(in crate::data::linear_program::model::presolve) fn presolve_fixed_column(&mut self, column: usize) {
        debug_assert!(self.counters.is_column_active[column]);
        debug_assert!(self.is_column_fixed(column));

        let value = self.column_lower[column];
        let entries = self.counters.iter_active_column(column).collect::<Vec<_>>();
        for &(row, coefficient) in &entries {
            // Infinite bounds stay infinite
            self.row_lower[row] -= coefficient * value;
            self.row_upper[row] -= coefficient * value;
        }
        let cost = self.model.cost()[column];
        self.offset += cost * value;

        self.remove_column(column);
        self.reductions.push(Reduction::FixedColumn { column, value, cost, entries });
    }
}
