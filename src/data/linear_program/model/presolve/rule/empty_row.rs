//! # Remove an empty row
use crate::data::linear_program::model::presolve::{Index, PresolveStatus, Reduction};

impl Index<'_> {
    /// Remove a row without entries, if zero is within its bounds.
    ///
    /// # Return value
    ///
    /// `Err` with the `Infeasible` status if zero is not within the bounds.
    pub(in crate::data::linear_program::model::presolve) fn presolve_empty_row(
        &mut self,
        row: usize,
    ) -> Result<(), PresolveStatus> {
        debug_assert_eq!(self.counters.row[row], 0);

        if self.row_lower[row] > self.tolerance || self.row_upper[row] < -self.tolerance {
            return Err(PresolveStatus::Infeasible);
        }

        self.remove_row(row);
        self.reductions.push(Reduction::EmptyRow { row });
        Ok(())
    }
}
