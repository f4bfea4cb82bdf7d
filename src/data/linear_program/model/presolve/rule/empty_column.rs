//! # Remove an empty column
//!
//! A column that appears in no row only influences the objective, and can be set to the bound its
//! cost favours.
use crate::data::linear_program::elements::BoundDirection;
use crate::data::linear_program::model::presolve::{Index, PresolveStatus, Reduction};

impl Index<'_> {
    /// Set a column without entries to its best value.
    ///
    /// # Return value
    ///
    /// `Err` with the `Unbounded` status if the cost favours an infinite bound.
    pub(in crate::data::linear_program::model::presolve) fn presolve_empty_column(
        &mut self,
        column: usize,
    ) -> Result<(), PresolveStatus> {
        debug_assert_eq!(self.counters.column[column], 0);

        let cost = self.model.cost()[column];
        let lower = self.column_lower[column];
        let upper = self.column_upper[column];
        // In the minimization sense
        let direction = self.model.objective().sign() * cost;
        let bound = if direction > 0_f64 {
            Some(BoundDirection::Lower)
        } else if direction < 0_f64 {
            Some(BoundDirection::Upper)
        } else if lower.is_finite() {
            Some(BoundDirection::Lower)
        } else if upper.is_finite() {
            Some(BoundDirection::Upper)
        } else {
            None
        };
        let value = match bound {
            Some(BoundDirection::Lower) => lower,
            Some(BoundDirection::Upper) => upper,
            None => 0_f64,
        };
        if !value.is_finite() {
            return Err(PresolveStatus::Unbounded);
        }

        self.offset += cost * value;
        self.remove_column(column);
        self.reductions.push(Reduction::EmptyColumn { column, value, cost, bound });
        Ok(())
    }
}
