//! # Remove a row that is a bound on a column
//!
//! Triggered when there is only a single column left in a row.
use enum_map::EnumMap;

use crate::data::linear_program::elements::BoundDirection;
use crate::data::linear_program::model::presolve::{BoundTightening, Index, PresolveStatus, Reduction};

impl Index<'_> {
    /// Turn a row with a single entry into bounds on its column.
    ///
    /// Bounds are only tightened, never relaxed.
    ///
    /// # Arguments
    ///
    /// * `row`: Index of a row with a single active entry.
    ///
    /// # Return value
    ///
    /// `Err` with the `Infeasible` status if the implied bounds cross the bounds of the column.
    pub(in crate::data::linear_program::model::presolve) fn presolve_singleton_row(
        &mut self,
        row: usize,
    ) -> Result<(), PresolveStatus> {
        debug_assert_eq!(self.counters.row[row], 1);

        let Some((column, coefficient)) = self.counters.iter_active_row(row).next() else {
            return Ok(());
        };
        let (lower, upper) = (self.row_lower[row], self.row_upper[row]);
        let (implied_lower, implied_upper) = if coefficient > 0_f64 {
            (lower / coefficient, upper / coefficient)
        } else {
            (upper / coefficient, lower / coefficient)
        };

        let was_fixed = self.is_column_fixed(column);
        let mut tightened = EnumMap::default();
        if implied_lower > self.column_lower[column] {
            tightened[BoundDirection::Lower] = Some(BoundTightening {
                previous: self.column_lower[column],
                implied: implied_lower,
            });
            self.column_lower[column] = implied_lower;
        }
        if implied_upper < self.column_upper[column] {
            tightened[BoundDirection::Upper] = Some(BoundTightening {
                previous: self.column_upper[column],
                implied: implied_upper,
            });
            self.column_upper[column] = implied_upper;
        }
        if self.column_lower[column] > self.column_upper[column] + self.tolerance {
            return Err(PresolveStatus::Infeasible);
        }

        self.remove_row(row);
        self.reductions.push(Reduction::SingletonRow { row, column, coefficient, lower, upper, tightened });

        if !was_fixed && self.is_column_fixed(column) {
            self.queues.fixed_column.push(column);
        }
        Ok(())
    }
}
