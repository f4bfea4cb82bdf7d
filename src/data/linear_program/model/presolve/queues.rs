//! # Queues
//!
//! Rules are not directly applied, but instead queued.
use crate::data::linear_program::model::presolve::counters::Counters;

/// Which rules still need to be applied to which row or column.
///
/// Note that a value could be removed from a queue before the rule is actually applied: a row that
/// became a singleton might become empty before it is reached. Whether a rule still applies is
/// checked when an index is taken from a queue.
///
/// All queues are stacks, because the order in which they are processed does not change the
/// result.
pub(super) struct Queues {
    /// Columns with equal bounds that need substitution.
    ///
    /// * Start of process: Column bounds are equal.
    /// * Insertion: A singleton row made the bounds equal.
    /// * Removal: The value is about to be substituted, shifting the bounds of the rows it appears
    /// in.
    pub fixed_column: Vec<usize>,
    /// Rows with a single entry, to be turned into column bounds.
    ///
    /// * Start of process: Row count is 1.
    /// * Insertion: Row count becomes 1.
    pub singleton_row: Vec<usize>,
    /// Rows without entries, to be checked for feasibility and removed.
    pub empty_row: Vec<usize>,
    /// Columns without entries, to be set to their best bound.
    ///
    /// Fixed columns are not inserted, they are substituted instead.
    pub empty_column: Vec<usize>,
}

impl Queues {
    /// Create a new instance.
    ///
    /// # Arguments
    ///
    /// * `counters`: Counters of the model being presolved.
    /// * `column_lower`, `column_upper`: Column bounds.
    /// * `tolerance`: Bounds that are this close are considered equal.
    pub fn new(counters: &Counters, column_lower: &[f64], column_upper: &[f64], tolerance: f64) -> Self {
        let is_fixed = |j: usize| column_upper[j] - column_lower[j] <= tolerance;
        let nr_columns = counters.column.len();

        Self {
            fixed_column: (0..nr_columns).filter(|&j| is_fixed(j)).collect(),
            singleton_row: counters.row.iter().enumerate()
                .filter(|&(_, &count)| count == 1)
                .map(|(i, _)| i)
                .collect(),
            empty_row: counters.row.iter().enumerate()
                .filter(|&(_, &count)| count == 0)
                .map(|(i, _)| i)
                .collect(),
            empty_column: (0..nr_columns)
                .filter(|&j| counters.column[j] == 0 && !is_fixed(j))
                .collect(),
        }
    }
}
