//! # Representing a solution
//!
//! Primal values, duals and the basis of a solution, indexed in the same way as the model they
//! belong to.
use crate::data::linear_program::elements::BasisStatus;
use crate::data::linear_program::model::Model;

/// Status of every column and row with respect to a basis.
///
/// A valid basis has as many `Basic` entries as the model has rows.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Basis {
    /// Status of each structural column.
    pub column_status: Vec<BasisStatus>,
    /// Status of each row, that is, of its slack column.
    pub row_status: Vec<BasisStatus>,
}

impl Basis {
    /// Number of basic columns and rows.
    pub fn nr_basic(&self) -> usize {
        self.column_status.iter().chain(&self.row_status)
            .filter(|&&status| status == BasisStatus::Basic)
            .count()
    }

    /// Whether the dimensions match a model and the basis has the right number of basic entries.
    pub fn is_valid_for(&self, nr_columns: usize, nr_rows: usize) -> bool {
        self.column_status.len() == nr_columns
            && self.row_status.len() == nr_rows
            && self.nr_basic() == nr_rows
    }
}

/// A (possibly partial) solution to a model.
///
/// Duals use the direction of optimization of the model: `column_dual[j]` equals
/// `cost[j] - sum_i a_ij row_dual[i]`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Solution {
    /// Value of each structural column.
    pub column_value: Vec<f64>,
    /// Reduced cost of each structural column.
    pub column_dual: Vec<f64>,
    /// Activity of each row.
    pub row_value: Vec<f64>,
    /// Dual value of each row.
    pub row_dual: Vec<f64>,
    /// Basis the solution belongs to.
    pub basis: Basis,
    /// Objective function value, including the model offset.
    pub objective_value: f64,
}

impl Solution {
    /// A solution with all values zero and an all-slack basis.
    ///
    /// Used to report dimensions when no solve produced values.
    pub fn zeros(nr_columns: usize, nr_rows: usize) -> Self {
        Self {
            column_value: vec![0_f64; nr_columns],
            column_dual: vec![0_f64; nr_columns],
            row_value: vec![0_f64; nr_rows],
            row_dual: vec![0_f64; nr_rows],
            basis: Basis {
                column_status: vec![BasisStatus::Lower; nr_columns],
                row_status: vec![BasisStatus::Basic; nr_rows],
            },
            objective_value: 0_f64,
        }
    }

    /// Whether all value, dual and basis vectors have the given dimensions.
    pub fn is_consistent(&self, nr_columns: usize, nr_rows: usize) -> bool {
        self.column_value.len() == nr_columns
            && self.column_dual.len() == nr_columns
            && self.basis.column_status.len() == nr_columns
            && self.row_value.len() == nr_rows
            && self.row_dual.len() == nr_rows
            && self.basis.row_status.len() == nr_rows
    }

    /// Largest violation of a column bound, a row bound, or of `row_value == A x`.
    pub fn max_primal_violation(&self, model: &Model) -> f64 {
        let column_violation = violation(&self.column_value, model.column_lower(), model.column_upper());
        let row_violation = violation(&self.row_value, model.row_lower(), model.row_upper());
        let activity_violation = model.row_activity(&self.column_value).iter()
            .zip(&self.row_value)
            .map(|(activity, value)| (activity - value).abs())
            .fold(0_f64, f64::max);

        column_violation.max(row_violation).max(activity_violation)
    }

    /// Largest violation of dual feasibility and complementary slackness.
    ///
    /// A column or row strictly between its bounds should have a zero dual, one at its lower bound
    /// a dual that does not decrease the objective when moving up, and vice versa.
    pub fn max_dual_violation(&self, model: &Model, primal_tolerance: f64) -> f64 {
        let sign = model.objective().sign();

        let columns = self.column_value.iter().zip(&self.column_dual)
            .zip(model.column_lower().iter().zip(model.column_upper()));
        let rows = self.row_value.iter().zip(&self.row_dual)
            .zip(model.row_lower().iter().zip(model.row_upper()));

        columns.chain(rows)
            .map(|((&value, &dual), (&lower, &upper))| {
                let dual = sign * dual;
                let at_lower = value <= lower + primal_tolerance;
                let at_upper = value >= upper - primal_tolerance;
                match (at_lower, at_upper) {
                    (true, true) => 0_f64,
                    (true, false) => (-dual).max(0_f64),
                    (false, true) => dual.max(0_f64),
                    (false, false) => dual.abs(),
                }
            })
            .fold(0_f64, f64::max)
    }
}

fn violation(values: &[f64], lower: &[f64], upper: &[f64]) -> f64 {
    values.iter().zip(lower.iter().zip(upper))
        .map(|(&value, (&lower, &upper))| (lower - value).max(value - upper).max(0_f64))
        .fold(0_f64, f64::max)
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::BasisStatus;
    use crate::data::linear_program::solution::{Basis, Solution};

    #[test]
    fn basis() {
        let basis = Basis {
            column_status: vec![BasisStatus::Basic, BasisStatus::Upper],
            row_status: vec![BasisStatus::Lower],
        };
        assert_eq!(basis.nr_basic(), 1);
        assert!(basis.is_valid_for(2, 1));
        assert!(!basis.is_valid_for(2, 2));
    }

    #[test]
    fn consistency() {
        let solution = Solution::zeros(3, 2);
        assert!(solution.is_consistent(3, 2));
        assert!(!solution.is_consistent(2, 3));
        assert!(solution.basis.is_valid_for(3, 2));
    }
}
