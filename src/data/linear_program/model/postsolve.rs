//! # Postsolve
//!
//! Mapping a solution of a reduced model back onto the model it was presolved from. The values of
//! the reduced solution are scattered into the original index space, after which the reductions
//! are undone in reverse order of application.
//!
//! Each undone reduction adds as many basic entries as it adds rows, so the recovered basis has
//! the right number of basic columns. It is a good starting point for a final solve of the
//! original model, but not necessarily optimal itself.
use log::{debug, trace};
use thiserror::Error;

use crate::data::linear_program::elements::{BasisStatus, BoundDirection};
use crate::data::linear_program::model::presolve::{PresolveInfo, Reduction};
use crate::data::linear_program::solution::Solution;

/// Result of a successful postsolve.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PostsolveStatus {
    /// The solution was mapped back onto the original model.
    SolutionRecovered,
    /// Presolve did not reduce anything, the solution is returned as it is.
    NoPostsolve,
}

/// Reasons a solution can't be mapped back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostsolveError {
    /// The solution doesn't belong to the reduced model.
    #[error("reduced solution has dimensions {found:?}, expected {expected:?} (columns, rows)")]
    ReducedSolutionDimension {
        /// Number of columns and rows of the reduced model.
        expected: (usize, usize),
        /// Number of columns and rows of the solution.
        found: (usize, usize),
    },
}

/// Map a solution of the reduced model back onto the original model.
///
/// # Arguments
///
/// * `reduced`: Solution of the reduced model, including a basis.
/// * `info`: Result of presolving the original model.
///
/// # Return value
///
/// The solution in the dimensions of the original model, or an error if the solution doesn't
/// have the dimensions of the reduced model.
pub fn postsolve(
    reduced: &Solution,
    info: &PresolveInfo,
) -> Result<(PostsolveStatus, Solution), PostsolveError> {
    let expected = info.reduced_dimensions();
    let found = (reduced.column_value.len(), reduced.row_value.len());
    if found != expected || !reduced.is_consistent(expected.0, expected.1) {
        return Err(PostsolveError::ReducedSolutionDimension { expected, found });
    }

    if info.reductions().is_empty() {
        return Ok((PostsolveStatus::NoPostsolve, reduced.clone()));
    }

    let (nr_columns, nr_rows) = info.original_dimensions();
    let mut solution = Solution::zeros(nr_columns, nr_rows);
    for (new, &old) in info.column_map().iter().enumerate() {
        solution.column_value[old] = reduced.column_value[new];
        solution.column_dual[old] = reduced.column_dual[new];
        solution.basis.column_status[old] = reduced.basis.column_status[new];
    }
    for (new, &old) in info.row_map().iter().enumerate() {
        solution.row_value[old] = reduced.row_value[new];
        solution.row_dual[old] = reduced.row_dual[new];
        solution.basis.row_status[old] = reduced.basis.row_status[new];
    }
    // The offset of the reduced model contains the cost of all removed columns
    solution.objective_value = reduced.objective_value;

    for reduction in info.reductions().iter().rev() {
        trace!("Undoing {:?}", reduction);
        undo(reduction, &mut solution, info.tolerance());
    }
    debug!("Undid {} reductions", info.reductions().len());

    Ok((PostsolveStatus::SolutionRecovered, solution))
}

/// Undo a single reduction.
fn undo(reduction: &Reduction, solution: &mut Solution, tolerance: f64) {
    match reduction {
        &Reduction::FixedColumn { column, value, cost, ref entries } => {
            solution.column_value[column] = value;
            solution.column_dual[column] = cost - entries.iter()
                .map(|&(row, coefficient)| coefficient * solution.row_dual[row])
                .sum::<f64>();
            solution.basis.column_status[column] = BasisStatus::Lower;
            for &(row, coefficient) in entries {
                solution.row_value[row] += coefficient * value;
            }
        },
        &Reduction::EmptyRow { row } => {
            solution.row_value[row] = 0_f64;
            solution.row_dual[row] = 0_f64;
            solution.basis.row_status[row] = BasisStatus::Basic;
        },
        &Reduction::SingletonRow { row, column, coefficient, ref tightened, .. } => {
            let value = solution.column_value[column];
            solution.row_value[row] = coefficient * value;

            let at_implied = |direction: BoundDirection| tightened[direction]
                .is_some_and(|bound| (value - bound.implied).abs() <= tolerance);
            let column_bound = if solution.basis.column_status[column] == BasisStatus::Basic {
                None
            } else if at_implied(BoundDirection::Lower) {
                Some(BoundDirection::Lower)
            } else if at_implied(BoundDirection::Upper) {
                Some(BoundDirection::Upper)
            } else {
                None
            };

            match column_bound {
                Some(direction) => {
                    // A negative coefficient maps a column bound onto the opposite row bound
                    let row_bound = if coefficient > 0_f64 { direction } else { !direction };
                    solution.basis.row_status[row] = match row_bound {
                        BoundDirection::Lower => BasisStatus::Lower,
                        BoundDirection::Upper => BasisStatus::Upper,
                    };
                    solution.row_dual[row] = solution.column_dual[column] / coefficient;
                    solution.column_dual[column] = 0_f64;
                    solution.basis.column_status[column] = BasisStatus::Basic;
                },
                None => {
                    solution.row_dual[row] = 0_f64;
                    solution.basis.row_status[row] = BasisStatus::Basic;
                },
            }
        },
        &Reduction::EmptyColumn { column, value, cost, bound } => {
            solution.column_value[column] = value;
            solution.column_dual[column] = cost;
            solution.basis.column_status[column] = match bound {
                Some(BoundDirection::Lower) => BasisStatus::Lower,
                Some(BoundDirection::Upper) => BasisStatus::Upper,
                None => BasisStatus::Zero,
            };
        },
    }
}
