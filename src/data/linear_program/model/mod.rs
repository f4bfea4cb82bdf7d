//! # Linear program model
//!
//! The canonical input: minimize or maximize `offset + c^T x` subject to
//! `row_lower <= A x <= row_upper` and `column_lower <= x <= column_upper`, with `A` sparse and
//! column-major. Infinite bounds are represented by the infinite floating point values.
//!
//! A model is immutable after it is built. Presolve creates a new, smaller model, and postsolve maps
//! solutions of that model back onto this one.
use thiserror::Error;

use crate::data::linear_algebra::matrix::{ColumnMatrix, MatrixError, RowMatrix};
use crate::data::linear_program::elements::Objective;

pub mod presolve;
pub mod postsolve;

/// Reasons a model can't be built from the provided data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The constraint matrix is malformed.
    #[error("invalid constraint matrix: {0}")]
    Matrix(#[from] MatrixError),
    /// A vector doesn't match the dimensions of the matrix.
    #[error("{what} has length {found}, expected {expected}")]
    Dimension {
        /// Name of the vector.
        what: &'static str,
        /// Number of columns or rows of the matrix.
        expected: usize,
        /// Length of the vector.
        found: usize,
    },
    /// A cost is infinite or NaN.
    #[error("cost of column {column} is not finite")]
    Cost {
        /// Index of the column.
        column: usize,
    },
    /// A bound is NaN, a lower bound of `+inf` or an upper bound of `-inf`.
    #[error("{what} {index} has an invalid bound ({lower}, {upper})")]
    Bound {
        /// Whether it concerns a column or a row.
        what: &'static str,
        /// Index of the column or row.
        index: usize,
        /// Lower bound as provided.
        lower: f64,
        /// Upper bound as provided.
        upper: f64,
    },
    /// The objective offset is infinite or NaN.
    #[error("objective offset is not finite")]
    Offset,
}

/// A linear program with bounded columns and ranged rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    objective: Objective,
    offset: f64,
    cost: Vec<f64>,
    matrix: ColumnMatrix,

    column_lower: Vec<f64>,
    column_upper: Vec<f64>,
    row_lower: Vec<f64>,
    row_upper: Vec<f64>,
}

impl Model {
    /// Create a new instance.
    ///
    /// The bounds are checked for NaN values and for lower bounds of `+inf` or upper bounds of
    /// `-inf`. A lower bound above an upper bound is accepted: such a model is infeasible, which
    /// is an outcome of solving rather than an invalid input.
    ///
    /// # Arguments
    ///
    /// * `objective`: Whether to minimize or maximize.
    /// * `cost`: Objective coefficient of each column.
    /// * `matrix`: Constraint coefficients, one major vector per column.
    /// * `column_lower`, `column_upper`: Bounds of each column.
    /// * `row_lower`, `row_upper`: Bounds of each row activity.
    ///
    /// # Return value
    ///
    /// The model if all dimensions and values are consistent.
    pub fn new(
        objective: Objective,
        cost: Vec<f64>,
        matrix: ColumnMatrix,
        column_lower: Vec<f64>,
        column_upper: Vec<f64>,
        row_lower: Vec<f64>,
        row_upper: Vec<f64>,
    ) -> Result<Self, ModelError> {
        let nr_columns = matrix.nr_columns();
        let nr_rows = matrix.nr_rows();

        for (what, expected, found) in [
            ("cost", nr_columns, cost.len()),
            ("column_lower", nr_columns, column_lower.len()),
            ("column_upper", nr_columns, column_upper.len()),
            ("row_lower", nr_rows, row_lower.len()),
            ("row_upper", nr_rows, row_upper.len()),
        ] {
            if expected != found {
                return Err(ModelError::Dimension { what, expected, found });
            }
        }

        if let Some(column) = cost.iter().position(|c| !c.is_finite()) {
            return Err(ModelError::Cost { column });
        }
        check_bounds("column", &column_lower, &column_upper)?;
        check_bounds("row", &row_lower, &row_upper)?;

        Ok(Self {
            objective,
            offset: 0_f64,
            cost,
            matrix,

            column_lower,
            column_upper,
            row_lower,
            row_upper,
        })
    }

    /// Set the constant term of the objective function.
    pub fn with_offset(mut self, offset: f64) -> Result<Self, ModelError> {
        if !offset.is_finite() {
            return Err(ModelError::Offset);
        }

        self.offset = offset;
        Ok(self)
    }

    /// Model without any rows or columns.
    pub fn empty(objective: Objective, offset: f64) -> Self {
        Self {
            objective,
            offset,
            cost: Vec::new(),
            matrix: ColumnMatrix::empty(0, 0),
            column_lower: Vec::new(),
            column_upper: Vec::new(),
            row_lower: Vec::new(),
            row_upper: Vec::new(),
        }
    }

    /// Number of structural columns.
    pub fn nr_columns(&self) -> usize {
        self.matrix.nr_columns()
    }
    /// Number of rows.
    pub fn nr_rows(&self) -> usize {
        self.matrix.nr_rows()
    }
    /// Number of structural columns plus one slack column per row.
    pub fn nr_total(&self) -> usize {
        self.nr_columns() + self.nr_rows()
    }

    /// Direction of optimization.
    pub fn objective(&self) -> Objective {
        self.objective
    }
    /// Constant added to the objective value.
    pub fn offset(&self) -> f64 {
        self.offset
    }
    /// Cost per column, in the direction of optimization.
    pub fn cost(&self) -> &[f64] {
        &self.cost
    }
    /// Constraint matrix, one major vector per column.
    pub fn matrix(&self) -> &ColumnMatrix {
        &self.matrix
    }
    /// Lower bound per column, possibly `-inf`.
    pub fn column_lower(&self) -> &[f64] {
        &self.column_lower
    }
    /// Upper bound per column, possibly `+inf`.
    pub fn column_upper(&self) -> &[f64] {
        &self.column_upper
    }
    /// Lower bound on the activity of each row.
    pub fn row_lower(&self) -> &[f64] {
        &self.row_lower
    }
    /// Upper bound on the activity of each row.
    pub fn row_upper(&self) -> &[f64] {
        &self.row_upper
    }

    /// Row major copy of the constraint matrix.
    pub fn row_matrix(&self) -> RowMatrix {
        self.matrix.transpose()
    }

    /// Objective function value, including the offset.
    pub fn objective_value(&self, column_value: &[f64]) -> f64 {
        debug_assert_eq!(column_value.len(), self.nr_columns());

        self.offset + self.cost.iter().zip(column_value).map(|(c, x)| c * x).sum::<f64>()
    }

    /// Activity `A x` of every row.
    pub fn row_activity(&self, column_value: &[f64]) -> Vec<f64> {
        debug_assert_eq!(column_value.len(), self.nr_columns());

        let mut activity = vec![0_f64; self.nr_rows()];
        for (j, &x) in column_value.iter().enumerate() {
            if x != 0_f64 {
                for (i, a) in self.matrix.column(j) {
                    activity[i] += a * x;
                }
            }
        }
        activity
    }
}

fn check_bounds(what: &'static str, lower: &[f64], upper: &[f64]) -> Result<(), ModelError> {
    lower.iter().zip(upper).enumerate()
        .find(|&(_, (&l, &u))| l.is_nan() || u.is_nan() || l == f64::INFINITY || u == f64::NEG_INFINITY)
        .map_or(Ok(()), |(index, (&lower, &upper))| Err(ModelError::Bound { what, index, lower, upper }))
}
