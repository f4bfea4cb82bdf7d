//! # Tests on small problems that require a look inside the crate
//!
//! Each problem is solved step by step: presolve, the primal simplex method on the reduced model,
//! postsolve and the final solve through the solver.
use crate::data::linear_algebra::matrix::ColumnMatrix;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_program::elements::Objective;
use crate::data::linear_program::model::Model;


fn model(
    objective: Objective,
    cost: Vec<f64>,
    columns: Vec<Vec<SparseTuple<f64>>>,
    column_bounds: Vec<(f64, f64)>,
    row_bounds: Vec<(f64, f64)>,
) -> Model {
    let matrix = ColumnMatrix::from_major_vectors(columns, row_bounds.len()).unwrap();
    let (column_lower, column_upper) = column_bounds.into_iter().unzip();
    let (row_lower, row_upper) = row_bounds.into_iter().unzip();

    Model::new(objective, cost, matrix, column_lower, column_upper, row_lower, row_upper).unwrap()
}
