//! # LU Decomposition
//!
//! Gaussian elimination on a row major copy of the basis matrix. The elimination is recorded as a
//! sequence of pivot steps; together these describe `M B = U` with `M` a product of elementary row
//! operations and `U` a row and column permutation of an upper triangular matrix.
use crate::data::linear_algebra::SparseTuple;

/// Smallest absolute pivot value that is accepted during the elimination.
pub const PIVOT_THRESHOLD: f64 = 1e-10;

/// Relative magnitude a pivot candidate should have compared to the largest value in its column.
///
/// Among the candidates that are large enough, the shortest row is chosen to limit fill-in.
const RELATIVE_PIVOT_THRESHOLD: f64 = 0.1;

/// A single elimination step.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct PivotStep {
    /// Row in which the pivot is located.
    pub row: usize,
    /// Basis position (column of `B`) in which the pivot is located.
    pub position: usize,
    pub pivot: f64,
    /// Multipliers with which the pivot row was subtracted from the rows below it.
    pub lower: Vec<SparseTuple<f64>>,
    /// Remainder of the pivot row at the time of the elimination, excluding the pivot.
    pub upper: Vec<SparseTuple<f64>>,
}

/// Result of the elimination.
#[derive(Clone, Debug, PartialEq, Default)]
pub(super) struct Decomposition {
    pub steps: Vec<PivotStep>,
    /// Basis positions for which no acceptable pivot was found.
    pub deficient_positions: Vec<usize>,
    /// Rows that were never used as pivot row.
    pub deficient_rows: Vec<usize>,
}

impl Decomposition {
    /// Factorize a square matrix.
    ///
    /// Pivots are chosen column by column: the column with the fewest remaining nonzeros first, and
    /// within it, among the values that are at least a fraction of the largest value, the one in
    /// the shortest row. Ties are broken by lowest index.
    ///
    /// # Arguments
    ///
    /// * `columns`: The matrix to factorize, per basis position the (row, value) tuples.
    ///
    /// # Return value
    ///
    /// The decomposition. If the matrix is singular, the deficient positions and rows are listed and
    /// the steps only describe the nonsingular part.
    pub fn new(columns: &[Vec<SparseTuple<f64>>]) -> Self {
        let m = columns.len();

        let mut rows = vec![Vec::new(); m];
        for (position, column) in columns.iter().enumerate() {
            for &(i, value) in column {
                if value != 0_f64 {
                    rows[i].push((position, value));
                }
            }
        }
        for row in &mut rows {
            row.sort_unstable_by_key(|&(j, _)| j);
        }
        let mut column_count = vec![0; m];
        for row in &rows {
            for &(j, _) in row {
                column_count[j] += 1;
            }
        }

        let mut row_active = vec![true; m];
        let mut position_active = vec![true; m];
        let mut steps = Vec::with_capacity(m);
        let mut deficient_positions = Vec::new();

        for _ in 0..m {
            let Some(position) = (0..m)
                .filter(|&j| position_active[j])
                .min_by_key(|&j| column_count[j]) else { break; };
            position_active[position] = false;

            // Collect the column from the active rows
            let candidates = (0..m)
                .filter(|&i| row_active[i])
                .filter_map(|i| {
                    rows[i].binary_search_by_key(&position, |&(j, _)| j).ok()
                        .map(|data_index| (i, rows[i][data_index].1))
                })
                .collect::<Vec<_>>();
            let largest = candidates.iter().map(|&(_, v)| v.abs()).fold(0_f64, f64::max);

            if largest < PIVOT_THRESHOLD {
                for &(i, _) in &candidates {
                    remove_entry(&mut rows[i], position);
                }
                deficient_positions.push(position);
                continue;
            }

            let (pivot_row, pivot) = candidates.iter()
                .filter(|&&(_, v)| v.abs() >= RELATIVE_PIVOT_THRESHOLD * largest)
                .min_by_key(|&&(i, _)| (rows[i].len(), i))
                .copied()
                .unwrap_or(candidates[0]);
            row_active[pivot_row] = false;

            let upper = rows[pivot_row].iter()
                .filter(|&&(j, _)| j != position)
                .copied()
                .collect::<Vec<_>>();
            for &(j, _) in &upper {
                column_count[j] -= 1;
            }

            let mut lower = Vec::with_capacity(candidates.len() - 1);
            for &(i, value) in candidates.iter().filter(|&&(i, _)| i != pivot_row) {
                let ratio = value / pivot;
                remove_entry(&mut rows[i], position);
                let (removed, added) = subtract_multiple(&mut rows[i], ratio, &upper);
                for j in removed {
                    column_count[j] -= 1;
                }
                for j in added {
                    column_count[j] += 1;
                }
                lower.push((i, ratio));
            }

            steps.push(PivotStep { row: pivot_row, position, pivot, lower, upper });
        }

        let deficient_rows = (0..m).filter(|&i| row_active[i]).collect();
        Self { steps, deficient_positions, deficient_rows }
    }

    /// Whether the matrix was found nonsingular.
    pub fn is_complete(&self) -> bool {
        self.deficient_positions.is_empty()
    }

    /// Solve `B x = b` in place.
    ///
    /// # Arguments
    ///
    /// * `work`: On input `b` indexed by row, on output `x` indexed by basis position.
    pub fn solve(&self, work: &mut [f64]) {
        for step in &self.steps {
            let value = work[step.row];
            if value != 0_f64 {
                for &(i, l) in &step.lower {
                    work[i] -= l * value;
                }
            }
        }

        let mut result = vec![0_f64; work.len()];
        for step in self.steps.iter().rev() {
            let total = step.upper.iter().map(|&(j, u)| u * result[j]).sum::<f64>();
            result[step.position] = (work[step.row] - total) / step.pivot;
        }
        work.copy_from_slice(&result);
    }

    /// Solve `B^T y = c` in place.
    ///
    /// # Arguments
    ///
    /// * `work`: On input `c` indexed by basis position, on output `y` indexed by row.
    pub fn solve_transpose(&self, work: &mut [f64]) {
        let mut result = vec![0_f64; work.len()];
        for step in &self.steps {
            let value = work[step.position] / step.pivot;
            result[step.row] = value;
            if value != 0_f64 {
                for &(j, u) in &step.upper {
                    work[j] -= u * value;
                }
            }
        }

        for step in self.steps.iter().rev() {
            let total = step.lower.iter().map(|&(i, l)| l * result[i]).sum::<f64>();
            result[step.row] -= total;
        }
        work.copy_from_slice(&result);
    }
}

fn remove_entry(row: &mut Vec<SparseTuple<f64>>, j: usize) {
    if let Ok(data_index) = row.binary_search_by_key(&j, |&(jj, _)| jj) {
        row.remove(data_index);
    }
}

/// Compute `target -= ratio * source`, both sorted sparse rows.
///
/// # Return value
///
/// Indices that disappeared from `target` because of cancellation, and indices that were added.
fn subtract_multiple(
    target: &mut Vec<SparseTuple<f64>>,
    ratio: f64,
    source: &[SparseTuple<f64>],
) -> (Vec<usize>, Vec<usize>) {
    let mut result = Vec::with_capacity(target.len() + source.len());
    let mut removed = Vec::new();
    let mut added = Vec::new();

    let mut target_iter = target.iter().copied().peekable();
    let mut source_iter = source.iter().copied().peekable();
    loop {
        match (target_iter.peek().copied(), source_iter.peek().copied()) {
            (Some((i, t)), Some((j, s))) if i == j => {
                let value = t - ratio * s;
                if value.abs() > f64::EPSILON * t.abs() {
                    result.push((i, value));
                } else {
                    removed.push(i);
                }
                target_iter.next();
                source_iter.next();
            }
            (Some((i, t)), Some((j, _))) if i < j => {
                result.push((i, t));
                target_iter.next();
            }
            (Some(_), Some((j, s))) | (None, Some((j, s))) => {
                result.push((j, -ratio * s));
                added.push(j);
                source_iter.next();
            }
            (Some((i, t)), None) => {
                result.push((i, t));
                target_iter.next();
            }
            (None, None) => break,
        }
    }

    *target = result;
    (removed, added)
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::algorithm::primal::factor::decomposition::Decomposition;
    use crate::data::linear_algebra::SparseTuple;

    fn to_columns<const M: usize>(rows: [[f64; M]; M]) -> Vec<Vec<SparseTuple<f64>>> {
        (0..M).map(|j| (0..M).filter(|&i| rows[i][j] != 0_f64).map(|i| (i, rows[i][j])).collect())
            .collect()
    }

    fn multiply<const M: usize>(rows: &[[f64; M]; M], x: &[f64]) -> Vec<f64> {
        rows.iter().map(|row| row.iter().zip(x).map(|(a, b)| a * b).sum()).collect()
    }

    fn multiply_transpose<const M: usize>(rows: &[[f64; M]; M], y: &[f64]) -> Vec<f64> {
        (0..M).map(|j| (0..M).map(|i| rows[i][j] * y[i]).sum()).collect()
    }

    fn test_matrix<const M: usize>(rows: [[f64; M]; M]) {
        let decomposition = Decomposition::new(&to_columns(rows));
        assert!(decomposition.is_complete());

        let b = (0..M).map(|i| (i as f64) - 1.5).collect::<Vec<_>>();
        let mut x = b.clone();
        decomposition.solve(&mut x);
        for (computed, expected) in multiply(&rows, &x).into_iter().zip(&b) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-10);
        }

        let mut y = b.clone();
        decomposition.solve_transpose(&mut y);
        for (computed, expected) in multiply_transpose(&rows, &y).into_iter().zip(&b) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn identity() {
        test_matrix([[1_f64, 0_f64], [0_f64, 1_f64]]);
        test_matrix([[-1_f64, 0_f64, 0_f64], [0_f64, -1_f64, 0_f64], [0_f64, 0_f64, -1_f64]]);
    }

    #[test]
    fn offdiagonal() {
        test_matrix([[1_f64, 2_f64], [0_f64, 1_f64]]);
        test_matrix([[1_f64, 0_f64], [3_f64, 1_f64]]);
        test_matrix([[0_f64, 2_f64], [5_f64, 1_f64]]);
    }

    #[test]
    fn wikipedia_example() {
        test_matrix([[4_f64, 3_f64], [6_f64, 3_f64]]);
        test_matrix([[1_f64, 2_f64, 3_f64], [2_f64, 5_f64, 3_f64], [1_f64, 0_f64, 8_f64]]);
    }

    #[test]
    fn dense_4x4() {
        test_matrix([
            [2_f64, -1_f64, 0_f64, 3_f64],
            [4_f64, 1_f64, 7_f64, 0_f64],
            [0_f64, 5_f64, -2_f64, 1_f64],
            [1_f64, 0_f64, 0_f64, 6_f64],
        ]);
    }

    #[test]
    fn banded_5x5() {
        test_matrix([
            [2_f64, 1_f64, 0_f64, 0_f64, 0_f64],
            [1_f64, 2_f64, 1_f64, 0_f64, 0_f64],
            [0_f64, 1_f64, 2_f64, 1_f64, 0_f64],
            [0_f64, 0_f64, 1_f64, 2_f64, 1_f64],
            [0_f64, 0_f64, 0_f64, 1_f64, 2_f64],
        ]);
    }

    #[test]
    fn singular() {
        let decomposition = Decomposition::new(&to_columns([
            [1_f64, 2_f64, 0_f64],
            [2_f64, 4_f64, 0_f64],
            [0_f64, 0_f64, 1_f64],
        ]));
        assert!(!decomposition.is_complete());
        assert_eq!(decomposition.deficient_positions.len(), 1);
        assert_eq!(decomposition.deficient_rows.len(), 1);

        let empty_column = Decomposition::new(&to_columns([[1_f64, 0_f64], [0_f64, 0_f64]]));
        assert_eq!(empty_column.deficient_positions, vec![1]);
        assert_eq!(empty_column.deficient_rows, vec![1]);
    }

    #[test]
    fn empty() {
        let decomposition = Decomposition::new(&[]);
        assert!(decomposition.is_complete());
        let mut work: [f64; 0] = [];
        decomposition.solve(&mut work);
    }
}
