//! # Basis factorization
//!
//! Maintains a representation of the inverse of the basis matrix `B` from which FTRAN
//! (`B^-1 a`) and BTRAN (`B^-T c`) can be computed. The matrix is factorized from scratch by
//! `invert`, after which every basis change appends an eta file. When the number of eta files
//! reaches the update limit, the next rebuild should reinvert.
use thiserror::Error;

use crate::algorithm::primal::factor::decomposition::Decomposition;
use crate::algorithm::primal::factor::eta_file::EtaFile;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_algebra::vector::WorkVector;

mod decomposition;
mod eta_file;

pub use decomposition::PIVOT_THRESHOLD;

/// The basis matrix could not be factorized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("basis matrix is singular, rank deficiency {}", .positions.len())]
pub struct SingularBasis {
    /// Basis positions without an acceptable pivot.
    pub positions: Vec<usize>,
    /// Rows without a pivot, as many as there are deficient positions.
    pub rows: Vec<usize>,
}

/// LU factors of the basis matrix with product form updates.
#[derive(Clone, Debug)]
pub struct BasisFactor {
    decomposition: Decomposition,
    updates: Vec<EtaFile>,
    update_limit: usize,

    work: Vec<f64>,
}

impl BasisFactor {
    /// Create a new instance representing an identity matrix.
    ///
    /// # Arguments
    ///
    /// * `m`: Dimension of the basis matrix.
    /// * `update_limit`: Number of updates after which a reinversion is requested.
    pub fn new(m: usize, update_limit: usize) -> Self {
        let identity = (0..m).map(|i| vec![(i, 1_f64)]).collect::<Vec<_>>();

        Self {
            decomposition: Decomposition::new(&identity),
            updates: Vec::new(),
            update_limit,

            work: vec![0_f64; m],
        }
    }

    /// Factorize a new basis matrix, discarding all updates.
    ///
    /// # Arguments
    ///
    /// * `columns`: Per basis position, the (row, value) tuples of the basic column.
    ///
    /// # Return value
    ///
    /// An error describing the rank deficiency if the matrix is singular. The factorization should
    /// not be used in that case.
    pub fn invert(&mut self, columns: &[Vec<SparseTuple<f64>>]) -> Result<(), SingularBasis> {
        debug_assert_eq!(columns.len(), self.work.len());

        self.decomposition = Decomposition::new(columns);
        self.updates.clear();

        if self.decomposition.is_complete() {
            Ok(())
        } else {
            Err(SingularBasis {
                positions: self.decomposition.deficient_positions.clone(),
                rows: self.decomposition.deficient_rows.clone(),
            })
        }
    }

    /// Compute `B^-1 a` in place.
    ///
    /// # Arguments
    ///
    /// * `vector`: On input indexed by row, on output by basis position.
    pub fn ftran(&mut self, vector: &mut WorkVector) {
        self.load(vector);

        self.decomposition.solve(&mut self.work);
        for update in &self.updates {
            update.apply(&mut self.work);
        }

        self.store(vector);
    }

    /// Compute `B^-T c` in place.
    ///
    /// # Arguments
    ///
    /// * `vector`: On input indexed by basis position, on output by row.
    pub fn btran(&mut self, vector: &mut WorkVector) {
        self.load(vector);

        for update in self.updates.iter().rev() {
            update.apply_transpose(&mut self.work);
        }
        self.decomposition.solve_transpose(&mut self.work);

        self.store(vector);
    }

    /// Register a basis change.
    ///
    /// # Arguments
    ///
    /// * `position`: Basis position of the leaving column.
    /// * `column`: The entering column after FTRAN.
    pub fn update(&mut self, position: usize, column: &WorkVector) {
        self.updates.push(EtaFile::new(position, column.iter()));
    }

    /// Number of updates since the last inversion.
    pub fn nr_updates(&self) -> usize {
        self.updates.len()
    }

    /// Whether the number of updates reached the limit.
    pub fn should_reinvert(&self) -> bool {
        self.updates.len() >= self.update_limit
    }

    fn load(&mut self, vector: &WorkVector) {
        debug_assert_eq!(vector.len(), self.work.len());

        self.work.copy_from_slice(vector.as_slice());
    }

    fn store(&self, vector: &mut WorkVector) {
        vector.clear();
        for (i, &value) in self.work.iter().enumerate() {
            if value != 0_f64 {
                vector.set(i, value);
            }
        }
        vector.tidy();
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::algorithm::primal::factor::BasisFactor;
    use crate::data::linear_algebra::vector::WorkVector;

    /// B = [[2, 0, 1], [0, -1, 0], [1, 0, 3]]
    fn columns() -> Vec<Vec<(usize, f64)>> {
        vec![
            vec![(0, 2_f64), (2, 1_f64)],
            vec![(1, -1_f64)],
            vec![(0, 1_f64), (2, 3_f64)],
        ]
    }

    fn multiply(columns: &[Vec<(usize, f64)>], x: &WorkVector) -> Vec<f64> {
        let mut result = vec![0_f64; columns.len()];
        for (j, column) in columns.iter().enumerate() {
            for &(i, value) in column {
                result[i] += value * x.get(j);
            }
        }
        result
    }

    fn multiply_transpose(columns: &[Vec<(usize, f64)>], y: &WorkVector) -> Vec<f64> {
        columns.iter()
            .map(|column| column.iter().map(|&(i, value)| value * y.get(i)).sum())
            .collect()
    }

    #[test]
    fn ftran_btran() {
        let columns = columns();
        let mut factor = BasisFactor::new(3, 10);
        factor.invert(&columns).unwrap();

        let rhs = vec![1_f64, 2_f64, 3_f64];
        let mut x = WorkVector::from_sparse(3, rhs.iter().copied().enumerate());
        factor.ftran(&mut x);
        for (computed, expected) in multiply(&columns, &x).into_iter().zip(&rhs) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-12);
        }

        let mut y = WorkVector::from_sparse(3, rhs.iter().copied().enumerate());
        factor.btran(&mut y);
        for (computed, expected) in multiply_transpose(&columns, &y).into_iter().zip(&rhs) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn update_matches_reinversion() {
        let mut columns = columns();
        let mut factor = BasisFactor::new(3, 2);
        factor.invert(&columns).unwrap();

        // Replace the column in position 1 by (1, 1, 1)
        let entering = vec![(0, 1_f64), (1, 1_f64), (2, 1_f64)];
        let mut alpha = WorkVector::from_sparse(3, entering.iter().copied());
        factor.ftran(&mut alpha);
        factor.update(1, &alpha);
        columns[1] = entering;
        assert_eq!(factor.nr_updates(), 1);
        assert!(!factor.should_reinvert());

        let rhs = vec![-1_f64, 0.5, 4_f64];
        let mut x = WorkVector::from_sparse(3, rhs.iter().copied().enumerate());
        factor.ftran(&mut x);
        for (computed, expected) in multiply(&columns, &x).into_iter().zip(&rhs) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-12);
        }
        let mut y = WorkVector::from_sparse(3, rhs.iter().copied().enumerate());
        factor.btran(&mut y);
        for (computed, expected) in multiply_transpose(&columns, &y).into_iter().zip(&rhs) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-12);
        }

        let mut fresh = BasisFactor::new(3, 2);
        fresh.invert(&columns).unwrap();
        let mut z = WorkVector::from_sparse(3, rhs.iter().copied().enumerate());
        fresh.ftran(&mut z);
        for i in 0..3 {
            assert_abs_diff_eq!(x.get(i), z.get(i), epsilon = 1e-12);
        }

        let mut alpha = WorkVector::from_sparse(3, vec![(0, 1_f64)]);
        factor.ftran(&mut alpha);
        factor.update(0, &alpha);
        assert!(factor.should_reinvert());
    }

    #[test]
    fn singular() {
        let mut factor = BasisFactor::new(2, 10);
        let error = factor.invert(&[vec![(0, 1_f64)], vec![(0, 2_f64)]]).unwrap_err();
        assert_eq!(error.positions, vec![1]);
        assert_eq!(error.rows, vec![1]);
        assert_eq!(error.to_string(), "basis matrix is singular, rank deficiency 1");
    }
}
