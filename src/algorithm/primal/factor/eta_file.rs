//! # Product form updates
//!
//! After a basis change in position `r` with entering column `a_q`, the new basis is `B E` where
//! `E` is the identity with column `r` replaced by `alpha = B^-1 a_q`. The inverse of `E` is
//! applied after the solve with the old factors, so no refactorization is needed until the file
//! becomes too long.
use crate::data::linear_algebra::SparseTuple;

/// Update column or "file".
#[derive(Clone, Debug, PartialEq)]
pub(super) struct EtaFile {
    /// Basis position that changed.
    position: usize,
    /// `alpha[position]`.
    pivot: f64,
    /// All other nonzero values of `alpha`.
    values: Vec<SparseTuple<f64>>,
}

impl EtaFile {
    /// Create a new instance.
    ///
    /// # Arguments
    ///
    /// * `position`: Basis position of the pivot.
    /// * `column`: The transformed entering column, indexed by basis position.
    pub fn new(position: usize, column: impl Iterator<Item = SparseTuple<f64>>) -> Self {
        let mut pivot = 0_f64;
        let values = column
            .filter(|&(i, value)| {
                if i == position {
                    pivot = value;
                    false
                } else {
                    value != 0_f64
                }
            })
            .collect();
        debug_assert_ne!(pivot, 0_f64);

        Self { position, pivot, values }
    }

    /// Compute `E^-1 x` in place.
    pub fn apply(&self, work: &mut [f64]) {
        let value = work[self.position] / self.pivot;
        work[self.position] = value;
        if value != 0_f64 {
            for &(i, alpha) in &self.values {
                work[i] -= alpha * value;
            }
        }
    }

    /// Compute `E^-T x` in place.
    pub fn apply_transpose(&self, work: &mut [f64]) {
        let total = self.values.iter().map(|&(i, alpha)| alpha * work[i]).sum::<f64>();
        work[self.position] = (work[self.position] - total) / self.pivot;
    }
}
