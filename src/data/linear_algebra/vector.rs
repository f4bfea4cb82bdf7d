//! # Work vectors
//!
//! The simplex method repeatedly solves systems whose right-hand side and solution are mostly
//! zero. A `WorkVector` stores the values densely, so that any entry can be read or written in
//! constant time, and additionally keeps a list of the indices that may be nonzero, so that the
//! nonzeros can be iterated over without scanning the whole vector.
use num_traits::Zero;

use crate::data::linear_algebra::{CANCELLED, SparseTuple, TINY};

/// Dense values with a sparse index list.
///
/// Invariant: every index `i` with `array[i] != 0` is in `index`, and `index` has no duplicates.
/// The index list may contain indices whose value has become (nearly) zero; `tidy` removes those.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkVector {
    array: Vec<f64>,
    index: Vec<usize>,
}

impl WorkVector {
    /// Create a zero vector of a fixed length.
    pub fn new(len: usize) -> Self {
        Self {
            array: vec![0_f64; len],
            index: Vec::new(),
        }
    }

    /// Create a vector from sparse data.
    ///
    /// # Arguments
    ///
    /// * `len`: Length of the vector.
    /// * `data`: Nonzero values, indices are unique.
    pub fn from_sparse(len: usize, data: impl IntoIterator<Item = SparseTuple<f64>>) -> Self {
        let mut vector = Self::new(len);
        for (i, value) in data {
            vector.add(i, value);
        }
        vector
    }

    /// Set all values to zero.
    ///
    /// Only the values in the index list are touched when the vector is sparse.
    pub fn clear(&mut self) {
        if self.count() * 3 < self.len() {
            for &i in &self.index {
                self.array[i] = 0_f64;
            }
        } else {
            self.array.iter_mut().for_each(|value| *value = 0_f64);
        }
        self.index.clear();
    }

    /// Length of the vector.
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Whether the vector has zero length.
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Number of indices that might be nonzero.
    pub fn count(&self) -> usize {
        self.index.len()
    }

    /// Value at an index.
    pub fn get(&self, i: usize) -> f64 {
        self.array[i]
    }

    /// Add a value to an entry.
    ///
    /// An exact cancellation is stored as a tiny placeholder so the index list stays valid.
    pub fn add(&mut self, i: usize, value: f64) {
        if value.is_zero() {
            return;
        }

        let old = self.array[i];
        if old.is_zero() {
            self.index.push(i);
            self.array[i] = value;
        } else {
            let new = old + value;
            self.array[i] = if new.is_zero() { CANCELLED } else { new };
        }
    }

    /// Overwrite the value of an entry.
    pub fn set(&mut self, i: usize, value: f64) {
        if self.array[i].is_zero() {
            if value.is_zero() {
                return;
            }
            self.index.push(i);
        }
        self.array[i] = if value.is_zero() { CANCELLED } else { value };
    }

    /// Drop values that are numerically zero, and compact the index list.
    pub fn tidy(&mut self) {
        let array = &mut self.array;
        self.index.retain(|&i| {
            if array[i].abs() < TINY {
                array[i] = 0_f64;
                false
            } else {
                true
            }
        });
    }

    /// Iterate over the entries in the index list with their values.
    pub fn iter(&self) -> impl Iterator<Item = SparseTuple<f64>> + '_ {
        self.index.iter().map(move |&i| (i, self.array[i]))
    }

    /// All values, including zeros.
    pub fn as_slice(&self) -> &[f64] {
        &self.array
    }

    /// Largest absolute value.
    pub fn max_abs(&self) -> f64 {
        self.iter().map(|(_, value)| value.abs()).fold(0_f64, f64::max)
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::data::linear_algebra::vector::WorkVector;

    #[test]
    fn add_and_tidy() {
        let mut v = WorkVector::new(5);
        v.add(3, 2_f64);
        v.add(1, -1_f64);
        v.add(3, -2_f64);
        assert_eq!(v.count(), 2);
        assert!(v.get(3).abs() < 1e-40);

        v.tidy();
        assert_eq!(v.count(), 1);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(1, -1_f64)]);
        assert_eq!(v.get(3), 0_f64);
    }

    #[test]
    fn clear() {
        let mut v = WorkVector::from_sparse(10, vec![(0, 1_f64), (9, 4_f64)]);
        assert_abs_diff_eq!(v.max_abs(), 4_f64);

        v.clear();
        assert_eq!(v.count(), 0);
        assert!(v.as_slice().iter().all(|&value| value == 0_f64));

        let mut dense = WorkVector::from_sparse(2, vec![(0, 1_f64), (1, 1_f64)]);
        dense.clear();
        assert_eq!(dense, WorkVector::new(2));
    }

    #[test]
    fn set() {
        let mut v = WorkVector::new(3);
        v.set(2, 3_f64);
        v.set(2, 0_f64);
        v.set(0, 0_f64);
        assert_eq!(v.count(), 1);
        v.set(1, -1_f64);
        v.tidy();
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(1, -1_f64)]);
    }
}
