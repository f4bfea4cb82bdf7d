//! # Matrix implementations
//!
//! Compressed sparse storage: a start offset per major index (column for `ColumnMajor`, row for
//! `RowMajor`), and per nonzero the minor index and the value. Minor indices are sorted and unique
//! within each major vector.
use std::fmt::Debug;
use std::marker::PhantomData;

use itertools::Itertools;
use thiserror::Error;

use crate::data::linear_algebra::SparseTuple;

/// Whether the major index of a matrix refers to columns or rows.
pub trait Order: Copy + Clone + Debug + Eq {
    /// The other ordering, used when transposing.
    type Transposed: Order<Transposed = Self>;
}

/// Major index is the column index, a column can be iterated over cheaply.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ColumnMajor;
impl Order for ColumnMajor {
    type Transposed = RowMajor;
}

/// Major index is the row index, a row can be iterated over cheaply.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RowMajor;
impl Order for RowMajor {
    type Transposed = ColumnMajor;
}

/// Reasons why the raw data of a compressed matrix is not acceptable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// There should be one start offset per major vector, plus one.
    #[error("expected {expected} start offsets, found {found}")]
    StartLength {
        /// Number of major vectors plus one.
        expected: usize,
        /// Length of the start offsets.
        found: usize,
    },
    /// Start offsets that don't start at zero or decrease.
    #[error("start offsets must begin at zero and be nondecreasing (major index {major})")]
    StartNotMonotone {
        /// First major vector with a bad offset.
        major: usize,
    },
    /// The last start offset is not the number of stored values.
    #[error("last start offset {last} does not match the number of nonzeros {nr_nonzeros}")]
    NonzeroCount {
        /// Value of the last start offset.
        last: usize,
        /// Number of stored values.
        nr_nonzeros: usize,
    },
    /// A minor index is not smaller than the minor dimension.
    #[error("index {index} in major vector {major} is out of range (size {size})")]
    IndexOutOfRange {
        /// Major vector containing the index.
        major: usize,
        /// The offending minor index.
        index: usize,
        /// Minor dimension.
        size: usize,
    },
    /// Minor indices within a major vector are not strictly increasing.
    #[error("indices of major vector {major} are not strictly increasing")]
    IndicesNotSorted {
        /// Major vector with unsorted indices.
        major: usize,
    },
    /// A stored value is infinite or NaN.
    #[error("value at index {index} of major vector {major} is not finite")]
    NotFinite {
        /// Major vector containing the value.
        major: usize,
        /// Minor index of the value.
        index: usize,
    },
}

/// Sparse matrix in compressed storage.
///
/// The `ColumnMajor` instantiation stores the constraint matrix of a model, the `RowMajor` one is
/// built from it when rows need to be traversed (presolve, pivot row computation).
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix<O: Order> {
    start: Vec<usize>,
    index: Vec<usize>,
    value: Vec<f64>,

    nr_minor: usize,

    phantom_ordering: PhantomData<O>,
}

/// Constraint matrix layout.
pub type ColumnMatrix = SparseMatrix<ColumnMajor>;
/// Transposed constraint matrix layout.
pub type RowMatrix = SparseMatrix<RowMajor>;

impl<O: Order> SparseMatrix<O> {
    /// Create a new instance from raw compressed data.
    ///
    /// # Arguments
    ///
    /// * `start`: Offsets of the major vectors into `index` and `value`, one more than the number
    /// of major vectors.
    /// * `index`: Minor index of each nonzero.
    /// * `value`: Value of each nonzero.
    /// * `nr_minor`: Size of the minor dimension.
    ///
    /// # Return value
    ///
    /// The matrix, or the first problem found with the data.
    pub fn new(
        start: Vec<usize>,
        index: Vec<usize>,
        value: Vec<f64>,
        nr_minor: usize,
    ) -> Result<Self, MatrixError> {
        if start.is_empty() {
            return Err(MatrixError::StartLength { expected: 1, found: 0 });
        }
        if start[0] != 0 {
            return Err(MatrixError::StartNotMonotone { major: 0 });
        }
        if let Some(major) = start.windows(2).position(|pair| pair[0] > pair[1]) {
            return Err(MatrixError::StartNotMonotone { major });
        }
        let last = start[start.len() - 1];
        if last != index.len() || last != value.len() {
            return Err(MatrixError::NonzeroCount { last, nr_nonzeros: index.len().max(value.len()) });
        }

        for (major, (&begin, &end)) in start.iter().tuple_windows().enumerate() {
            let indices = &index[begin..end];
            if let Some(&out_of_range) = indices.iter().find(|&&i| i >= nr_minor) {
                return Err(MatrixError::IndexOutOfRange { major, index: out_of_range, size: nr_minor });
            }
            if !indices.iter().tuple_windows().all(|(a, b)| a < b) {
                return Err(MatrixError::IndicesNotSorted { major });
            }
            if let Some(position) = value[begin..end].iter().position(|v| !v.is_finite()) {
                return Err(MatrixError::NotFinite { major, index: indices[position] });
            }
        }

        Ok(Self { start, index, value, nr_minor, phantom_ordering: PhantomData })
    }

    /// Create a new instance from a vector of major vectors.
    ///
    /// Entries within a major vector are sorted by minor index, zero values are dropped.
    ///
    /// # Arguments
    ///
    /// * `data`: Per major index, the (minor index, value) tuples.
    /// * `nr_minor`: Size of the minor dimension.
    pub fn from_major_vectors(
        data: Vec<Vec<SparseTuple<f64>>>,
        nr_minor: usize,
    ) -> Result<Self, MatrixError> {
        let mut start = Vec::with_capacity(data.len() + 1);
        let mut index = Vec::new();
        let mut value = Vec::new();

        start.push(0);
        for major_vector in data {
            for (i, v) in major_vector.into_iter()
                .filter(|&(_, v)| v != 0_f64)
                .sorted_by_key(|&(i, _)| i) {
                index.push(i);
                value.push(v);
            }
            start.push(index.len());
        }

        Self::new(start, index, value, nr_minor)
    }

    /// Matrix with the given dimensions and no nonzeros.
    pub fn empty(nr_major: usize, nr_minor: usize) -> Self {
        Self {
            start: vec![0; nr_major + 1],
            index: Vec::new(),
            value: Vec::new(),
            nr_minor,
            phantom_ordering: PhantomData,
        }
    }

    /// Iterate over the nonzeros of a major vector.
    pub fn iter_major(&self, major: usize) -> impl Iterator<Item = SparseTuple<f64>> + '_ {
        debug_assert!(major < self.nr_major());

        let range = self.start[major]..self.start[major + 1];
        self.index[range.clone()].iter().copied().zip(self.value[range].iter().copied())
    }

    /// Number of nonzeros in a major vector.
    pub fn major_len(&self, major: usize) -> usize {
        self.start[major + 1] - self.start[major]
    }

    /// Inner product of a major vector with a dense vector over the minor dimension.
    pub fn dot_major(&self, major: usize, dense: &[f64]) -> f64 {
        debug_assert_eq!(dense.len(), self.nr_minor);

        self.iter_major(major).map(|(i, v)| v * dense[i]).sum()
    }

    /// Size of the major dimension.
    pub fn nr_major(&self) -> usize {
        self.start.len() - 1
    }

    /// Size of the minor dimension.
    pub fn nr_minor(&self) -> usize {
        self.nr_minor
    }

    /// Number of stored values.
    pub fn nr_nonzeros(&self) -> usize {
        self.index.len()
    }

    /// Create the same matrix with the other storage order.
    ///
    /// Counting sort over the minor indices, which keeps the new minor indices sorted.
    pub fn transpose(&self) -> SparseMatrix<O::Transposed> {
        let mut count = vec![0; self.nr_minor + 1];
        for &i in &self.index {
            count[i + 1] += 1;
        }
        for i in 0..self.nr_minor {
            count[i + 1] += count[i];
        }
        let start = count.clone();

        let mut index = vec![0; self.nr_nonzeros()];
        let mut value = vec![0_f64; self.nr_nonzeros()];
        for major in 0..self.nr_major() {
            for (minor, v) in self.iter_major(major) {
                let position = count[minor];
                index[position] = major;
                value[position] = v;
                count[minor] += 1;
            }
        }

        SparseMatrix {
            start,
            index,
            value,
            nr_minor: self.nr_major(),
            phantom_ordering: PhantomData,
        }
    }

    /// Select a subset of the major vectors and a subset of the minor indices.
    ///
    /// # Arguments
    ///
    /// * `majors`: Major indices to keep, in their new order.
    /// * `minor_map`: For each old minor index, its new index, or `None` if it is dropped.
    /// * `nr_minor`: Size of the new minor dimension.
    pub fn select(&self, majors: &[usize], minor_map: &[Option<usize>], nr_minor: usize) -> Self {
        debug_assert_eq!(minor_map.len(), self.nr_minor);

        let mut start = Vec::with_capacity(majors.len() + 1);
        let mut index = Vec::new();
        let mut value = Vec::new();

        start.push(0);
        for &major in majors {
            // A monotone minor map keeps the indices sorted
            for (minor, v) in self.iter_major(major) {
                if let Some(new_minor) = minor_map[minor] {
                    index.push(new_minor);
                    value.push(v);
                }
            }
            start.push(index.len());
        }

        Self { start, index, value, nr_minor, phantom_ordering: PhantomData }
    }
}

impl SparseMatrix<ColumnMajor> {
    /// Iterate over the (row index, value) tuples of a column.
    pub fn column(&self, j: usize) -> impl Iterator<Item = SparseTuple<f64>> + '_ {
        self.iter_major(j)
    }
    /// Number of columns.
    pub fn nr_columns(&self) -> usize {
        self.nr_major()
    }
    /// Number of rows.
    pub fn nr_rows(&self) -> usize {
        self.nr_minor()
    }
}

impl SparseMatrix<RowMajor> {
    /// Iterate over the (column index, value) tuples of a row.
    pub fn row(&self, i: usize) -> impl Iterator<Item = SparseTuple<f64>> + '_ {
        self.iter_major(i)
    }
    /// Number of rows.
    pub fn nr_rows(&self) -> usize {
        self.nr_major()
    }
    /// Number of columns.
    pub fn nr_columns(&self) -> usize {
        self.nr_minor()
    }
}
