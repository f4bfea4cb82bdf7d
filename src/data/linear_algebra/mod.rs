//! # Linear algebra primitives
//!
//! A compressed sparse matrix for the constraint data and a dense/sparse hybrid vector used as the
//! work buffer of the simplex method.

pub mod matrix;
pub mod vector;

/// An index paired with the value stored at that index.
pub type SparseTuple<T> = (usize, T);

/// Values with an absolute value below this threshold are treated as structural zeros.
///
/// Used when cleaning up work vectors after a solve, and when deciding whether a coefficient is
/// worth storing at all.
pub const TINY: f64 = 1e-14;

/// Placeholder stored in place of an exact cancellation in a work vector.
///
/// An entry that cancels to exactly zero remains in the index list of the vector; storing this
/// value instead of zero keeps the index and the values consistent until the next `tidy`.
pub const CANCELLED: f64 = 1e-50;
