//! # Ratio test
//!
//! Determining how far the entering column can move before a basic column hits a bound, and which
//! basic column leaves the basis.
//!
//! Harris rule, see e.g. Gill, P. E., Murray, W., Saunders, M. A., & Wright, M. H. (1989). A
//! practical anti-cycling procedure for linearly constrained optimization. Mathematical
//! Programming, 45(1-3), 437-474.
//!
//! First, the maximum step is determined for which all basic columns remain within their bounds
//! relaxed by the feasibility tolerance. Second, among the basic columns that hit their (exact)
//! bound within that step, the one with the largest pivot magnitude leaves. This gives a more
//! stable basis at the price of bound violations that are at most the tolerance.
//!
//! In phase one, the violated bounds of infeasible basic columns are breakpoints of the piecewise
//! linear sum of infeasibilities. The step passes breakpoints for as long as that sum decreases.
use crate::algorithm::primal::state::Phase;
use crate::data::linear_algebra::vector::WorkVector;
use crate::data::linear_program::elements::BoundDirection;

/// Entries of the transformed column below this magnitude can't be a pivot.
pub const ALPHA_TOLERANCE: f64 = 1e-9;

/// Result of the ratio test.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RowChoice {
    /// A basic column leaves the basis.
    Pivot {
        /// Basis position of the leaving column.
        position: usize,
        /// Distance the entering column moves.
        step: f64,
        /// Bound at which the leaving column ends up.
        bound: BoundDirection,
    },
    /// The entering column moves to its opposite bound without a basis change.
    Flip {
        /// Distance the entering column moves, its range.
        step: f64,
    },
    /// The entering column can move indefinitely.
    Unbounded,
}

/// Input of the ratio test.
#[derive(Debug)]
pub struct RatioTest<'a> {
    /// The entering column after FTRAN, indexed by basis position.
    pub column: &'a WorkVector,
    /// `1` if the entering column increases, `-1` if it decreases.
    pub direction: f64,
    /// Value of the basic column in each position.
    pub value: &'a [f64],
    /// Lower bound of the basic column in each position.
    pub lower: &'a [f64],
    /// Upper bound of the basic column in each position.
    pub upper: &'a [f64],
    /// In phase one, the step may pass the violated bounds of infeasible basic columns.
    pub phase: Phase,
    /// Reduced cost of the entering column with respect to the cost of the current phase.
    pub reduced_cost: f64,
    /// Primal feasibility tolerance, the amount by which bounds are relaxed.
    pub tolerance: f64,
    /// Distance between the bounds of the entering column.
    pub entering_range: f64,
}

impl RatioTest<'_> {
    /// Choose the leaving row, or decide to flip or that the problem is unbounded.
    pub fn choose(&self) -> RowChoice {
        // Pass 1: maximum step with relaxed bounds
        let mut max_step = self.entering_range;
        for (position, alpha) in self.column.iter() {
            if alpha.abs() < ALPHA_TOLERANCE {
                continue;
            }
            if let Some((_, bound)) = self.blocking_bound(position, alpha) {
                let step = self.distance(position, alpha, bound, self.tolerance) / alpha.abs();
                if step < max_step {
                    max_step = step;
                }
            }
        }

        if self.phase == Phase::One {
            if let Some((position, step, bound)) = self.pass_breakpoints(max_step) {
                return RowChoice::Pivot { position, step, bound };
            }
        }

        // Pass 2: largest pivot among the rows blocking within that step
        let mut chosen: Option<(usize, f64, BoundDirection)> = None;
        let mut pivot_magnitude = 0_f64;
        for (position, alpha) in self.column.iter() {
            if alpha.abs() < ALPHA_TOLERANCE {
                continue;
            }
            if let Some((direction, bound)) = self.blocking_bound(position, alpha) {
                let step = self.distance(position, alpha, bound, 0_f64) / alpha.abs();
                let better = alpha.abs() > pivot_magnitude
                    || (alpha.abs() == pivot_magnitude && chosen.is_some_and(|(p, _, _)| position < p));
                if step <= max_step && better {
                    chosen = Some((position, step, direction));
                    pivot_magnitude = alpha.abs();
                }
            }
        }

        match chosen {
            Some((position, step, bound)) => RowChoice::Pivot { position, step, bound },
            None if self.entering_range.is_finite() => RowChoice::Flip { step: self.entering_range },
            None => RowChoice::Unbounded,
        }
    }

    /// Move through the phase one breakpoints while the sum of infeasibilities keeps decreasing.
    ///
    /// An infeasible basic column that moves towards its violated bound becomes feasible at that
    /// bound. Beyond it, the slope of the phase one objective increases by the magnitude of its
    /// entry in the column. The step stops at the breakpoint where the slope is no longer negative.
    ///
    /// # Arguments
    ///
    /// * `max_step`: Step at which a row blocks by a hard bound, or the range of the entering column.
    ///
    /// # Return value
    ///
    /// The leaving position, step and bound if a breakpoint stops the step before `max_step`.
    fn pass_breakpoints(&self, max_step: f64) -> Option<(usize, f64, BoundDirection)> {
        let mut breakpoints = self.column.iter()
            .filter(|&(_, alpha)| alpha.abs() >= ALPHA_TOLERANCE)
            .filter_map(|(position, alpha)| {
                self.breakpoint(position, alpha).map(|(direction, bound)| {
                    let step = self.distance(position, alpha, bound, 0_f64) / alpha.abs();
                    (position, step, direction, alpha.abs())
                })
            })
            .filter(|&(_, step, _, _)| step <= max_step)
            .collect::<Vec<_>>();
        breakpoints.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let mut slope = -self.reduced_cost.abs();
        let mut last = None;
        for (position, step, direction, magnitude) in breakpoints {
            slope += magnitude;
            last = Some((position, step, direction));
            if slope > -ALPHA_TOLERANCE {
                return last;
            }
        }

        // Nothing else blocks, the last breakpoint passed is the best stop
        if max_step.is_infinite() {
            last
        } else {
            None
        }
    }

    /// Bound that the basic column in a position moves towards, if it blocks.
    ///
    /// In phase one, an infeasible basic column that moves towards feasibility blocks at its
    /// opposite bound. Its violated bound is a breakpoint instead, see `breakpoint`.
    ///
    /// # Arguments
    ///
    /// * `position`: Basis position.
    /// * `alpha`: Value of the transformed entering column in that position. The basic value
    /// changes by `-alpha` per unit of movement of the entering column in its increasing direction.
    fn blocking_bound(&self, position: usize, alpha: f64) -> Option<(BoundDirection, f64)> {
        let lower = self.lower[position];
        let upper = self.upper[position];
        let is_increasing = -self.direction * alpha > 0_f64;
        let (below, above) = self.violation(position);

        let bound = match (self.phase, is_increasing) {
            (Phase::One, true) if above => None,
            (Phase::One, false) if below => None,
            (_, true) => Some((BoundDirection::Upper, upper)),
            (_, false) => Some((BoundDirection::Lower, lower)),
        };

        bound.filter(|&(_, bound)| bound.is_finite())
    }

    /// Violated bound of an infeasible basic column that moves towards feasibility, in phase one.
    fn breakpoint(&self, position: usize, alpha: f64) -> Option<(BoundDirection, f64)> {
        let is_increasing = -self.direction * alpha > 0_f64;
        let (below, above) = self.violation(position);

        match is_increasing {
            true if below => Some((BoundDirection::Lower, self.lower[position])),
            false if above => Some((BoundDirection::Upper, self.upper[position])),
            _ => None,
        }
    }

    /// Whether the basic column in a position is below its lower or above its upper bound.
    fn violation(&self, position: usize) -> (bool, bool) {
        let value = self.value[position];
        (value < self.lower[position] - self.tolerance, value > self.upper[position] + self.tolerance)
    }

    /// Nonnegative distance between a basic value and its bound, relaxed by `relaxation`.
    fn distance(&self, position: usize, alpha: f64, bound: f64, relaxation: f64) -> f64 {
        let value = self.value[position];
        let distance = if -self.direction * alpha > 0_f64 {
            bound + relaxation - value
        } else {
            value - bound + relaxation
        };

        distance.max(0_f64)
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::algorithm::primal::ratio_test::{RatioTest, RowChoice};
    use crate::algorithm::primal::state::Phase;
    use crate::data::linear_algebra::vector::WorkVector;
    use crate::data::linear_program::elements::BoundDirection;

    const INF: f64 = f64::INFINITY;

    fn ratio_test<'a>(
        column: &'a WorkVector,
        value: &'a [f64],
        lower: &'a [f64],
        upper: &'a [f64],
        phase: Phase,
        entering_range: f64,
    ) -> RatioTest<'a> {
        RatioTest {
            column,
            direction: 1_f64,
            value,
            lower,
            upper,
            phase,
            reduced_cost: -1_f64,
            tolerance: 1e-7,
            entering_range,
        }
    }

    #[test]
    fn smallest_ratio() {
        // Basic values decrease with 1 and 2 per unit, distances to the lower bounds are 4 and 6
        let column = WorkVector::from_sparse(2, vec![(0, 1_f64), (1, 2_f64)]);
        let test = ratio_test(&column, &[4_f64, 6_f64], &[0_f64; 2], &[INF; 2], Phase::Two, INF);
        assert_eq!(test.choose(), RowChoice::Pivot { position: 1, step: 3_f64, bound: BoundDirection::Lower });
    }

    #[test]
    fn harris_prefers_larger_pivot() {
        // Ratios 1.0 and 1.0 + 1e-8 are equal within the tolerance; the larger pivot wins
        let column = WorkVector::from_sparse(2, vec![(0, 1e-3), (1, 1_f64)]);
        let value = [1e-3, 1_f64 + 1e-8];
        let test = ratio_test(&column, &value, &[0_f64; 2], &[INF; 2], Phase::Two, INF);
        match test.choose() {
            RowChoice::Pivot { position, step, .. } => {
                assert_eq!(position, 1);
                // Every basic value stays within the tolerance of its bound
                for (i, alpha) in column.iter() {
                    assert!(value[i] - alpha * step >= -1e-7);
                }
            },
            other => panic!("expected a pivot, got {:?}", other),
        }
    }

    #[test]
    fn bound_flip() {
        let column = WorkVector::from_sparse(1, vec![(0, -1_f64)]);
        // Basic column increases towards 10, entering column has range 2
        let test = ratio_test(&column, &[0_f64], &[0_f64], &[10_f64], Phase::Two, 2_f64);
        assert_eq!(test.choose(), RowChoice::Flip { step: 2_f64 });
    }

    #[test]
    fn unbounded() {
        let column = WorkVector::from_sparse(2, vec![(0, -1_f64), (1, 1e-12)]);
        let test = ratio_test(&column, &[0_f64, 0_f64], &[0_f64; 2], &[INF; 2], Phase::Two, INF);
        assert_eq!(test.choose(), RowChoice::Unbounded);

        let empty = WorkVector::new(0);
        let test = ratio_test(&empty, &[], &[], &[], Phase::Two, INF);
        assert_eq!(test.choose(), RowChoice::Unbounded);
    }

    #[test]
    fn phase_one_breakpoint() {
        // Position 0 is below its lower bound of 5 and increases: it blocks at 5, not at 8
        // Position 1 is above its upper bound and increases further: it doesn't block
        let column = WorkVector::from_sparse(2, vec![(0, -1_f64), (1, -1_f64)]);
        let test = ratio_test(&column, &[2_f64, 4_f64], &[5_f64, 0_f64], &[8_f64, 1_f64], Phase::One, INF);
        match test.choose() {
            RowChoice::Pivot { position, step, bound } => {
                assert_eq!(position, 0);
                assert_eq!(bound, BoundDirection::Lower);
                assert_abs_diff_eq!(step, 3_f64);
            },
            other => panic!("expected a pivot, got {:?}", other),
        }
    }

    #[test]
    fn phase_one_passes_breakpoints() {
        // Three basic columns below their lower bounds of 1, 2 and 3 all increase with 1 per unit.
        // The sum of infeasibilities decreases with 3, 2 and 1 per unit between the breakpoints.
        let column = WorkVector::from_sparse(3, vec![(0, -1_f64), (1, -1_f64), (2, -1_f64)]);
        let lower = [1_f64, 2_f64, 3_f64];
        let mut test = ratio_test(&column, &[0_f64; 3], &lower, &[INF; 3], Phase::One, INF);
        test.reduced_cost = -3_f64;
        assert_eq!(test.choose(), RowChoice::Pivot { position: 2, step: 3_f64, bound: BoundDirection::Lower });

        // With a smaller reduced cost, the slope is no longer negative after the second breakpoint
        test.reduced_cost = -2_f64;
        assert_eq!(test.choose(), RowChoice::Pivot { position: 1, step: 2_f64, bound: BoundDirection::Lower });
    }

    #[test]
    fn phase_one_hard_bound_before_breakpoint() {
        // Positions 0, 1 and 2 are infeasible as above, position 3 is feasible and hits 0 at 2.5
        let column = WorkVector::from_sparse(4, vec![(0, -1_f64), (1, -1_f64), (2, -1_f64), (3, 1_f64)]);
        let value = [0_f64, 0_f64, 0_f64, 2.5];
        let lower = [1_f64, 2_f64, 3_f64, 0_f64];
        let mut test = ratio_test(&column, &value, &lower, &[INF; 4], Phase::One, INF);
        test.reduced_cost = -3_f64;
        assert_eq!(test.choose(), RowChoice::Pivot { position: 3, step: 2.5, bound: BoundDirection::Lower });

        // A column that becomes feasible blocks at its upper bound
        let upper = [1.5, INF, INF, INF];
        let test = RatioTest { upper: &upper, ..test };
        match test.choose() {
            RowChoice::Pivot { position, step, bound } => {
                assert_eq!(position, 0);
                assert_eq!(bound, BoundDirection::Upper);
                assert_abs_diff_eq!(step, 1.5);
            },
            other => panic!("expected a pivot, got {:?}", other),
        }
    }
}
