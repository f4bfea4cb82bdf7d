//! # Basis state
//!
//! Which columns are basic, in which position, and where the nonbasic columns are. Columns are
//! indexed in the combined space: structural columns first, then one slack column per row.
use crate::data::linear_program::elements::BasisStatus;
use crate::data::linear_program::solution::Basis;

/// Where a nonbasic column is, and thereby in which direction it may move.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NonbasicState {
    /// At the (finite) lower bound, may increase.
    AtLower,
    /// At the (finite) upper bound, may decrease.
    AtUpper,
    /// Both bounds are equal, can't move.
    Fixed,
    /// No finite bounds, value zero, may move in both directions.
    Free,
}

impl NonbasicState {
    /// State for a column with the given bounds, preferring the lower bound.
    pub fn from_bounds(lower: f64, upper: f64) -> Self {
        if lower == upper {
            NonbasicState::Fixed
        } else if lower.is_finite() {
            NonbasicState::AtLower
        } else if upper.is_finite() {
            NonbasicState::AtUpper
        } else {
            NonbasicState::Free
        }
    }

    /// Value of a column in this state.
    pub fn value(self, lower: f64, upper: f64) -> f64 {
        match self {
            NonbasicState::AtLower | NonbasicState::Fixed => lower,
            NonbasicState::AtUpper => upper,
            NonbasicState::Free => 0_f64,
        }
    }

    /// Sign of the direction the column may move in, zero if it may move in both or neither.
    pub fn direction(self) -> f64 {
        match self {
            NonbasicState::AtLower => 1_f64,
            NonbasicState::AtUpper => -1_f64,
            NonbasicState::Fixed | NonbasicState::Free => 0_f64,
        }
    }

    fn basis_status(self) -> BasisStatus {
        match self {
            NonbasicState::AtLower | NonbasicState::Fixed => BasisStatus::Lower,
            NonbasicState::AtUpper => BasisStatus::Upper,
            NonbasicState::Free => BasisStatus::Zero,
        }
    }

    /// State matching a basis status, if the bounds allow it.
    fn from_basis_status(status: BasisStatus, lower: f64, upper: f64) -> Self {
        match status {
            _ if lower == upper => NonbasicState::Fixed,
            BasisStatus::Lower if lower.is_finite() => NonbasicState::AtLower,
            BasisStatus::Upper if upper.is_finite() => NonbasicState::AtUpper,
            BasisStatus::Zero if !lower.is_finite() && !upper.is_finite() => NonbasicState::Free,
            _ => NonbasicState::from_bounds(lower, upper),
        }
    }
}

/// The columns in the basis and the state of the others.
///
/// Invariant: `basic_index` holds exactly one distinct column per row, and `nonbasic_flag` is
/// `false` for exactly those columns.
#[derive(Clone, Debug, PartialEq)]
pub struct SimplexBasis {
    /// Per basis position, the basic column.
    pub basic_index: Vec<usize>,
    /// Per column, whether it is nonbasic.
    pub nonbasic_flag: Vec<bool>,
    /// Per column, the state if nonbasic. Not meaningful for basic columns.
    pub nonbasic_state: Vec<NonbasicState>,
}

impl SimplexBasis {
    /// All slack columns basic, all structural columns at a bound.
    ///
    /// # Arguments
    ///
    /// * `nr_columns`: Number of structural columns.
    /// * `lower`, `upper`: Bounds of all columns, structural and slack.
    pub fn slack(nr_columns: usize, lower: &[f64], upper: &[f64]) -> Self {
        let nr_total = lower.len();

        Self {
            basic_index: (nr_columns..nr_total).collect(),
            nonbasic_flag: (0..nr_total).map(|j| j < nr_columns).collect(),
            nonbasic_state: lower.iter().zip(upper)
                .map(|(&lower, &upper)| NonbasicState::from_bounds(lower, upper))
                .collect(),
        }
    }

    /// Basis described by basis statuses.
    ///
    /// # Arguments
    ///
    /// * `basis`: Status of all structural and slack columns.
    /// * `lower`, `upper`: Bounds of all columns, structural and slack.
    ///
    /// # Return value
    ///
    /// `None` if the statuses don't have the right dimensions or number of basic columns.
    pub fn from_statuses(basis: &Basis, lower: &[f64], upper: &[f64]) -> Option<Self> {
        let nr_columns = basis.column_status.len();
        let nr_rows = basis.row_status.len();
        if nr_columns + nr_rows != lower.len() || !basis.is_valid_for(nr_columns, nr_rows) {
            return None;
        }

        let statuses = basis.column_status.iter().chain(&basis.row_status);
        let basic_index = statuses.clone()
            .enumerate()
            .filter(|&(_, &status)| status == BasisStatus::Basic)
            .map(|(j, _)| j)
            .collect();
        let nonbasic_flag = statuses.clone().map(|&status| status != BasisStatus::Basic).collect();
        let nonbasic_state = statuses.zip(lower.iter().zip(upper))
            .map(|(&status, (&lower, &upper))| NonbasicState::from_basis_status(status, lower, upper))
            .collect();

        Some(Self { basic_index, nonbasic_flag, nonbasic_state })
    }

    /// Describe this basis by basis statuses.
    pub fn to_statuses(&self, nr_columns: usize) -> Basis {
        let mut statuses = self.nonbasic_flag.iter().zip(&self.nonbasic_state)
            .map(|(&nonbasic, state)| if nonbasic { state.basis_status() } else { BasisStatus::Basic })
            .collect::<Vec<_>>();
        let row_status = statuses.split_off(nr_columns);

        Basis { column_status: statuses, row_status }
    }

    /// Replace the column in a basis position.
    ///
    /// # Arguments
    ///
    /// * `position`: Basis position.
    /// * `entering`: Column that becomes basic.
    /// * `leaving_state`: State of the column that leaves the basis.
    ///
    /// # Return value
    ///
    /// The leaving column.
    pub fn replace(&mut self, position: usize, entering: usize, leaving_state: NonbasicState) -> usize {
        debug_assert!(self.nonbasic_flag[entering]);

        let leaving = self.basic_index[position];
        self.basic_index[position] = entering;
        self.nonbasic_flag[entering] = false;
        self.nonbasic_flag[leaving] = true;
        self.nonbasic_state[leaving] = leaving_state;
        debug_assert!(self.is_consistent());

        leaving
    }

    /// Check the invariant.
    pub fn is_consistent(&self) -> bool {
        let mut seen = vec![false; self.nonbasic_flag.len()];
        for &j in &self.basic_index {
            if j >= seen.len() || seen[j] || self.nonbasic_flag[j] {
                return false;
            }
            seen[j] = true;
        }

        self.nonbasic_flag.iter().filter(|&&nonbasic| !nonbasic).count() == self.basic_index.len()
    }
}

/// Stage of the primal simplex method.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Minimizing the sum of bound violations of the basic columns.
    One,
    /// Minimizing the objective while keeping the basic columns feasible.
    Two,
}

/// Why the basic values, duals and possibly the factorization should be recomputed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RebuildReason {
    /// No factorization exists yet.
    Fresh,
    /// The number of basis updates reached the limit.
    UpdateLimitReached,
    /// The number of bound flips reached the limit.
    FlipLimitReached,
    /// Pivots from the column and from the row disagree.
    NumericalTrouble,
    /// No improving column was found, to be confirmed with fresh values.
    PossiblyOptimal,
    /// No improving column was found during phase one, to be confirmed with fresh values.
    PossiblyInfeasible,
    /// No blocking row was found, to be confirmed with fresh values.
    PossiblyUnbounded,
}

#[cfg(test)]
mod test {
    use crate::algorithm::primal::state::{NonbasicState, SimplexBasis};
    use crate::data::linear_program::elements::BasisStatus;
    use crate::data::linear_program::solution::Basis;

    const INF: f64 = f64::INFINITY;

    #[test]
    fn nonbasic_state() {
        assert_eq!(NonbasicState::from_bounds(1_f64, 1_f64), NonbasicState::Fixed);
        assert_eq!(NonbasicState::from_bounds(0_f64, INF), NonbasicState::AtLower);
        assert_eq!(NonbasicState::from_bounds(-INF, 3_f64), NonbasicState::AtUpper);
        assert_eq!(NonbasicState::from_bounds(-INF, INF), NonbasicState::Free);
        assert_eq!(NonbasicState::AtUpper.value(-INF, 3_f64), 3_f64);
        assert_eq!(NonbasicState::Free.direction(), 0_f64);
    }

    #[test]
    fn slack_basis() {
        let lower = [0_f64, -INF, -INF];
        let upper = [1_f64, INF, 4_f64];
        let basis = SimplexBasis::slack(2, &lower, &upper);
        assert_eq!(basis.basic_index, vec![2]);
        assert_eq!(basis.nonbasic_flag, vec![true, true, false]);
        assert_eq!(basis.nonbasic_state[1], NonbasicState::Free);
        assert!(basis.is_consistent());

        let statuses = basis.to_statuses(2);
        assert_eq!(statuses.column_status, vec![BasisStatus::Lower, BasisStatus::Zero]);
        assert_eq!(statuses.row_status, vec![BasisStatus::Basic]);
    }

    #[test]
    fn from_statuses() {
        let lower = [0_f64, 0_f64, -INF];
        let upper = [1_f64, 1_f64, 4_f64];
        let statuses = Basis {
            column_status: vec![BasisStatus::Basic, BasisStatus::Upper],
            row_status: vec![BasisStatus::Upper],
        };
        let mut basis = SimplexBasis::from_statuses(&statuses, &lower, &upper).unwrap();
        assert_eq!(basis.basic_index, vec![0]);
        assert_eq!(basis.nonbasic_state[1], NonbasicState::AtUpper);
        assert!(basis.is_consistent());

        let leaving = basis.replace(0, 2, NonbasicState::AtLower);
        assert_eq!(leaving, 0);
        assert_eq!(basis.basic_index, vec![2]);
        assert!(basis.is_consistent());

        let too_many_basic = Basis {
            column_status: vec![BasisStatus::Basic, BasisStatus::Basic],
            row_status: vec![BasisStatus::Upper],
        };
        assert!(SimplexBasis::from_statuses(&too_many_basic, &lower, &upper).is_none());
    }
}
