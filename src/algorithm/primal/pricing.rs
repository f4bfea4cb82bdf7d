//! # Pricing
//!
//! Choosing the entering column. A column is a candidate when its reduced cost shows that moving
//! it in a direction it is allowed to move decreases the objective. Candidates are compared by
//! their reduced cost, squared and, with Devex pricing, divided by a weight that approximates the
//! squared norm of the edge direction in a reference framework.
use crate::algorithm::primal::state::NonbasicState;
use crate::data::linear_algebra::vector::WorkVector;
use crate::settings::PricingRule;

/// A weight is considered inaccurate when it is off by more than this factor from the recomputed
/// reference weight of the entering column.
pub const BAD_DEVEX_WEIGHT_FACTOR: f64 = 3_f64;

/// Minimum number of Devex iterations before a rebuild resets the reference framework.
const MIN_DEVEX_RESET_INTERVAL: usize = 100;

/// Approximate steepest edge weights.
///
/// Weights are squared norms. The reference framework is the set of columns that were nonbasic at
/// the last reset.
#[derive(Clone, Debug, PartialEq)]
pub struct DevexWeights {
    weight: Vec<f64>,
    reference: Vec<bool>,

    /// Number of consecutive bad weights.
    nr_bad_weights: usize,
    allowed_bad_weights: usize,
    /// Number of updates since the last reset.
    nr_iterations: usize,
}

impl DevexWeights {
    /// Create a new instance with all weights equal to one.
    ///
    /// # Arguments
    ///
    /// * `nonbasic_flag`: Which columns are nonbasic, these form the reference framework.
    /// * `allowed_bad_weights`: Number of consecutive bad weights that is tolerated.
    pub fn new(nonbasic_flag: &[bool], allowed_bad_weights: usize) -> Self {
        Self {
            weight: vec![1_f64; nonbasic_flag.len()],
            reference: nonbasic_flag.to_vec(),

            nr_bad_weights: 0,
            allowed_bad_weights,
            nr_iterations: 0,
        }
    }

    /// Start a new reference framework: all weights one, no bad weights counted.
    pub fn reset(&mut self, nonbasic_flag: &[bool]) {
        self.weight.iter_mut().for_each(|weight| *weight = 1_f64);
        self.reference.copy_from_slice(nonbasic_flag);
        self.nr_bad_weights = 0;
        self.nr_iterations = 0;
    }

    /// Whether the framework has been used long enough that a rebuild should reset it.
    pub fn should_reset(&self, nr_rows: usize) -> bool {
        self.nr_iterations > MIN_DEVEX_RESET_INTERVAL.max(nr_rows)
    }

    /// Current weight of a column.
    pub fn weight(&self, j: usize) -> f64 {
        self.weight[j]
    }

    /// Number of consecutive bad weights seen since the last good one.
    pub fn nr_bad_weights(&self) -> usize {
        self.nr_bad_weights
    }

    /// Compare the stored weight of the entering column with its recomputed reference weight.
    ///
    /// # Return value
    ///
    /// Whether the number of consecutive bad weights now exceeds the allowed number.
    pub fn register_weight_check(&mut self, stored: f64, reference: f64) -> bool {
        let bound = BAD_DEVEX_WEIGHT_FACTOR * BAD_DEVEX_WEIGHT_FACTOR;
        if stored > bound * reference || reference > bound * stored {
            self.nr_bad_weights += 1;
        } else {
            self.nr_bad_weights = 0;
        }

        self.nr_bad_weights > self.allowed_bad_weights
    }

    /// Update the weights after a basis change.
    ///
    /// # Arguments
    ///
    /// * `entering`: Column entering the basis.
    /// * `leaving`: Column leaving the basis.
    /// * `column`: Entering column after FTRAN, indexed by basis position.
    /// * `basic_index`: Basic columns before the basis change.
    /// * `pivot`: Value of `column` in the pivot position.
    /// * `pivot_row`: Nonzero values of the pivot row for the nonbasic columns, excluding the
    /// entering column.
    ///
    /// # Return value
    ///
    /// Whether too many consecutive bad weights were seen. The weights were not updated in that
    /// case, and the caller should reset the framework once the basis change is applied.
    pub fn update(
        &mut self,
        entering: usize,
        leaving: usize,
        column: &WorkVector,
        basic_index: &[usize],
        pivot: f64,
        pivot_row: impl Iterator<Item = (usize, f64)>,
    ) -> bool {
        let reference_weight = column.iter()
            .filter(|&(i, _)| self.reference[basic_index[i]])
            .map(|(_, alpha)| alpha * alpha)
            .sum::<f64>()
            + if self.reference[entering] { 1_f64 } else { 0_f64 };

        if self.register_weight_check(self.weight[entering], reference_weight.max(1_f64)) {
            return true;
        }

        let pivot_weight = reference_weight.max(self.weight[entering]) / (pivot * pivot);
        for (j, alpha) in pivot_row {
            let weight = pivot_weight * alpha * alpha;
            if self.weight[j] < weight {
                self.weight[j] = weight;
            }
        }
        self.weight[leaving] = pivot_weight.max(1_f64);
        self.weight[entering] = 1_f64;

        self.nr_iterations += 1;
        false
    }
}

/// Choose the column that enters the basis.
///
/// # Arguments
///
/// * `rule`: How candidates are compared.
/// * `dual`: Reduced cost of every column, zero for basic columns.
/// * `nonbasic_flag`: Which columns are nonbasic.
/// * `nonbasic_state`: Where the nonbasic columns are.
/// * `weights`: Devex weights, used only with the Devex rule.
/// * `tolerance`: Smallest reduced cost magnitude that is considered improving.
///
/// # Return value
///
/// The best candidate, ties broken by lowest index, or `None` if no column is improving.
pub fn choose_column(
    rule: PricingRule,
    dual: &[f64],
    nonbasic_flag: &[bool],
    nonbasic_state: &[NonbasicState],
    weights: &DevexWeights,
    tolerance: f64,
) -> Option<usize> {
    let mut best = None;
    let mut best_measure = 0_f64;

    for j in (0..dual.len()).filter(|&j| nonbasic_flag[j]) {
        let infeasibility = match nonbasic_state[j] {
            NonbasicState::Free => dual[j].abs(),
            NonbasicState::Fixed => continue,
            state => -state.direction() * dual[j],
        };
        if infeasibility <= tolerance {
            continue;
        }

        let measure = match rule {
            PricingRule::Dantzig => infeasibility * infeasibility,
            PricingRule::Devex => infeasibility * infeasibility / weights.weight(j),
        };
        if measure > best_measure {
            best_measure = measure;
            best = Some(j);
        }
    }

    best
}

#[cfg(test)]
mod test {
    use crate::algorithm::primal::pricing::{choose_column, DevexWeights};
    use crate::algorithm::primal::state::NonbasicState;
    use crate::data::linear_algebra::vector::WorkVector;
    use crate::settings::PricingRule;

    #[test]
    fn choose() {
        let dual = [-1_f64, 2_f64, -3_f64, 3_f64, 0_f64];
        let nonbasic_flag = [true, true, true, true, false];
        let states = [
            NonbasicState::AtLower,
            NonbasicState::AtLower,
            NonbasicState::Fixed,
            NonbasicState::Free,
            NonbasicState::AtLower,
        ];
        let weights = DevexWeights::new(&nonbasic_flag, 3);

        assert_eq!(choose_column(PricingRule::Dantzig, &dual, &nonbasic_flag, &states, &weights, 1e-7), Some(3));
        assert_eq!(choose_column(PricingRule::Devex, &dual, &nonbasic_flag, &states, &weights, 1e-7), Some(3));
        assert_eq!(choose_column(PricingRule::Dantzig, &dual, &nonbasic_flag, &states, &weights, 5_f64), None);

        let tied = [-2_f64, -2_f64];
        let states = [NonbasicState::AtLower; 2];
        assert_eq!(choose_column(PricingRule::Dantzig, &tied, &[true; 2], &states, &weights, 1e-7), Some(0));
    }

    #[test]
    fn weights_change_choice() {
        let dual = [-2_f64, -1.5];
        let nonbasic_flag = [true, true, false];
        let states = [NonbasicState::AtLower; 2];
        let mut weights = DevexWeights::new(&nonbasic_flag, 3);

        // Pivot on column 1 in the position of column 2, with a large pivot row entry for column 0
        let column = WorkVector::from_sparse(1, vec![(0, 1_f64)]);
        assert!(!weights.update(1, 2, &column, &[2], 1_f64, vec![(0, 4_f64)].into_iter()));
        assert_eq!(weights.weight(0), 16_f64);
        assert_eq!(weights.weight(1), 1_f64);
        assert_eq!(weights.weight(2), 1_f64);

        assert_eq!(choose_column(PricingRule::Devex, &dual, &[true, true], &states, &weights, 1e-7), Some(1));
        assert_eq!(choose_column(PricingRule::Dantzig, &dual, &[true, true], &states, &weights, 1e-7), Some(0));
    }

    #[test]
    fn reset_after_bad_weights() {
        let nonbasic_flag = [true, true, false];
        let mut weights = DevexWeights::new(&nonbasic_flag, 2);
        let column = WorkVector::from_sparse(1, vec![(0, 1_f64)]);
        assert!(!weights.update(1, 2, &column, &[2], 0.5, vec![(0, 3_f64)].into_iter()));
        assert!(weights.weight(0) > 1_f64);

        assert!(!weights.register_weight_check(100_f64, 1_f64));
        assert!(!weights.register_weight_check(1_f64, 100_f64));
        assert_eq!(weights.nr_bad_weights(), 2);
        // A good weight breaks the sequence
        assert!(!weights.register_weight_check(1_f64, 2_f64));
        assert_eq!(weights.nr_bad_weights(), 0);

        assert!(!weights.register_weight_check(100_f64, 1_f64));
        assert!(!weights.register_weight_check(100_f64, 1_f64));
        // The third consecutive bad weight during an update asks for a reset
        weights.weight[1] = 1000_f64;
        assert!(weights.update(1, 0, &column, &[0], 1_f64, vec![(2, 1_f64)].into_iter()));
        assert_eq!(weights.nr_bad_weights(), 3);
        weights.reset(&[false, true, true]);
        assert_eq!(weights.nr_bad_weights(), 0);
        assert!(weights.weight.iter().all(|&weight| weight == 1_f64));
        assert_eq!(weights.reference, vec![false, true, true]);
    }
}
