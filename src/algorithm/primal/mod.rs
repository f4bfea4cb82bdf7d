//! # Primal simplex method
//!
//! A bounded primal simplex method on the model `[A -I] (x, r) = 0` with bounds on both the
//! structural columns `x` and the row activities `r`. Infeasible starting bases are handled by a
//! first phase that minimizes the sum of bound violations of the basic columns.
//!
//! Work happens in a loop of rebuilds, each followed by iterations until either the problem is
//! solved or a rebuild is needed. A rebuild refactorizes the basis matrix when basis changes were
//! made and recomputes the basic values and the duals from scratch; iterations update them.
use std::iter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use itertools::Either;
use log::{debug, trace, warn};

use crate::algorithm::primal::factor::{BasisFactor, PIVOT_THRESHOLD};
use crate::algorithm::primal::pricing::DevexWeights;
use crate::algorithm::primal::ratio_test::{RatioTest, RowChoice};
use crate::algorithm::primal::state::{NonbasicState, Phase, RebuildReason, SimplexBasis};
use crate::data::linear_algebra::matrix::RowMatrix;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_algebra::vector::WorkVector;
use crate::data::linear_program::elements::{BoundDirection, Status};
use crate::data::linear_program::model::Model;
use crate::data::linear_program::solution::{Basis, Solution};
use crate::settings::{PricingRule, Settings};

pub mod factor;
pub mod pricing;
pub mod ratio_test;
pub mod state;


/// Number of iterations between two checks of the clock and the interrupt flag.
const TIME_CHECK_INTERVAL: usize = 100;

/// Largest relative difference between the pivot computed from the column and from the row.
const NUMERICAL_TROUBLE_TOLERANCE: f64 = 1e-7;

/// Pivots smaller than this fraction of the largest value in the column are considered unstable.
const SMALL_PIVOT_FACTOR: f64 = 1e-9;

/// Bounds on the work a solve may do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of iterations, including bound flips.
    pub iteration_limit: usize,
    /// Moment after which the solve stops.
    pub deadline: Option<Instant>,
}

impl Limits {
    /// Limits from the settings, with the time limit counting from now.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            iteration_limit: settings.iteration_limit,
            deadline: deadline(Instant::now(), settings.time_limit),
        }
    }
}

/// Moment at which a time limit expires, if it is finite.
pub fn deadline(start: Instant, time_limit: f64) -> Option<Instant> {
    Duration::try_from_secs_f64(time_limit).ok()
        .and_then(|duration| start.checked_add(duration))
}

/// Result of a single solve attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct SimplexOutcome {
    /// How the solve ended.
    pub status: Status,
    /// Values at the end of the solve, optimal only if the status is `Optimal`.
    pub solution: Solution,
    /// Number of iterations performed, including bound flips.
    pub iteration_count: usize,
}

/// State of a single solve attempt of the primal simplex method.
///
/// Created for one model, consumed by `solve`.
pub struct PrimalSimplex<'a> {
    model: &'a Model,
    rows: RowMatrix,
    settings: &'a Settings,
    limits: Limits,
    interrupt: Option<&'a AtomicBool>,

    basis: SimplexBasis,
    factor: BasisFactor,
    is_factorized: bool,
    devex: DevexWeights,
    phase: Phase,
    rebuild_reason: Option<RebuildReason>,

    /// Cost of all columns, negated when maximizing.
    cost: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    /// Value of the nonbasic columns; values of basic columns are in `base_value`.
    value: Vec<f64>,
    /// Reduced costs with respect to the cost of the current phase.
    dual: Vec<f64>,

    base_value: Vec<f64>,
    base_lower: Vec<f64>,
    base_upper: Vec<f64>,

    /// Transformed entering column `B^-1 a_q`.
    col_aq: WorkVector,
    /// Row of the basis inverse `e_r^T B^-1`.
    row_ep: WorkVector,
    /// Pivot row over the structural columns, `row_ep^T A`.
    row_ap: WorkVector,

    iteration_count: usize,
    nr_changes_since_rebuild: usize,
    nr_flips_since_rebuild: usize,
    nr_infeasibilities: usize,
    sum_infeasibilities: f64,
}

impl<'a> PrimalSimplex<'a> {
    /// Create a new instance starting from the slack basis.
    ///
    /// # Arguments
    ///
    /// * `model`: Model to solve, borrowed for the duration of the solve.
    /// * `settings`: Tolerances, limits and the pricing rule.
    pub fn new(model: &'a Model, settings: &'a Settings) -> Self {
        let nr_columns = model.nr_columns();
        let nr_rows = model.nr_rows();
        let sign = model.objective().sign();

        let cost = model.cost().iter().map(|&c| sign * c)
            .chain(iter::repeat_n(0_f64, nr_rows))
            .collect::<Vec<_>>();
        let lower = model.column_lower().iter().chain(model.row_lower()).copied().collect::<Vec<_>>();
        let upper = model.column_upper().iter().chain(model.row_upper()).copied().collect::<Vec<_>>();
        let basis = SimplexBasis::slack(nr_columns, &lower, &upper);
        let devex = DevexWeights::new(&basis.nonbasic_flag, settings.allowed_bad_devex_weights);
        let nr_total = cost.len();

        let mut simplex = Self {
            model,
            rows: model.row_matrix(),
            settings,
            limits: Limits::from_settings(settings),
            interrupt: None,

            basis,
            factor: BasisFactor::new(nr_rows, settings.update_limit),
            is_factorized: false,
            devex,
            phase: Phase::Two,
            rebuild_reason: Some(RebuildReason::Fresh),

            cost,
            lower,
            upper,
            value: vec![0_f64; nr_total],
            dual: vec![0_f64; nr_total],

            base_value: vec![0_f64; nr_rows],
            base_lower: vec![0_f64; nr_rows],
            base_upper: vec![0_f64; nr_rows],

            col_aq: WorkVector::new(nr_rows),
            row_ep: WorkVector::new(nr_rows),
            row_ap: WorkVector::new(nr_columns),

            iteration_count: 0,
            nr_changes_since_rebuild: 0,
            nr_flips_since_rebuild: 0,
            nr_infeasibilities: 0,
            sum_infeasibilities: 0_f64,
        };
        simplex.initialize_nonbasic_values();

        simplex
    }

    /// Start from a given basis instead of the slack basis.
    ///
    /// A basis that doesn't fit the model is ignored. A singular basis is repaired during the first
    /// rebuild.
    pub fn with_basis(mut self, basis: &Basis) -> Self {
        match SimplexBasis::from_statuses(basis, &self.lower, &self.upper) {
            Some(simplex_basis) => {
                self.basis = simplex_basis;
                self.devex.reset(&self.basis.nonbasic_flag);
                self.initialize_nonbasic_values();
            },
            None => warn!(
                "Starting basis with {} basic columns doesn't fit a model with {} columns and {} rows, using the slack basis",
                basis.nr_basic(), self.nr_columns(), self.nr_rows(),
            ),
        }

        self
    }

    /// Override the limits taken from the settings.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Stop the solve when this flag is raised.
    pub fn with_interrupt(mut self, interrupt: &'a AtomicBool) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Solve the model.
    ///
    /// # Return value
    ///
    /// The status and the values at the end of the solve. If the status is not `Optimal`, the
    /// values are those of the last basis.
    pub fn solve(mut self) -> SimplexOutcome {
        let tolerance = self.settings.primal_feasibility_tolerance;
        if let Some(j) = (0..self.nr_total()).find(|&j| self.lower[j] > self.upper[j] + tolerance) {
            debug!(
                "Column {} of {} has inconsistent bounds [{}, {}]",
                j, self.nr_total(), self.lower[j], self.upper[j],
            );
            return self.outcome(Status::Infeasible);
        }

        let status = loop {
            if let Err(status) = self.rebuild() {
                break status;
            }
            if let Some(status) = self.iterate() {
                break status;
            }
        };

        debug!("Primal simplex finished after {} iterations: {}", self.iteration_count, status);
        self.outcome(status)
    }

    /// Recompute the factorization if needed, the basic values, the phase and the duals.
    ///
    /// # Return value
    ///
    /// A status if the solve should stop: the basis couldn't be repaired, or a limit was reached.
    fn rebuild(&mut self) -> Result<(), Status> {
        let reason = self.rebuild_reason.take().unwrap_or(RebuildReason::UpdateLimitReached);

        if !self.is_factorized || self.factor.nr_updates() > 0 {
            self.invert()?;
        }

        self.compute_primal();
        self.compute_infeasibilities();
        self.phase = if self.nr_infeasibilities > 0 { Phase::One } else { Phase::Two };
        self.compute_dual();

        if self.settings.pricing_rule == PricingRule::Devex && self.devex.should_reset(self.nr_rows()) {
            self.devex.reset(&self.basis.nonbasic_flag);
        }
        self.nr_changes_since_rebuild = 0;
        self.nr_flips_since_rebuild = 0;

        debug!(
            "Rebuild ({:?}) at iteration {}: phase {:?}, objective {:.9e}, {} primal infeasibilities (sum {:.3e})",
            reason, self.iteration_count, self.phase, self.objective_value(),
            self.nr_infeasibilities, self.sum_infeasibilities,
        );

        self.check_time()
    }

    /// Iterate until a rebuild is needed or the solve ends.
    ///
    /// # Return value
    ///
    /// A status if the solve ended, `None` if a rebuild is needed.
    fn iterate(&mut self) -> Option<Status> {
        loop {
            if let Err(status) = self.check_limits() {
                return Some(status);
            }

            let Some(entering) = pricing::choose_column(
                self.settings.pricing_rule,
                &self.dual,
                &self.basis.nonbasic_flag,
                &self.basis.nonbasic_state,
                &self.devex,
                self.settings.dual_feasibility_tolerance,
            ) else {
                return self.conclude_without_candidate();
            };

            self.compute_column(entering);
            let direction = if self.dual[entering] < 0_f64 { 1_f64 } else { -1_f64 };
            let choice = RatioTest {
                column: &self.col_aq,
                direction,
                value: &self.base_value,
                lower: &self.base_lower,
                upper: &self.base_upper,
                phase: self.phase,
                reduced_cost: self.dual[entering],
                tolerance: self.settings.primal_feasibility_tolerance,
                entering_range: self.upper[entering] - self.lower[entering],
            }.choose();

            match choice {
                RowChoice::Unbounded => return self.conclude_unbounded(entering),
                RowChoice::Flip { step } => {
                    self.flip(entering, direction, step);
                    if self.nr_flips_since_rebuild >= self.settings.flip_limit {
                        self.rebuild_reason = Some(RebuildReason::FlipLimitReached);
                        return None;
                    }
                },
                RowChoice::Pivot { position, step, bound } => {
                    self.compute_pivot_row(position);
                    if self.has_numerical_trouble(entering, position) {
                        if self.factor.nr_updates() > 0 {
                            warn!(
                                "Numerical trouble at iteration {} (column {} in position {}), refactorizing",
                                self.iteration_count, entering, position,
                            );
                            self.rebuild_reason = Some(RebuildReason::NumericalTrouble);
                            return None;
                        } else if self.col_aq.get(position).abs() < PIVOT_THRESHOLD {
                            warn!("Pivot {:e} too small with a fresh factorization", self.col_aq.get(position));
                            return Some(Status::Error);
                        }
                    }

                    self.pivot(entering, position, direction, step, bound);
                    if self.factor.should_reinvert() {
                        self.rebuild_reason = Some(RebuildReason::UpdateLimitReached);
                        return None;
                    }
                },
            }

            if self.phase == Phase::One {
                self.compute_infeasibilities();
                if self.nr_infeasibilities == 0 {
                    debug!("Primal feasible at iteration {}, switching to phase two", self.iteration_count);
                    self.phase = Phase::Two;
                }
                self.compute_dual();
            }
        }
    }

    /// No column improves the objective of the current phase.
    fn conclude_without_candidate(&mut self) -> Option<Status> {
        if self.nr_changes_since_rebuild > 0 {
            self.rebuild_reason = Some(match self.phase {
                Phase::One => RebuildReason::PossiblyInfeasible,
                Phase::Two => RebuildReason::PossiblyOptimal,
            });
            return None;
        }

        match self.phase {
            Phase::Two => Some(Status::Optimal),
            Phase::One => {
                warn!(
                    "No improving column in phase one with {} primal infeasibilities (sum {:e})",
                    self.nr_infeasibilities, self.sum_infeasibilities,
                );
                Some(Status::Error)
            },
        }
    }

    /// No row blocks the entering column.
    fn conclude_unbounded(&mut self, entering: usize) -> Option<Status> {
        if self.nr_changes_since_rebuild > 0 {
            self.rebuild_reason = Some(RebuildReason::PossiblyUnbounded);
            return None;
        }

        match self.phase {
            Phase::Two => {
                debug!("Column {} is an unbounded direction", entering);
                Some(Status::Unbounded)
            },
            Phase::One => {
                warn!("No blocking row for column {} in phase one", entering);
                Some(Status::Error)
            },
        }
    }

    /// Factorize the basis matrix, replacing basic columns by slacks once if it is singular.
    fn invert(&mut self) -> Result<(), Status> {
        let columns = self.basic_columns();
        let singular = match self.factor.invert(&columns) {
            Ok(()) => {
                self.is_factorized = true;
                return Ok(());
            },
            Err(singular) => singular,
        };

        warn!("{}, replacing basic columns by slacks", singular);
        for (&position, &row) in singular.positions.iter().zip(&singular.rows) {
            let slack = self.nr_columns() + row;
            if !self.basis.nonbasic_flag[slack] {
                warn!("Slack of row {} without pivot is basic", row);
                self.is_factorized = false;
                return Err(Status::Error);
            }

            let leaving = self.basis.basic_index[position];
            let state = NonbasicState::from_bounds(self.lower[leaving], self.upper[leaving]);
            self.basis.replace(position, slack, state);
            self.value[leaving] = state.value(self.lower[leaving], self.upper[leaving]);
        }
        self.devex.reset(&self.basis.nonbasic_flag);

        let columns = self.basic_columns();
        match self.factor.invert(&columns) {
            Ok(()) => {
                self.is_factorized = true;
                Ok(())
            },
            Err(singular) => {
                warn!("Repaired basis is still singular: {}", singular);
                self.is_factorized = false;
                Err(Status::Error)
            },
        }
    }

    /// Basic values from the nonbasic values: `B^-1 (-N x_N)`.
    fn compute_primal(&mut self) {
        let mut rhs = WorkVector::new(self.nr_rows());
        for j in (0..self.nr_total()).filter(|&j| self.basis.nonbasic_flag[j]) {
            let value = self.value[j];
            if value != 0_f64 {
                for (i, a) in self.column(j) {
                    rhs.add(i, -a * value);
                }
            }
        }
        self.factor.ftran(&mut rhs);

        for (position, &j) in self.basis.basic_index.iter().enumerate() {
            self.base_value[position] = rhs.get(position);
            self.base_lower[position] = self.lower[j];
            self.base_upper[position] = self.upper[j];
        }
    }

    /// Count and sum the bound violations of the basic columns.
    fn compute_infeasibilities(&mut self) {
        let tolerance = self.settings.primal_feasibility_tolerance;

        self.nr_infeasibilities = 0;
        self.sum_infeasibilities = 0_f64;
        for position in 0..self.nr_rows() {
            let value = self.base_value[position];
            let violation = (self.base_lower[position] - value).max(value - self.base_upper[position]);
            if violation > tolerance {
                self.nr_infeasibilities += 1;
                self.sum_infeasibilities += violation;
            }
        }
    }

    /// Reduced costs with respect to the cost of the current phase.
    ///
    /// In phase one, a basic column below its lower bound costs `-1`, one above its upper bound
    /// `+1`, and all other columns are free of cost.
    fn compute_dual(&mut self) {
        let tolerance = self.settings.primal_feasibility_tolerance;

        let mut basic_cost = WorkVector::new(self.nr_rows());
        for (position, &j) in self.basis.basic_index.iter().enumerate() {
            let cost = match self.phase {
                Phase::Two => self.cost[j],
                Phase::One => {
                    let value = self.base_value[position];
                    if value < self.base_lower[position] - tolerance {
                        -1_f64
                    } else if value > self.base_upper[position] + tolerance {
                        1_f64
                    } else {
                        0_f64
                    }
                },
            };
            basic_cost.set(position, cost);
        }
        self.factor.btran(&mut basic_cost);
        let row_dual = basic_cost.as_slice();

        for j in 0..self.nr_total() {
            self.dual[j] = if self.basis.nonbasic_flag[j] {
                let cost = match self.phase {
                    Phase::Two => self.cost[j],
                    Phase::One => 0_f64,
                };
                cost - self.column(j).map(|(i, a)| a * row_dual[i]).sum::<f64>()
            } else {
                0_f64
            };
        }
    }

    /// FTRAN of the entering column into `col_aq`.
    fn compute_column(&mut self, entering: usize) {
        let mut column = std::mem::replace(&mut self.col_aq, WorkVector::new(0));
        column.clear();
        for (i, a) in self.column(entering) {
            column.add(i, a);
        }
        self.factor.ftran(&mut column);
        self.col_aq = column;
    }

    /// BTRAN of the unit vector of the pivot position into `row_ep`, and PRICE into `row_ap`.
    fn compute_pivot_row(&mut self, position: usize) {
        self.row_ep.clear();
        self.row_ep.set(position, 1_f64);
        self.factor.btran(&mut self.row_ep);

        self.row_ap.clear();
        for (i, multiplier) in self.row_ep.iter() {
            for (j, a) in self.rows.row(i) {
                self.row_ap.add(j, multiplier * a);
            }
        }
        self.row_ap.tidy();
    }

    /// Value of the pivot row for a column.
    fn alpha_row(&self, j: usize) -> f64 {
        if j < self.nr_columns() {
            self.row_ap.get(j)
        } else {
            -self.row_ep.get(j - self.nr_columns())
        }
    }

    /// Nonbasic columns with a nonzero value in the pivot row, except the entering column.
    fn pivot_row_entries(&self, entering: usize) -> Vec<SparseTuple<f64>> {
        let nr_columns = self.nr_columns();
        let structural = self.row_ap.iter();
        let slack = self.row_ep.iter().map(|(i, value)| (nr_columns + i, -value));

        structural.chain(slack)
            .filter(|&(j, _)| j != entering && self.basis.nonbasic_flag[j])
            .collect()
    }

    /// Whether the pivot is unreliable.
    ///
    /// The pivot can be computed both from the transformed column and from the pivot row. When they
    /// disagree, or when the pivot is small compared to the rest of the column, the factorization
    /// has lost accuracy.
    fn has_numerical_trouble(&self, entering: usize, position: usize) -> bool {
        let alpha_column = self.col_aq.get(position);
        let alpha_row = self.alpha_row(entering);

        let smallest = alpha_column.abs().min(alpha_row.abs());
        let mismatch = (alpha_column - alpha_row).abs() > NUMERICAL_TROUBLE_TOLERANCE * smallest;
        let small = alpha_column.abs() < SMALL_PIVOT_FACTOR * self.col_aq.max_abs();

        mismatch || small
    }

    /// Move the entering column to its other bound.
    fn flip(&mut self, entering: usize, direction: f64, step: f64) {
        let change = direction * step;
        for (position, alpha) in self.col_aq.iter() {
            self.base_value[position] -= alpha * change;
        }

        let state = match self.basis.nonbasic_state[entering] {
            NonbasicState::AtLower => NonbasicState::AtUpper,
            NonbasicState::AtUpper => NonbasicState::AtLower,
            other => other,
        };
        self.basis.nonbasic_state[entering] = state;
        self.value[entering] = state.value(self.lower[entering], self.upper[entering]);

        trace!("Iteration {}: column {} flips to {:?}", self.iteration_count, entering, state);
        self.iteration_count += 1;
        self.nr_flips_since_rebuild += 1;
        self.nr_changes_since_rebuild += 1;
    }

    /// Apply a basis change.
    ///
    /// # Arguments
    ///
    /// * `entering`: Column entering the basis.
    /// * `position`: Basis position of the leaving column.
    /// * `direction`: Whether the entering column increases or decreases.
    /// * `step`: Distance the entering column moves.
    /// * `bound`: Bound at which the leaving column ends up.
    fn pivot(&mut self, entering: usize, position: usize, direction: f64, step: f64, bound: BoundDirection) {
        let pivot = self.col_aq.get(position);
        let change = direction * step;
        let leaving = self.basis.basic_index[position];

        for (i, alpha) in self.col_aq.iter() {
            self.base_value[i] -= alpha * change;
        }
        let entering_value = self.value[entering] + change;

        let pivot_row = self.pivot_row_entries(entering);
        if self.phase == Phase::Two {
            let dual_step = self.dual[entering] / pivot;
            for &(j, alpha) in &pivot_row {
                self.dual[j] -= dual_step * alpha;
            }
            self.dual[leaving] = -dual_step;
            self.dual[entering] = 0_f64;
        }

        let needs_devex_reset = self.settings.pricing_rule == PricingRule::Devex
            && self.devex.update(
                entering,
                leaving,
                &self.col_aq,
                &self.basis.basic_index,
                pivot,
                pivot_row.into_iter(),
            );

        let (leaving_lower, leaving_upper) = (self.lower[leaving], self.upper[leaving]);
        let leaving_state = if leaving_lower == leaving_upper {
            NonbasicState::Fixed
        } else {
            match bound {
                BoundDirection::Lower => NonbasicState::AtLower,
                BoundDirection::Upper => NonbasicState::AtUpper,
            }
        };
        self.basis.replace(position, entering, leaving_state);
        self.value[leaving] = leaving_state.value(leaving_lower, leaving_upper);
        self.value[entering] = entering_value;
        self.base_value[position] = entering_value;
        self.base_lower[position] = self.lower[entering];
        self.base_upper[position] = self.upper[entering];

        self.factor.update(position, &self.col_aq);
        if needs_devex_reset {
            debug!("Too many bad Devex weights at iteration {}, resetting", self.iteration_count);
            self.devex.reset(&self.basis.nonbasic_flag);
        }

        trace!(
            "Iteration {}: column {} enters, column {} leaves at {:?}, step {:e}, pivot {:e}",
            self.iteration_count, entering, leaving, bound, step, pivot,
        );
        self.iteration_count += 1;
        self.nr_changes_since_rebuild += 1;
    }

    /// Check the iteration limit, and regularly the time limit and the interrupt flag.
    fn check_limits(&self) -> Result<(), Status> {
        if self.iteration_count >= self.limits.iteration_limit {
            return Err(Status::IterationLimit);
        }
        if self.iteration_count % TIME_CHECK_INTERVAL == 0 {
            self.check_time()?;
        }

        Ok(())
    }

    fn check_time(&self) -> Result<(), Status> {
        if self.interrupt.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(Status::Interrupted);
        }
        if self.limits.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(Status::TimeLimit);
        }

        Ok(())
    }

    /// Collect the values of the solve in the original direction of optimization.
    fn outcome(mut self, status: Status) -> SimplexOutcome {
        for (position, &j) in self.basis.basic_index.iter().enumerate() {
            self.value[j] = self.base_value[position];
        }
        if self.is_factorized {
            self.phase = Phase::Two;
            self.compute_dual();
        }

        let nr_columns = self.nr_columns();
        let sign = self.model.objective().sign();
        let column_value = self.value[..nr_columns].to_vec();
        let solution = Solution {
            row_value: self.model.row_activity(&column_value),
            column_dual: self.dual[..nr_columns].iter().map(|d| sign * d).collect(),
            row_dual: self.dual[nr_columns..].iter().map(|d| sign * d).collect(),
            basis: self.basis.to_statuses(nr_columns),
            objective_value: self.model.objective_value(&column_value),
            column_value,
        };

        SimplexOutcome { status, solution, iteration_count: self.iteration_count }
    }

    fn initialize_nonbasic_values(&mut self) {
        for j in 0..self.nr_total() {
            self.value[j] = if self.basis.nonbasic_flag[j] {
                self.basis.nonbasic_state[j].value(self.lower[j], self.upper[j])
            } else {
                0_f64
            };
        }
    }

    /// Objective value of the current values, in the original direction of optimization.
    fn objective_value(&self) -> f64 {
        let nonbasic = (0..self.nr_total())
            .filter(|&j| self.basis.nonbasic_flag[j])
            .map(|j| self.cost[j] * self.value[j])
            .sum::<f64>();
        let basic = self.basis.basic_index.iter().zip(&self.base_value)
            .map(|(&j, value)| self.cost[j] * value)
            .sum::<f64>();

        self.model.offset() + self.model.objective().sign() * (nonbasic + basic)
    }

    /// Nonzeros of a column of `[A -I]`.
    fn column(&self, j: usize) -> impl Iterator<Item = SparseTuple<f64>> + 'a {
        let model = self.model;
        let nr_columns = self.nr_columns();
        if j < nr_columns {
            Either::Left(model.matrix().column(j))
        } else {
            Either::Right(iter::once((j - nr_columns, -1_f64)))
        }
    }

    fn basic_columns(&self) -> Vec<Vec<SparseTuple<f64>>> {
        self.basis.basic_index.iter().map(|&j| self.column(j).collect()).collect()
    }

    fn nr_columns(&self) -> usize {
        self.model.nr_columns()
    }
    fn nr_rows(&self) -> usize {
        self.model.nr_rows()
    }
    fn nr_total(&self) -> usize {
        self.cost.len()
    }
}
