//! # Solving a model end to end
//!
//! Presolve the model, solve what remains with the primal simplex method, map the solution back
//! and finish with a clean-up solve of the original model that starts from the recovered basis.
//!
//! The iteration limit and the time limit apply to the run as a whole: the clean-up solve gets
//! whatever the first solve left over.
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use log::{info, warn};

use crate::algorithm::primal::{self, Limits, PrimalSimplex, SimplexOutcome};
use crate::data::linear_program::elements::Status;
use crate::data::linear_program::model::Model;
use crate::data::linear_program::model::postsolve::{postsolve, PostsolveStatus};
use crate::data::linear_program::model::presolve::{presolve, PresolveInfo, PresolveStatus};
use crate::data::linear_program::solution::{Basis, Solution};
use crate::settings::{PresolveMode, Settings, SettingsError};

/// Number of simplex iterations per stage of a run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct IterationCounts {
    /// Iterations on the reduced model, or on the original model if it was not reduced.
    pub solve: usize,
    /// Iterations of the clean-up solve on the original model.
    pub clean_up: usize,
}

impl IterationCounts {
    /// Iterations of both stages together.
    pub fn total(&self) -> usize {
        self.solve + self.clean_up
    }
}

/// Result of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveResult {
    /// Status of the last solve, or of presolve if that already decided the outcome.
    pub status: Status,
    /// Values in the dimensions of the original model.
    ///
    /// Optimal if the status is `Optimal`. If a limit was hit or the run was interrupted, these
    /// are the values of the last basis, mapped back if presolve reduced the model. Not meaningful
    /// for the other statuses.
    pub solution: Solution,
    /// Objective function value, including the offset.
    pub objective_value: f64,
    /// Iterations per stage.
    pub iteration_counts: IterationCounts,
    /// `None` if presolve was switched off.
    pub presolve_status: Option<PresolveStatus>,
    /// `None` if no solution was mapped back.
    pub postsolve_status: Option<PostsolveStatus>,
}

/// Solves models with fixed settings.
#[derive(Debug)]
pub struct Solver {
    settings: Settings,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Solver {
    /// Create a new instance.
    ///
    /// # Return value
    ///
    /// The solver, or an error if one of the settings has an invalid value.
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;

        Ok(Self { settings, interrupt: None })
    }

    /// Stop the run when this flag is raised.
    pub fn with_interrupt(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Settings this solver was created with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Solve a model.
    pub fn run(&self, model: &Model) -> SolveResult {
        let start = Instant::now();
        info!(
            "Solving a model with {} columns, {} rows and {} nonzeros",
            model.nr_columns(), model.nr_rows(), model.matrix().nr_nonzeros(),
        );

        let result = match self.settings.presolve {
            PresolveMode::Off => {
                let outcome = self.solve(model, None, start, 0);
                SolveResult::from_outcome(outcome, None)
            },
            PresolveMode::On => self.run_with_presolve(model, start),
        };

        info!(
            "Finished with status {} after {} iterations and {:.3} seconds, objective {:.9e}",
            result.status, result.iteration_counts.total(), start.elapsed().as_secs_f64(),
            result.objective_value,
        );
        result
    }

    fn run_with_presolve(&self, model: &Model, start: Instant) -> SolveResult {
        let info = presolve(Some(model), self.settings.primal_feasibility_tolerance);
        let (reduced_columns, reduced_rows) = info.reduced_dimensions();
        info!(
            "Presolve: {:?}, {} reductions, {} columns and {} rows remain",
            info.status, info.reductions().len(), reduced_columns, reduced_rows,
        );

        let status = Some(info.status.clone());
        match &info.status {
            PresolveStatus::NotReduced => {
                let outcome = self.solve(model, None, start, 0);
                SolveResult::from_outcome(outcome, status)
            },
            PresolveStatus::Reduced | PresolveStatus::ReducedToEmpty => match info.reduced_model() {
                Some(reduced) => self.solve_reduced(model, reduced, &info, start),
                None => {
                    warn!("Presolve reported a reduction without a reduced model");
                    SolveResult::without_solution(Status::Error, model, status)
                },
            },
            PresolveStatus::Infeasible => SolveResult::without_solution(Status::Infeasible, model, status),
            PresolveStatus::Unbounded => SolveResult::without_solution(Status::Unbounded, model, status),
            PresolveStatus::Error(error) => {
                warn!("Presolve failed: {}", error);
                SolveResult::without_solution(Status::Error, model, status)
            },
        }
    }

    /// Solve the reduced model, map the solution back and clean up.
    fn solve_reduced(&self, model: &Model, reduced: &Model, info: &PresolveInfo, start: Instant) -> SolveResult {
        let presolve_status = Some(info.status.clone());

        let outcome = if info.status == PresolveStatus::ReducedToEmpty {
            let mut solution = Solution::zeros(0, 0);
            solution.objective_value = reduced.offset();
            SimplexOutcome { status: Status::Optimal, solution, iteration_count: 0 }
        } else {
            self.solve(reduced, None, start, 0)
        };
        let iterations = outcome.iteration_count;

        if outcome.status.is_stopped() {
            info!("Stopped while solving the reduced model: {}", outcome.status);
            return SolveResult::from_stopped(outcome, model, info);
        }
        if outcome.status != Status::Optimal {
            if outcome.status.is_model_status() {
                info!("Reduced model is {}, reporting this for the original model", outcome.status);
            }
            let mut result = SolveResult::without_solution(outcome.status, model, presolve_status);
            result.iteration_counts.solve = iterations;
            return result;
        }

        let (postsolve_status, recovered) = match postsolve(&outcome.solution, info) {
            Ok(recovered) => recovered,
            Err(error) => {
                warn!("{}, solving the original model instead", error);
                let outcome = self.solve(model, None, start, iterations);
                let mut result = SolveResult::from_outcome(outcome, presolve_status);
                result.iteration_counts = IterationCounts { solve: iterations, clean_up: result.iteration_counts.solve };
                return result;
            },
        };

        if !self.settings.clean_up {
            return SolveResult {
                status: Status::Optimal,
                objective_value: recovered.objective_value,
                solution: recovered,
                iteration_counts: IterationCounts { solve: iterations, clean_up: 0 },
                presolve_status,
                postsolve_status: Some(postsolve_status),
            };
        }

        let clean_up = self.solve(model, Some(&recovered.basis), start, iterations);
        info!("Clean-up solve: {} after {} iterations", clean_up.status, clean_up.iteration_count);

        SolveResult {
            status: clean_up.status,
            objective_value: clean_up.solution.objective_value,
            iteration_counts: IterationCounts { solve: iterations, clean_up: clean_up.iteration_count },
            solution: clean_up.solution,
            presolve_status,
            postsolve_status: Some(postsolve_status),
        }
    }

    /// Run the primal simplex method on a model.
    ///
    /// # Arguments
    ///
    /// * `model`: Model to solve.
    /// * `basis`: Starting basis, the slack basis if `None`.
    /// * `start`: Start of the run, from which the time limit counts.
    /// * `iterations_used`: Iterations already spent in this run.
    fn solve(&self, model: &Model, basis: Option<&Basis>, start: Instant, iterations_used: usize) -> SimplexOutcome {
        let limits = Limits {
            iteration_limit: self.settings.iteration_limit.saturating_sub(iterations_used),
            deadline: primal::deadline(start, self.settings.time_limit),
        };

        let mut simplex = PrimalSimplex::new(model, &self.settings).with_limits(limits);
        if let Some(basis) = basis {
            simplex = simplex.with_basis(basis);
        }
        if let Some(interrupt) = &self.interrupt {
            simplex = simplex.with_interrupt(interrupt);
        }

        simplex.solve()
    }
}

impl SolveResult {
    fn from_outcome(outcome: SimplexOutcome, presolve_status: Option<PresolveStatus>) -> Self {
        Self {
            status: outcome.status,
            objective_value: outcome.solution.objective_value,
            solution: outcome.solution,
            iteration_counts: IterationCounts { solve: outcome.iteration_count, clean_up: 0 },
            presolve_status,
            postsolve_status: None,
        }
    }

    /// Map the values of a stopped solve of the reduced model back, without a clean-up solve.
    ///
    /// # Return value
    ///
    /// The stopped status with the last values in the dimensions of the original model, or zeros if
    /// they couldn't be mapped back.
    fn from_stopped(outcome: SimplexOutcome, model: &Model, info: &PresolveInfo) -> Self {
        let presolve_status = Some(info.status.clone());
        let iteration_counts = IterationCounts { solve: outcome.iteration_count, clean_up: 0 };

        match postsolve(&outcome.solution, info) {
            Ok((postsolve_status, recovered)) => Self {
                status: outcome.status,
                objective_value: recovered.objective_value,
                solution: recovered,
                iteration_counts,
                presolve_status,
                postsolve_status: Some(postsolve_status),
            },
            Err(error) => {
                warn!("{}, the values of the stopped solve are lost", error);
                let mut result = SolveResult::without_solution(outcome.status, model, presolve_status);
                result.iteration_counts = iteration_counts;
                result
            },
        }
    }

    /// A result with all values zero, for when no solve on the original model took place.
    fn without_solution(status: Status, model: &Model, presolve_status: Option<PresolveStatus>) -> Self {
        let solution = Solution::zeros(model.nr_columns(), model.nr_rows());

        Self {
            status,
            objective_value: f64::NAN,
            solution,
            iteration_counts: IterationCounts::default(),
            presolve_status,
            postsolve_status: None,
        }
    }
}
