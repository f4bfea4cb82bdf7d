//! # Building blocks to describe linear programs.
use std::fmt;
use std::ops::Not;

use enum_map::Enum;

/// Direction of optimization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Objective {
    /// Find the largest objective value.
    Maximize,
    /// Find the smallest objective value.
    #[default]
    Minimize,
}

impl Objective {
    /// Factor that turns a cost vector in this direction into one that is to be minimized.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Objective::Minimize => 1_f64,
            Objective::Maximize => -1_f64,
        }
    }
}

/// Direction of a bound.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Enum)]
pub enum BoundDirection {
    /// Value is at least the bound.
    Lower,
    /// Value is at most the bound.
    Upper,
}

impl Not for BoundDirection {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Lower => Self::Upper,
            Self::Upper => Self::Lower,
        }
    }
}

/// Status of a column or row (through its slack) with respect to a basis.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BasisStatus {
    /// Nonbasic at the lower bound (also used for fixed values).
    Lower,
    /// In the basis.
    Basic,
    /// Nonbasic at the upper bound.
    Upper,
    /// Nonbasic free value at zero.
    Zero,
}

/// Outcome of solving a linear program.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Status {
    /// An optimal basic solution was found.
    Optimal,
    /// No solution satisfies all bounds and constraints.
    Infeasible,
    /// The objective can be improved without limit.
    Unbounded,
    /// The time limit was reached before termination.
    TimeLimit,
    /// The iteration limit was reached before termination.
    IterationLimit,
    /// The interrupt flag was raised.
    Interrupted,
    /// Unrecoverable numerical failure or internal inconsistency.
    Error,
}

impl Status {
    /// Whether the status describes a property of the model, rather than of the solve attempt.
    #[must_use]
    pub fn is_model_status(self) -> bool {
        matches!(self, Status::Optimal | Status::Infeasible | Status::Unbounded)
    }

    /// Whether a limit or the interrupt flag stopped the solve.
    #[must_use]
    pub fn is_stopped(self) -> bool {
        matches!(self, Status::TimeLimit | Status::IterationLimit | Status::Interrupted)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Optimal => "Optimal",
            Status::Infeasible => "Infeasible",
            Status::Unbounded => "Unbounded",
            Status::TimeLimit => "Time limit reached",
            Status::IterationLimit => "Iteration limit reached",
            Status::Interrupted => "Interrupted",
            Status::Error => "Error",
        })
    }
}
