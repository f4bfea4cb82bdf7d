//! # A linear program solver
//!
//! Linear programs with bounded columns and ranged rows are solved using a bounded primal simplex
//! method with Devex pricing and a Harris ratio test. Models are presolved first; the solution of
//! the reduced model is mapped back and polished by a final solve of the original model.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;
pub mod settings;

#[cfg(test)]
mod tests;

pub use crate::algorithm::pipeline::{IterationCounts, SolveResult, Solver};
pub use crate::data::linear_program::elements::{BasisStatus, Objective, Status};
pub use crate::data::linear_program::model::Model;
pub use crate::data::linear_program::solution::{Basis, Solution};
pub use crate::settings::{PresolveMode, PricingRule, Settings, SettingsBuilder};
