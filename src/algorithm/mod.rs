//! # Algorithms
//!
//! The primal simplex method, and the pipeline that runs it between presolve and postsolve.
pub mod pipeline;
pub mod primal;
