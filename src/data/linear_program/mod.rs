//! # Representing linear programs
//!
//! The model that is solved, the building blocks it is described with, and the solutions that are
//! produced for it. Presolve and postsolve live with the model, as they transform one model into
//! another and map solutions between the two.
pub mod elements;
pub mod model;
pub mod solution;
