//! # Presolving rules
//!
//! These rules, one per submodule, can be applied to simplify a linear program.
mod fixed_column;
mod singleton_row;
mod empty_row;
mod empty_column;
