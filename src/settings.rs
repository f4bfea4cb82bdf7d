//! # Solver settings
//!
//! Settings are built with `SettingsBuilder`; unset fields take the values of
//! `Settings::default()`. Values are checked both when the builder builds and when a solver is
//! created, because the fields can be changed after building.
use std::str::FromStr;

use derive_builder::Builder;
use thiserror::Error;

/// Problems with the value of a setting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A value that is out of range for one of the fields.
    #[error("bad value for field {0}")]
    BadFieldValue(&'static str),
    /// An option string that doesn't name any of the variants.
    #[error("unknown value \"{value}\" for option {option}")]
    UnknownOption {
        /// Name of the option.
        option: &'static str,
        /// The string that was not recognized.
        value: String,
    },
}

/// Whether the model is reduced before it is solved.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum PresolveMode {
    /// Presolve, solve the reduced model and map the solution back.
    #[default]
    On,
    /// Solve the model as given.
    Off,
}

impl FromStr for PresolveMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(PresolveMode::On),
            "off" => Ok(PresolveMode::Off),
            _ => Err(SettingsError::UnknownOption { option: "presolve", value: s.to_string() }),
        }
    }
}

/// How the entering column is chosen among the candidates.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum PricingRule {
    /// Largest reduced cost.
    Dantzig,
    /// Largest reduced cost relative to an approximation of the steepest edge norm.
    #[default]
    Devex,
}

impl FromStr for PricingRule {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dantzig" | "dan" => Ok(PricingRule::Dantzig),
            "devex" | "dvx" => Ok(PricingRule::Devex),
            _ => Err(SettingsError::UnknownOption { option: "pricing_rule", value: s.to_string() }),
        }
    }
}

/// Settings of the solver.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct Settings {
    ///whether to presolve
    pub presolve: PresolveMode,

    ///largest bound violation that is accepted as feasible
    pub primal_feasibility_tolerance: f64,

    ///largest reduced cost of the wrong sign that is accepted as optimal
    pub dual_feasibility_tolerance: f64,

    ///maximum number of simplex iterations, summed over all solves of a run
    pub iteration_limit: usize,

    ///maximum run time (seconds)
    pub time_limit: f64,

    ///pricing rule of the primal simplex method
    pub pricing_rule: PricingRule,

    ///number of basis updates after which the basis matrix is factorized again
    pub update_limit: usize,

    ///number of bound flips after which the basic values are recomputed
    pub flip_limit: usize,

    ///number of consecutive inaccurate Devex weights after which all weights are reset
    pub allowed_bad_devex_weights: usize,

    ///whether to resolve the original model from the recovered basis after postsolve
    pub clean_up: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            presolve: PresolveMode::On,
            primal_feasibility_tolerance: 1e-7,
            dual_feasibility_tolerance: 1e-7,
            iteration_limit: usize::MAX,
            time_limit: f64::INFINITY,
            pricing_rule: PricingRule::Devex,
            update_limit: 100,
            flip_limit: 50,
            allowed_bad_devex_weights: 3,
            clean_up: true,
        }
    }
}

impl Settings {
    /// Check all values.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_tolerance(self.primal_feasibility_tolerance, "primal_feasibility_tolerance")?;
        validate_tolerance(self.dual_feasibility_tolerance, "dual_feasibility_tolerance")?;
        validate_time_limit(self.time_limit)?;
        validate_positive(self.update_limit, "update_limit")?;
        validate_positive(self.flip_limit, "flip_limit")?;

        Ok(())
    }
}

impl From<SettingsError> for SettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        SettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl SettingsBuilder {
    /// check that the values that have been set are valid
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(tolerance) = self.primal_feasibility_tolerance {
            validate_tolerance(tolerance, "primal_feasibility_tolerance")?;
        }
        if let Some(tolerance) = self.dual_feasibility_tolerance {
            validate_tolerance(tolerance, "dual_feasibility_tolerance")?;
        }
        if let Some(time_limit) = self.time_limit {
            validate_time_limit(time_limit)?;
        }
        if let Some(update_limit) = self.update_limit {
            validate_positive(update_limit, "update_limit")?;
        }
        if let Some(flip_limit) = self.flip_limit {
            validate_positive(flip_limit, "flip_limit")?;
        }

        Ok(())
    }
}

fn validate_tolerance(tolerance: f64, field: &'static str) -> Result<(), SettingsError> {
    if tolerance > 0_f64 && tolerance.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(field))
    }
}

fn validate_time_limit(time_limit: f64) -> Result<(), SettingsError> {
    // NaN fails this comparison as well
    if time_limit > 0_f64 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("time_limit"))
    }
}

fn validate_positive(value: usize, field: &'static str) -> Result<(), SettingsError> {
    if value > 0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(field))
    }
}
