//! Evaluation settings for derivatives, gradients and Jacobians.
//!
//! Every field has a usable default, so `Settings::default()` computes a
//! central-difference first derivative with the formula's default step,
//! sequentially, evaluating the origin when the stencil needs it.
//!
//! Unset values are modelled with `Option`:
//!
//! - `formula: None` selects [`FormulaKind::Central`].
//! - `step: None` selects the formula's default step. An explicit step of
//!   zero is rejected like any other non-positive step, so there is no
//!   ambiguity between "unset" and "explicit zero".
//! - `origin_value: Some(v)` declares that `f(x) == v` is already known and
//!   is reused for the stencil point at offset zero.

use crate::error::{FdError, Result};
use crate::formula::{lookup, Formula, FormulaKind};
use crate::step::resolve_step;
use crate::types::{DVector, Scalar};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings for scalar derivatives and gradients.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings<T> {
    /// Formula to use; `None` means central differences
    pub formula: Option<Formula>,
    /// Explicit step; `None` means the formula's default
    pub step: Option<T>,
    /// Evaluate stencil points (or gradient components) in parallel
    pub concurrent: bool,
    /// Known function value at the evaluation point
    pub origin_value: Option<T>,
}

impl<T: Scalar> Settings<T> {
    /// Creates default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the formula.
    pub fn with_formula(mut self, formula: impl Into<Formula>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// Set an explicit step.
    pub fn with_step(mut self, step: T) -> Self {
        self.step = Some(step);
        self
    }

    /// Enable or disable concurrent evaluation.
    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// Supply the known function value at the evaluation point.
    pub fn with_origin_value(mut self, value: T) -> Self {
        self.origin_value = Some(value);
        self
    }

    /// The formula in effect.
    pub fn formula(&self) -> &Formula {
        effective_formula(&self.formula)
    }

    /// Checks the settings without evaluating anything.
    pub fn validate(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }

    /// Validates the settings and returns the formula and step in effect.
    pub(crate) fn resolve(&self) -> Result<(&Formula, T)> {
        let formula = self.formula();
        formula.validate()?;
        let step = resolve_step(formula, self.step)?;
        Ok((formula, step))
    }
}

/// Settings for Jacobians.
///
/// The same formula and step apply to every entry of the matrix.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JacobianSettings<T: Scalar> {
    /// Formula to use; must be first order. `None` means central differences
    pub formula: Option<Formula>,
    /// Explicit step; `None` means the formula's default
    pub step: Option<T>,
    /// Compute columns in parallel
    pub concurrent: bool,
    /// Known value of `f(x)`, shared by every column
    pub origin_value: Option<DVector<T>>,
}

impl<T: Scalar> JacobianSettings<T> {
    /// Creates default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the formula.
    pub fn with_formula(mut self, formula: impl Into<Formula>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// Set an explicit step.
    pub fn with_step(mut self, step: T) -> Self {
        self.step = Some(step);
        self
    }

    /// Enable or disable concurrent column evaluation.
    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// Supply the known value of `f(x)`.
    pub fn with_origin_value(mut self, value: DVector<T>) -> Self {
        self.origin_value = Some(value);
        self
    }

    /// The formula in effect.
    pub fn formula(&self) -> &Formula {
        effective_formula(&self.formula)
    }

    /// Checks the settings for a function with `output_dim` outputs.
    pub fn validate(&self, output_dim: usize) -> Result<()> {
        self.resolve(output_dim).map(|_| ())
    }

    pub(crate) fn resolve(&self, output_dim: usize) -> Result<(&Formula, T)> {
        let formula = self.formula();
        formula.validate()?;
        formula.require_first_order("Jacobian")?;
        let step = resolve_step(formula, self.step)?;
        if let Some(origin) = &self.origin_value {
            if origin.len() != output_dim {
                return Err(FdError::dimension_mismatch(
                    format!("origin value of length {}", output_dim),
                    format!("length {}", origin.len()),
                ));
            }
        }
        Ok((formula, step))
    }
}

fn effective_formula(formula: &Option<Formula>) -> &Formula {
    match formula {
        Some(formula) => formula,
        None => lookup(FormulaKind::Central),
    }
}
