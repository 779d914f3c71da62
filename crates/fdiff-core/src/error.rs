//! Error types for finite-difference evaluation.
//!
//! Every error in this module is a configuration error: it is detected
//! before the user function is called and before any output is written.
//! Failures raised by the user function itself are not wrapped here; the
//! fallible entry points hand them back in the caller's own error type.

use thiserror::Error;

/// Errors that can occur while configuring a finite-difference evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FdError {
    /// Explicit step size is zero, negative or not finite.
    #[error("Invalid step size {step}: must be positive and finite")]
    InvalidStep {
        /// The rejected step
        step: f64,
    },

    /// A textual formula identifier did not name a known formula.
    #[error("Unknown formula: {name}")]
    UnknownFormula {
        /// The identifier that failed to parse
        name: String,
    },

    /// A custom formula is malformed.
    ///
    /// Raised for empty stencils, non-finite offsets or weights, duplicate
    /// offsets, weights that do not sum to zero, or a bad default step.
    #[error("Invalid formula: {reason}")]
    InvalidFormula {
        /// Description of the defect
        reason: String,
    },

    /// The operation cannot use a formula of this derivative order.
    #[error("{operation} requires a first-order formula, got order {order}")]
    UnsupportedOrder {
        /// Operation that rejected the formula
        operation: String,
        /// Derivative order of the rejected formula
        order: u32,
    },

    /// Output storage or origin value has the wrong shape.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },
}

impl FdError {
    /// Create an InvalidStep error.
    pub fn invalid_step(step: f64) -> Self {
        Self::InvalidStep { step }
    }

    /// Create an UnknownFormula error.
    pub fn unknown_formula<S: Into<String>>(name: S) -> Self {
        Self::UnknownFormula { name: name.into() }
    }

    /// Create an InvalidFormula error with a custom reason.
    pub fn invalid_formula<S: Into<String>>(reason: S) -> Self {
        Self::InvalidFormula {
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedOrder error.
    pub fn unsupported_order<S: Into<String>>(operation: S, order: u32) -> Self {
        Self::UnsupportedOrder {
            operation: operation.into(),
            order,
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Result type alias for finite-difference operations.
pub type Result<T> = std::result::Result<T, FdError>;
