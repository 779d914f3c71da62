//! Finite-difference derivatives, gradients and Jacobians.
//!
//! This crate estimates derivatives of functions whose analytic derivatives
//! are unavailable or expensive to derive, such as objective functions fed
//! to gradient-based optimizers.
//!
//! # Key Concepts
//!
//! - **Formulas**: stencils of `(offset, weight)` pairs with a derivative
//!   order and a default step
//! - **Settings**: formula, step, origin-value reuse and concurrency for one
//!   call
//! - **Evaluators**: scalar derivatives, gradients and Jacobians built on the
//!   same stencil arithmetic
//!
//! # Modules
//!
//! - [`derivative`]: First and second derivatives of `f: T -> T`
//! - [`error`]: Configuration error type
//! - [`formula`]: Stencils and the built-in formula registry
//! - [`gradient`]: Gradients of `f: Rⁿ -> R`
//! - [`jacobian`]: Jacobians of `f: Rⁿ -> Rᵐ` and the output storage trait
//! - [`settings`]: Per-call configuration
//! - [`step`]: Step size resolution
//! - [`types`]: Scalar trait and type aliases

pub mod derivative;
pub mod error;
pub mod formula;
pub mod gradient;
pub mod jacobian;
pub mod settings;
pub mod step;
pub mod types;

mod parallel;

// Re-export commonly used items at the crate root
pub use error::{FdError, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use fdiff_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::derivative::{derivative, try_derivative};
    pub use crate::error::{FdError, Result};
    pub use crate::formula::{lookup, DerivativeOrder, Formula, FormulaKind, StencilPoint};
    pub use crate::gradient::{gradient, gradient_into, try_gradient_into};
    pub use crate::jacobian::{jacobian, jacobian_into, try_jacobian_into, JacobianStorage};
    pub use crate::settings::{JacobianSettings, Settings};
    pub use crate::step::resolve_step;
    pub use crate::types::{DMatrix, DVector, Scalar};
}
