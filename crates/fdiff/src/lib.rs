//! Numerical derivatives and Jacobians by finite differences.
//!
//! This crate re-exports [`fdiff_core`] together with the `nalgebra` version
//! it is built against.
//!
//! # Example
//!
//! ```
//! use fdiff::prelude::*;
//!
//! let settings = Settings::new().with_formula(FormulaKind::Forward).with_step(1e-3);
//! let df = derivative(f64::sin, 0.0, &settings).unwrap();
//! assert!((df - 0.9999998333333416).abs() < 1e-15);
//! ```

pub use fdiff_core::*;

pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use fdiff_core::prelude::*;
}
