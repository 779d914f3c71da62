//! Derivatives of scalar functions of one variable.

use crate::error::{FdError, Result};
use crate::parallel::fork_join;
use crate::settings::Settings;
use crate::types::Scalar;
use log::{debug, trace};
use num_traits::Float;

/// Estimates the derivative of `f` at `x`.
///
/// The order of the derivative is the order of the formula in `settings`
/// (first order, central differences by default).
///
/// # Errors
///
/// Returns a configuration error if the settings are invalid. The function
/// is not called in that case.
///
/// # Example
///
/// ```
/// use fdiff_core::prelude::*;
///
/// let df = derivative(f64::sin, 0.0, &Settings::default()).unwrap();
/// assert!((df - 1.0).abs() < 1e-9);
/// ```
pub fn derivative<T, F>(f: F, x: T, settings: &Settings<T>) -> Result<T>
where
    T: Scalar,
    F: Fn(T) -> T + Sync,
{
    try_derivative(|x| Ok::<T, FdError>(f(x)), x, settings)
}

/// Estimates the derivative of a fallible function `f` at `x`.
///
/// Errors raised by `f` are returned unchanged; configuration errors are
/// converted into the caller's error type through `From<FdError>`.
///
/// With `settings.concurrent` set, the stencil points are evaluated on the
/// rayon pool. The weighted sum is always accumulated in stencil order, so
/// the result does not depend on scheduling.
pub fn try_derivative<T, F, E>(f: F, x: T, settings: &Settings<T>) -> std::result::Result<T, E>
where
    T: Scalar,
    F: Fn(T) -> std::result::Result<T, E> + Sync,
    E: From<FdError> + Send,
{
    let (formula, step) = settings.resolve()?;
    let stencil = formula.stencil();
    debug!(
        "derivative at {}: order {}, step {}, {} points, concurrent {}",
        x,
        formula.order().exponent(),
        step,
        stencil.len(),
        settings.concurrent
    );

    let values = fork_join(stencil.len(), settings.concurrent, |i| {
        let point = &stencil[i];
        match settings.origin_value {
            Some(origin) if point.loc == 0.0 => {
                trace!("reusing origin value {}", origin);
                Ok(origin)
            }
            _ => f(x + <T as Scalar>::from_f64(point.loc) * step),
        }
    })?;

    let mut sum = T::zero();
    for (point, value) in stencil.iter().zip(values) {
        sum += <T as Scalar>::from_f64(point.coeff) * value;
    }
    Ok(sum / <T as Float>::powi(step, formula.order().exponent() as i32))
}
