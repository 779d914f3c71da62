//! Gradients of scalar functions of several variables.
//!
//! Each component of the gradient is the first derivative of `f` along one
//! coordinate axis, estimated with the same stencil and step. When the
//! stencil includes the origin, `f(x)` is evaluated at most once and shared
//! by every component.

use crate::error::{FdError, Result};
use crate::parallel::fork_join;
use crate::settings::Settings;
use crate::types::{DVector, Scalar};
use log::{debug, trace};

/// Estimates the gradient of `f` at `x`.
///
/// # Errors
///
/// Returns a configuration error if the settings are invalid or the formula
/// is not first order.
pub fn gradient<T, F>(f: F, x: &DVector<T>, settings: &Settings<T>) -> Result<DVector<T>>
where
    T: Scalar,
    F: Fn(&DVector<T>) -> T + Sync,
{
    let mut grad = DVector::zeros(x.len());
    gradient_into(&mut grad, f, x, settings)?;
    Ok(grad)
}

/// Estimates the gradient of `f` at `x` and stores it in `dst`.
///
/// `dst` must have the same length as `x`; it is left untouched on error.
pub fn gradient_into<T, F>(
    dst: &mut DVector<T>,
    f: F,
    x: &DVector<T>,
    settings: &Settings<T>,
) -> Result<()>
where
    T: Scalar,
    F: Fn(&DVector<T>) -> T + Sync,
{
    try_gradient_into(dst, |p: &DVector<T>| Ok::<T, FdError>(f(p)), x, settings)
}

/// Fallible version of [`gradient_into`].
///
/// Errors raised by `f` are returned unchanged. With `settings.concurrent`
/// set, the components are computed in parallel, each on a private copy of
/// `x`.
pub fn try_gradient_into<T, F, E>(
    dst: &mut DVector<T>,
    f: F,
    x: &DVector<T>,
    settings: &Settings<T>,
) -> std::result::Result<(), E>
where
    T: Scalar,
    F: Fn(&DVector<T>) -> std::result::Result<T, E> + Sync,
    E: From<FdError> + Send,
{
    let (formula, step) = settings.resolve()?;
    formula.require_first_order("gradient")?;
    if dst.len() != x.len() {
        return Err(FdError::dimension_mismatch(
            format!("gradient of length {}", x.len()),
            format!("length {}", dst.len()),
        )
        .into());
    }

    let n = x.len();
    debug!(
        "gradient in {} dimensions: step {}, concurrent {}",
        n, step, settings.concurrent
    );
    if n == 0 {
        return Ok(());
    }

    let origin = if formula.uses_origin() {
        match settings.origin_value {
            Some(value) => Some(value),
            None => {
                trace!("evaluating origin once for {} components", n);
                Some(f(x)?)
            }
        }
    } else {
        None
    };

    let stencil = formula.stencil();
    let components = fork_join(n, settings.concurrent, |j| {
        let mut xp = x.clone();
        let mut sum = T::zero();
        for point in stencil {
            let value = match origin {
                Some(value) if point.loc == 0.0 => value,
                _ => {
                    xp[j] = x[j] + <T as Scalar>::from_f64(point.loc) * step;
                    f(&xp)?
                }
            };
            sum += <T as Scalar>::from_f64(point.coeff) * value;
        }
        Ok::<T, E>(sum / step)
    })?;

    for (j, component) in components.into_iter().enumerate() {
        dst[j] = component;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::FormulaKind;
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn rosenbrock(x: &DVector<f64>) -> f64 {
        (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
    }

    #[test]
    fn test_gradient_rosenbrock() {
        let x = DVector::from_vec(vec![-1.2, 1.0]);
        // Analytical: [-2(1-x) - 400x(y-x²), 200(y-x²)]
        let expected = DVector::from_vec(vec![-215.6, -88.0]);

        for kind in [FormulaKind::Forward, FormulaKind::Backward, FormulaKind::Central] {
            let settings = Settings::new().with_formula(kind);
            let grad = gradient(rosenbrock, &x, &settings).unwrap();
            assert_relative_eq!(grad, expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_origin_evaluated_once() {
        let calls = AtomicUsize::new(0);
        let f = |x: &DVector<f64>| {
            calls.fetch_add(1, Ordering::SeqCst);
            x.dot(x)
        };
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);

        let settings = Settings::new().with_formula(FormulaKind::Forward);
        gradient(&f, &x, &settings).unwrap();
        assert_eq!(calls.swap(0, Ordering::SeqCst), 1 + 4);

        gradient(&f, &x, &settings.clone().with_origin_value(30.0)).unwrap();
        assert_eq!(calls.swap(0, Ordering::SeqCst), 4);

        gradient(&f, &x, &Settings::default()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2 * 4);
    }

    #[test]
    fn test_concurrent_matches_sequential() {
        let x = DVector::from_fn(12, |i, _| 0.1 * i as f64 - 0.4);
        let f = |x: &DVector<f64>| x.iter().map(|v| v.sin() * v.exp()).sum::<f64>();

        let sequential = gradient(f, &x, &Settings::default()).unwrap();
        let concurrent = gradient(f, &x, &Settings::new().with_concurrent(true)).unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[test]
    fn test_rejects_bad_shapes_and_orders() {
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let mut dst = DVector::from_vec(vec![7.0, 7.0, 7.0]);
        let err = gradient_into(&mut dst, rosenbrock, &x, &Settings::default()).unwrap_err();
        assert!(matches!(err, FdError::DimensionMismatch { .. }));
        assert_eq!(dst, DVector::from_vec(vec![7.0, 7.0, 7.0]));

        let settings = Settings::new().with_formula(FormulaKind::Central2nd);
        let err = gradient(rosenbrock, &x, &settings).unwrap_err();
        assert_eq!(err, FdError::unsupported_order("gradient", 2));
    }

    #[test]
    fn test_empty_point() {
        let x = DVector::<f64>::zeros(0);
        let f = |_: &DVector<f64>| -> f64 { panic!("not called") };
        let grad = gradient(f, &x, &Settings::default()).unwrap();
        assert_eq!(grad.len(), 0);
    }
}
