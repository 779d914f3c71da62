//! Step size resolution.
//!
//! The step is absolute: it is added to the evaluation point through the
//! stencil offsets and is never rescaled by the magnitude of the point or of
//! the function value. For evaluation points far from the origin the default
//! steps lose relative precision; callers in that regime should pass an
//! explicit step proportional to `|x|`.

use crate::error::{FdError, Result};
use crate::formula::Formula;
use crate::types::Scalar;
use num_traits::Float;

/// Resolves the effective step for `formula`.
///
/// An explicit step is used verbatim. Without one, the formula's default
/// step is converted into `T`.
///
/// # Errors
///
/// Returns `FdError::InvalidStep` if the explicit step is zero, negative,
/// NaN or infinite, or if the default step underflows to zero or overflows
/// once converted into `T`.
pub fn resolve_step<T: Scalar>(formula: &Formula, step: Option<T>) -> Result<T> {
    let h = match step {
        Some(h) => h,
        None => match <T as Scalar>::try_from_f64(formula.step()) {
            Some(h) => h,
            None => return Err(FdError::invalid_step(formula.step())),
        },
    };
    if h > T::zero() && <T as Float>::is_finite(h) {
        Ok(h)
    } else if step.is_some() {
        Err(FdError::invalid_step(<T as Scalar>::to_f64(h)))
    } else {
        Err(FdError::invalid_step(formula.step()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{lookup, DerivativeOrder, Formula, FormulaKind, StencilPoint};
    use crate::settings::Settings;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_explicit_step_is_verbatim() {
        let formula = lookup(FormulaKind::Forward);
        assert_eq!(resolve_step(formula, Some(1e-3)).unwrap(), 1e-3);
        assert_eq!(resolve_step(formula, Some(2.5f32)).unwrap(), 2.5f32);
    }

    #[test]
    fn test_default_step_per_formula() {
        for kind in FormulaKind::ALL {
            let formula = lookup(kind);
            assert_eq!(resolve_step::<f64>(formula, None).unwrap(), formula.step());
        }
    }

    #[test]
    fn test_non_positive_step_rejected() {
        let formula = lookup(FormulaKind::Central);
        for bad in [0.0, -0.0, -1e-6, f64::NAN, f64::INFINITY] {
            let result = resolve_step(formula, Some(bad));
            assert!(
                matches!(result, Err(FdError::InvalidStep { .. })),
                "step {} accepted",
                bad
            );
        }
    }

    fn forward_with_default_step(step: f64) -> Formula {
        Formula::new(
            vec![StencilPoint::new(0.0, -1.0), StencilPoint::new(1.0, 1.0)],
            DerivativeOrder::First,
            step,
        )
        .unwrap()
    }

    #[test]
    fn test_default_step_checked_after_conversion() {
        let tiny = forward_with_default_step(1e-50);
        assert_eq!(resolve_step::<f64>(&tiny, None).unwrap(), 1e-50);
        assert_eq!(
            resolve_step::<f32>(&tiny, None),
            Err(FdError::invalid_step(1e-50))
        );

        let huge = forward_with_default_step(1e300);
        assert_eq!(
            resolve_step::<f32>(&huge, None),
            Err(FdError::invalid_step(1e300))
        );
    }

    #[test]
    fn test_underflowing_default_step_is_never_evaluated() {
        let calls = AtomicUsize::new(0);
        let settings = Settings::<f32>::new().with_formula(forward_with_default_step(1e-50));
        assert_eq!(settings.validate(), Err(FdError::invalid_step(1e-50)));

        let result = crate::derivative::derivative(
            |x: f32| {
                calls.fetch_add(1, Ordering::SeqCst);
                x * x
            },
            1.0f32,
            &settings,
        );
        assert_eq!(result, Err(FdError::invalid_step(1e-50)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
