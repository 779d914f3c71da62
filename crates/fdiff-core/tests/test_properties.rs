//! Property-based tests for the finite-difference evaluators.

use fdiff_core::prelude::*;
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = FormulaKind> {
    prop::sample::select(FormulaKind::ALL.to_vec())
}

fn first_order_kind() -> impl Strategy<Value = FormulaKind> {
    prop::sample::select(vec![
        FormulaKind::Forward,
        FormulaKind::Backward,
        FormulaKind::Central,
    ])
}

proptest! {
    #[test]
    fn constant_derivative_is_zero(
        kind in any_kind(),
        c in -1e6f64..1e6,
        x0 in -100.0f64..100.0,
        step in prop::option::of(1e-8f64..1e-1),
    ) {
        let mut settings = Settings::new().with_formula(kind);
        settings.step = step;
        prop_assert_eq!(derivative(|_| c, x0, &settings).unwrap(), 0.0);
    }

    #[test]
    fn concurrent_equals_sequential(
        kind in any_kind(),
        a in -3.0f64..3.0,
        b in -3.0f64..3.0,
        x0 in -2.0f64..2.0,
    ) {
        let f = |x: f64| a * x.sin() + b * x * x * x;
        let sequential = Settings::new().with_formula(kind);
        let concurrent = sequential.clone().with_concurrent(true);
        let lhs = derivative(f, x0, &sequential).unwrap();
        let rhs = derivative(f, x0, &concurrent).unwrap();
        prop_assert_eq!(lhs.to_bits(), rhs.to_bits());
    }

    #[test]
    fn linear_jacobian_recovers_matrix(
        kind in first_order_kind(),
        entries in prop::collection::vec(-5.0f64..5.0, 6),
        point in prop::collection::vec(-5.0f64..5.0, 3),
        concurrent in any::<bool>(),
    ) {
        let a = DMatrix::from_row_slice(2, 3, &entries);
        let x = DVector::from_vec(point);
        let settings = JacobianSettings::new()
            .with_formula(kind)
            .with_step(1e-4)
            .with_concurrent(concurrent);
        let jac = jacobian(|y: &mut DVector<f64>, p: &DVector<f64>| y.copy_from(&(&a * p)), 2, &x, &settings)
            .unwrap();
        for (est, exact) in jac.iter().zip(a.iter()) {
            prop_assert!((est - exact).abs() < 1e-8, "{} vs {}", est, exact);
        }
    }

    #[test]
    fn gradient_matches_jacobian_row(
        kind in first_order_kind(),
        point in prop::collection::vec(-2.0f64..2.0, 4),
    ) {
        let f = |p: &DVector<f64>| p.iter().enumerate().map(|(i, v)| (i as f64 + 1.0) * v.sin()).sum::<f64>();
        let x = DVector::from_vec(point);

        let grad = gradient(f, &x, &Settings::new().with_formula(kind)).unwrap();
        let jac = jacobian(
            |y: &mut DVector<f64>, p: &DVector<f64>| y[0] = f(p),
            1,
            &x,
            &JacobianSettings::new().with_formula(kind),
        )
        .unwrap();
        for j in 0..x.len() {
            prop_assert_eq!(grad[j].to_bits(), jac[(0, j)].to_bits());
        }
    }
}
