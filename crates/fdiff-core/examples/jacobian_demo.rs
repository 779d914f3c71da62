//! Jacobian of a small vector function, computed column-parallel.

use fdiff_core::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let f = |y: &mut DVector<f64>, x: &DVector<f64>| {
        y[0] = x[0] + 1.0;
        y[1] = 5.0 * x[2];
        y[2] = 4.0 * x[1] * x[1] - 2.0 * x[2];
        y[3] = x[2] * x[0].sin();
    };
    let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);

    let settings = JacobianSettings::new()
        .with_formula(FormulaKind::Central)
        .with_concurrent(true);
    let jac = jacobian(f, 4, &x, &settings)?;
    println!("J ≈ {}", jac);

    // Reuse a preallocated matrix and a known f(x) with forward differences.
    let mut y0 = DVector::zeros(4);
    f(&mut y0, &x);
    let mut dst = DMatrix::zeros(4, 3);
    let settings = JacobianSettings::new()
        .with_formula(FormulaKind::Forward)
        .with_origin_value(y0);
    jacobian_into(&mut dst, f, 4, &x, &settings)?;
    println!("J (forward) ≈ {}", dst);

    // A matrix of the wrong shape is rejected and left as it was.
    let mut wrong = DMatrix::zeros(3, 3);
    if let Err(err) = jacobian_into(&mut wrong, f, 4, &x, &JacobianSettings::default()) {
        println!("rejected: {}", err);
    }

    Ok(())
}
