//! Scalar derivatives with the different formulas.
//!
//! Run with `RUST_LOG=debug` to see the settings each call resolves to.

use fdiff_core::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    // First derivative of sin at 0 with the default settings.
    let df = derivative(f64::sin, 0.0, &Settings::default())?;
    println!("f'(0) ≈ {}", df);

    // Forward differences with a custom step.
    let settings = Settings::new()
        .with_formula(FormulaKind::Forward)
        .with_step(1e-3);
    println!("f'(0) ≈ {}", derivative(f64::sin, 0.0, &settings)?);

    // Second derivative of cos³ at 0, concurrently, with a known origin value.
    let f = |x: f64| x.cos().powi(3);
    let settings = Settings::new()
        .with_formula(FormulaKind::Central2nd)
        .with_concurrent(true)
        .with_origin_value(f(0.0));
    println!("f''(0) ≈ {}", derivative(f, 0.0, &settings)?);

    // Formulas can also be selected by name, e.g. from a config file.
    for name in ["backward", "central", "simpson"] {
        match name.parse::<FormulaKind>() {
            Ok(kind) => {
                let settings = Settings::new().with_formula(kind);
                println!("{:>8}: f'(1) ≈ {}", kind, derivative(f64::sin, 1.0, &settings)?);
            }
            Err(err) => println!("{:>8}: {}", name, err),
        }
    }

    Ok(())
}
