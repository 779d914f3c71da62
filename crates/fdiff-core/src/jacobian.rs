//! Jacobians of vector-valued functions.
//!
//! The function has the form `f(y, x)`: it reads the input `x` and fills the
//! output `y`, whose length is the output dimension `m`. Column `j` of the
//! `m × n` Jacobian is the first derivative of `f` along input coordinate
//! `j`, estimated with one stencil and step for the whole matrix.
//!
//! # Concurrency
//!
//! With `concurrent` set, the columns are computed in parallel. Each task owns
//! its perturbed copy of `x`, its output buffer and its column; the only
//! shared data is `x` and the origin value, both read-only. Columns are
//! written into the storage after the join, each by the task that computed
//! it.

use crate::error::{FdError, Result};
use crate::parallel::fork_join;
use crate::settings::JacobianSettings;
use crate::types::{DMatrix, DVector, Scalar};
use log::{debug, trace};

/// Output storage for a Jacobian.
///
/// The evaluators only query the shape and write single entries; they never
/// read from the storage.
pub trait JacobianStorage<T> {
    /// Number of rows and columns.
    fn shape(&self) -> (usize, usize);

    /// Writes `value` at `(row, col)`.
    fn set_entry(&mut self, row: usize, col: usize, value: T);
}

impl<T: Scalar> JacobianStorage<T> for DMatrix<T> {
    fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn set_entry(&mut self, row: usize, col: usize, value: T) {
        self[(row, col)] = value;
    }
}

/// Estimates the Jacobian of `f` at `x` in a newly allocated
/// `output_dim × x.len()` matrix.
///
/// # Errors
///
/// Returns a configuration error if the settings are invalid, the formula is
/// not first order, or the origin value has the wrong length.
///
/// # Example
///
/// ```
/// use fdiff_core::prelude::*;
///
/// let f = |y: &mut DVector<f64>, x: &DVector<f64>| {
///     y[0] = x[0] * x[1];
///     y[1] = x[0] + 3.0 * x[1];
/// };
/// let x = DVector::from_vec(vec![2.0, 5.0]);
/// let jac = jacobian(f, 2, &x, &JacobianSettings::default()).unwrap();
/// assert!((jac[(0, 0)] - 5.0).abs() < 1e-8);
/// assert!((jac[(1, 1)] - 3.0).abs() < 1e-8);
/// ```
pub fn jacobian<T, F>(
    f: F,
    output_dim: usize,
    x: &DVector<T>,
    settings: &JacobianSettings<T>,
) -> Result<DMatrix<T>>
where
    T: Scalar,
    F: Fn(&mut DVector<T>, &DVector<T>) + Sync,
{
    let mut jac = DMatrix::zeros(output_dim, x.len());
    jacobian_into(&mut jac, f, output_dim, x, settings)?;
    Ok(jac)
}

/// Estimates the Jacobian of `f` at `x` and writes it into `dst`.
///
/// `dst` must be `output_dim × x.len()`. On any configuration error it is
/// left untouched and `f` is not called.
pub fn jacobian_into<T, S, F>(
    dst: &mut S,
    f: F,
    output_dim: usize,
    x: &DVector<T>,
    settings: &JacobianSettings<T>,
) -> Result<()>
where
    T: Scalar,
    S: JacobianStorage<T> + ?Sized,
    F: Fn(&mut DVector<T>, &DVector<T>) + Sync,
{
    try_jacobian_into(
        dst,
        |y: &mut DVector<T>, p: &DVector<T>| {
            f(y, p);
            Ok::<(), FdError>(())
        },
        output_dim,
        x,
        settings,
    )
}

/// Fallible version of [`jacobian_into`].
///
/// Errors raised by `f` are returned unchanged; `dst` is only written once
/// every column has been computed successfully.
pub fn try_jacobian_into<T, S, F, E>(
    dst: &mut S,
    f: F,
    output_dim: usize,
    x: &DVector<T>,
    settings: &JacobianSettings<T>,
) -> std::result::Result<(), E>
where
    T: Scalar,
    S: JacobianStorage<T> + ?Sized,
    F: Fn(&mut DVector<T>, &DVector<T>) -> std::result::Result<(), E> + Sync,
    E: From<FdError> + Send,
{
    let (formula, step) = settings.resolve(output_dim)?;
    let n = x.len();
    let (rows, cols) = dst.shape();
    if (rows, cols) != (output_dim, n) {
        return Err(FdError::dimension_mismatch(
            format!("{}x{}", output_dim, n),
            format!("{}x{}", rows, cols),
        )
        .into());
    }

    debug!(
        "jacobian {}x{}: step {}, concurrent {}",
        output_dim, n, step, settings.concurrent
    );
    if n == 0 {
        return Ok(());
    }

    let origin = if formula.uses_origin() {
        match &settings.origin_value {
            Some(value) => Some(value.clone()),
            None => {
                trace!("evaluating origin once for {} columns", n);
                let mut y0 = DVector::zeros(output_dim);
                f(&mut y0, x)?;
                Some(y0)
            }
        }
    } else {
        None
    };

    let stencil = formula.stencil();
    let columns = fork_join(n, settings.concurrent, |j| {
        let mut xp = x.clone();
        let mut buf = DVector::zeros(output_dim);
        let mut col = DVector::<T>::zeros(output_dim);
        for point in stencil {
            let weight = <T as Scalar>::from_f64(point.coeff);
            let values = match &origin {
                Some(y0) if point.loc == 0.0 => y0,
                _ => {
                    xp[j] = x[j] + <T as Scalar>::from_f64(point.loc) * step;
                    buf.fill(T::zero());
                    f(&mut buf, &xp)?;
                    &buf
                }
            };
            for (c, v) in col.iter_mut().zip(values.iter()) {
                *c += weight * *v;
            }
        }
        col /= step;
        Ok::<DVector<T>, E>(col)
    })?;

    for (j, col) in columns.into_iter().enumerate() {
        for (i, value) in col.iter().enumerate() {
            dst.set_entry(i, j, *value);
        }
    }
    Ok(())
}
