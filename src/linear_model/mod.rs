//! Linear models for regression.
//!
//! This module provides:
//! - `LinearRegression`: Ordinary least squares
//! - `Ridge`: Least squares with an L2 penalty
//! - `Lasso`: Least squares with an L1 penalty, fit by coordinate descent
//!
//! All three fit an intercept by centering and implement [`Regressor`], so a
//! workflow can swap one for another without touching the surrounding code.
//!
//! # Examples
//!
//! ```rust
//! use tabular_eda::{Lasso, Regressor, Ridge};
//! use ndarray::array;
//!
//! let x = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [4.0, 0.0]];
//! let y = array![2.0, 4.0, 6.0, 8.0];
//!
//! let mut ridge = Ridge::new().alpha(1.0);
//! ridge.fit(&x, &y).unwrap();
//!
//! let mut lasso = Lasso::new().alpha(0.1);
//! lasso.fit(&x, &y).unwrap();
//! assert_eq!(lasso.coefficients().unwrap()[1], 0.0);
//! ```

mod lasso;
mod linear_regression;
mod ridge;

pub use lasso::Lasso;
pub use linear_regression::LinearRegression;
pub use ridge::Ridge;

use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use ndarray::Axis;

/// Shared contract of the regression models.
pub trait Regressor {
    fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()>;

    fn predict(&self, x: &Matrix) -> Result<Vector>;

    fn coefficients(&self) -> Option<&Vector>;

    fn intercept(&self) -> Option<f64>;

    fn name(&self) -> &'static str;

    fn score(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        let y_pred = self.predict(x)?;
        crate::metrics::r2_score(y, &y_pred)
    }
}

pub(crate) fn check_fit_input(x: &Matrix, y: &Vector) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(Error::DimensionMismatch {
            expected: x.nrows(),
            found: y.len(),
        });
    }
    if x.nrows() == 0 {
        return Err(Error::EmptyData("X must have at least one sample".to_string()));
    }
    Ok(())
}

pub(crate) fn linear_predict(
    model: &'static str,
    coefficients: Option<&Vector>,
    intercept: Option<f64>,
    x: &Matrix,
) -> Result<Vector> {
    let coeffs = coefficients.ok_or(Error::NotFitted(model))?;
    let intercept = intercept.unwrap_or(0.0);

    if x.ncols() != coeffs.len() {
        return Err(Error::DimensionMismatch {
            expected: coeffs.len(),
            found: x.ncols(),
        });
    }

    Ok(x.dot(coeffs) + intercept)
}

/// Column means of `x`, `x` with those means removed, the mean of `y` and centered `y`.
pub(crate) fn center(x: &Matrix, y: &Vector) -> Result<(Vector, Matrix, f64, Vector)> {
    let x_means = x
        .mean_axis(Axis(0))
        .ok_or_else(|| Error::EmptyData("cannot center an empty matrix".to_string()))?;
    let y_mean = y
        .mean()
        .ok_or_else(|| Error::EmptyData("cannot center an empty target".to_string()))?;

    let mut x_centered = x.clone();
    for mut row in x_centered.axis_iter_mut(Axis(0)) {
        row -= &x_means;
    }
    let y_centered = y - y_mean;

    Ok((x_means, x_centered, y_mean, y_centered))
}

/// Solves `(XᵀX + alpha·I) w = Xᵀy`.
pub(crate) fn solve_normal_equation(x: &Matrix, y: &Vector, alpha: f64) -> Result<Vector> {
    let xt = x.t();
    let mut xtx = xt.dot(x);
    for i in 0..xtx.nrows() {
        xtx[(i, i)] += alpha;
    }
    let xty = xt.dot(y);

    solve_linear_system(&xtx, &xty)
}

/// Gaussian elimination with partial pivoting.
pub(crate) fn solve_linear_system(a: &Matrix, b: &Vector) -> Result<Vector> {
    let n = a.nrows();
    let mut aug = Matrix::zeros((n, n + 1));

    for i in 0..n {
        for j in 0..n {
            aug[(i, j)] = a[(i, j)];
        }
        aug[(i, n)] = b[i];
    }

    let scale = a.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())).max(1.0);

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if aug[(k, i)].abs() > aug[(max_row, i)].abs() {
                max_row = k;
            }
        }

        if aug[(max_row, i)].abs() < 1e-12 * scale {
            return Err(Error::SingularMatrix);
        }

        if max_row != i {
            for j in 0..=n {
                aug.swap((i, j), (max_row, j));
            }
        }

        for k in (i + 1)..n {
            let factor = aug[(k, i)] / aug[(i, i)];
            for j in i..=n {
                aug[(k, j)] -= factor * aug[(i, j)];
            }
        }
    }

    let mut x = Vector::zeros(n);
    for i in (0..n).rev() {
        x[i] = aug[(i, n)];
        for j in (i + 1)..n {
            x[i] -= aug[(i, j)] * x[j];
        }
        x[i] /= aug[(i, i)];
    }

    Ok(x)
}
