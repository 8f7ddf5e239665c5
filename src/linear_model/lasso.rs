use super::{Regressor, center, check_fit_input, linear_predict};
use crate::error::Result;
use crate::{Matrix, Vector};
use tracing::{debug, warn};

/// Minimizes `(1 / 2n)·||y - Xw||² + alpha·||w||₁` by cyclic coordinate descent.
///
/// A sweep whose largest coefficient update is small relative to the largest
/// coefficient only ends the fit once the duality gap is below
/// `tolerance·||y||²`.
#[derive(Clone, Debug)]
pub struct Lasso {
    pub coefficients: Option<Vector>,
    pub intercept: Option<f64>,
    alpha: f64,
    fit_intercept: bool,
    max_iter: usize,
    tolerance: f64,
}

impl Lasso {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            alpha: 1.0,
            fit_intercept: true,
            max_iter: 1000,
            tolerance: 1e-4,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        if alpha < 0.0 {
            panic!("alpha must be non-negative, got {}", alpha);
        }
        self.alpha = alpha;
        self
    }

    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn penalty(&self) -> f64 {
        self.alpha
    }

    fn coordinate_descent(&self, x: &Matrix, y: &Vector) -> (Vector, usize) {
        let n_features = x.ncols();
        let n_samples = x.nrows() as f64;
        let mut beta = Vector::zeros(n_features);
        let mut residual = y.clone();

        let alpha_n = self.alpha * n_samples;
        let gap_tolerance = self.tolerance * y.dot(y);
        if gap_tolerance == 0.0 {
            // zero target: w = 0 is optimal
            return (beta, 0);
        }

        let x_norms: Vector = (0..n_features)
            .map(|j| x.column(j).mapv(|v| v * v).sum() / n_samples)
            .collect();

        for iteration in 0..self.max_iter {
            let mut max_step: f64 = 0.0;
            let mut max_coef: f64 = 0.0;

            for j in 0..n_features {
                if x_norms[j] < 1e-12 {
                    continue;
                }

                let column = x.column(j);
                let old = beta[j];
                // correlation of feature j with the residual that excludes it
                let rho = column.dot(&residual) / n_samples + x_norms[j] * old;
                let new = soft_threshold(rho, self.alpha) / x_norms[j];

                if new != old {
                    residual.scaled_add(old - new, &column);
                    beta[j] = new;
                }

                max_step = max_step.max((new - old).abs());
                max_coef = max_coef.max(new.abs());
            }

            let last = iteration + 1 == self.max_iter;
            if max_coef == 0.0 || max_step / max_coef < self.tolerance || last {
                let gap = duality_gap(x, y, &residual, &beta, alpha_n);
                if gap < gap_tolerance {
                    return (beta, iteration + 1);
                }
            }
        }

        warn!(
            "Lasso(alpha={}) did not converge after {} iterations",
            self.alpha, self.max_iter
        );
        (beta, self.max_iter)
    }
}

/// Gap between the primal `½·||r||² + alpha_n·||w||₁` and the dual objective
/// at the rescaled residual, where `r = y - Xw`.
fn duality_gap(x: &Matrix, y: &Vector, residual: &Vector, beta: &Vector, alpha_n: f64) -> f64 {
    let dual_norm = x
        .t()
        .dot(residual)
        .iter()
        .fold(0.0_f64, |max, v| max.max(v.abs()));
    let r_norm2 = residual.dot(residual);

    let (scale, gap) = if dual_norm > alpha_n {
        let scale = alpha_n / dual_norm;
        (scale, 0.5 * (r_norm2 + r_norm2 * scale * scale))
    } else {
        (1.0, r_norm2)
    };

    let l1_norm = beta.mapv(f64::abs).sum();
    gap + alpha_n * l1_norm - scale * residual.dot(y)
}

fn soft_threshold(z: f64, gamma: f64) -> f64 {
    if z > gamma {
        z - gamma
    } else if z < -gamma {
        z + gamma
    } else {
        0.0
    }
}

impl Regressor for Lasso {
    fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()> {
        check_fit_input(x, y)?;

        let (coeffs, intercept, n_iter) = if self.fit_intercept {
            let (x_means, x_centered, y_mean, y_centered) = center(x, y)?;
            let (coeffs, n_iter) = self.coordinate_descent(&x_centered, &y_centered);
            let intercept = y_mean - coeffs.dot(&x_means);
            (coeffs, intercept, n_iter)
        } else {
            let (coeffs, n_iter) = self.coordinate_descent(x, y);
            (coeffs, 0.0, n_iter)
        };

        debug!(
            "Lasso(alpha={}) fit in {} iterations: intercept={:.4}",
            self.alpha, n_iter, intercept
        );
        self.coefficients = Some(coeffs);
        self.intercept = Some(intercept);
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> Result<Vector> {
        linear_predict("Lasso", self.coefficients.as_ref(), self.intercept, x)
    }

    fn coefficients(&self) -> Option<&Vector> {
        self.coefficients.as_ref()
    }

    fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    fn name(&self) -> &'static str {
        "Lasso Regression"
    }
}

impl Default for Lasso {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_lasso_single_feature_closed_form() {
        // centered x = [-1.5, -0.5, 0.5, 1.5]: x·y/n = 2.5, x·x/n = 1.25
        // w = (2.5 - alpha) / 1.25
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut model = Lasso::new().alpha(0.1);
        model.fit(&x, &y).unwrap();

        let coeffs = model.coefficients.as_ref().unwrap();
        assert!((coeffs[0] - 2.4 / 1.25).abs() < 1e-9);
        assert!((model.intercept.unwrap() - (5.0 - 2.5 * coeffs[0])).abs() < 1e-9);
    }

    #[test]
    fn test_lasso_sparsity() {
        let x = array![
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [4.0, 0.0, 0.0]
        ];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut model = Lasso::new().alpha(0.1);
        model.fit(&x, &y).unwrap();

        let coeffs = model.coefficients.as_ref().unwrap();

        assert!(coeffs[0].abs() > 0.1);
        assert_eq!(coeffs[1], 0.0);
        assert_eq!(coeffs[2], 0.0);
    }

    #[test]
    fn test_lasso_drops_irrelevant_feature() {
        let x = array![
            [1.0, 0.3],
            [2.0, -0.2],
            [3.0, 0.1],
            [4.0, -0.3],
            [5.0, 0.2],
            [6.0, -0.1]
        ];
        let y = array![3.0, 6.0, 9.0, 12.0, 15.0, 18.0];

        let mut model = Lasso::new().alpha(0.5);
        model.fit(&x, &y).unwrap();

        let coeffs = model.coefficients.as_ref().unwrap();
        assert!(coeffs[0] > 2.5);
        assert_eq!(coeffs[1], 0.0);
    }

    #[test]
    fn test_lasso_high_regularization() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut model = Lasso::new().alpha(100.0);
        model.fit(&x, &y).unwrap();

        let coeffs = model.coefficients.as_ref().unwrap();
        assert_eq!(coeffs[0], 0.0);
        assert!((model.intercept.unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_lasso_without_intercept() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut model = Lasso::new().alpha(0.01).fit_intercept(false);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.intercept.unwrap(), 0.0);
        let coeffs = model.coefficients.as_ref().unwrap();
        assert!((coeffs[0] - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_duality_gap_closes_at_optimum() {
        // centered x and y = 2x, alpha = 0.1 over 4 samples
        let x = array![[-1.5], [-0.5], [0.5], [1.5]];
        let y = array![-3.0, -1.0, 1.0, 3.0];
        let alpha_n = 0.4;

        let zero = array![0.0];
        let gap = duality_gap(&x, &y, &y, &zero, alpha_n);
        assert!((gap - 9.216).abs() < 1e-9);

        let optimum = array![2.4 / 1.25];
        let residual = &y - &x.dot(&optimum);
        let gap = duality_gap(&x, &y, &residual, &optimum, alpha_n);
        assert!(gap.abs() < 1e-9);
    }

    #[test]
    fn test_fit_stops_within_gap_tolerance() {
        // nearly collinear features make single sweeps move little
        let x = array![[1.0, 0.9], [2.0, 2.1], [3.0, 2.9], [4.0, 4.2], [5.0, 4.8]];
        let y = array![3.0, 6.1, 8.9, 12.2, 14.8];

        let mut model = Lasso::new().alpha(0.01).tolerance(1e-2);
        model.fit(&x, &y).unwrap();

        let (_, x_centered, _, y_centered) = center(&x, &y).unwrap();
        let coeffs = model.coefficients.clone().unwrap();
        let residual = &y_centered - &x_centered.dot(&coeffs);
        let gap = duality_gap(&x_centered, &y_centered, &residual, &coeffs, 0.01 * 5.0);
        assert!(gap < 1e-2 * y_centered.dot(&y_centered));
    }

    #[test]
    fn test_zero_target_fits_zero_coefficients() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![5.0, 5.0, 5.0];

        let mut model = Lasso::new().alpha(0.1);
        model.fit(&x, &y).unwrap();

        assert_eq!(model.coefficients.as_ref().unwrap()[0], 0.0);
        assert_eq!(model.intercept.unwrap(), 5.0);
    }

    #[test]
    fn test_soft_threshold() {
        assert_eq!(soft_threshold(3.0, 1.0), 2.0);
        assert_eq!(soft_threshold(-3.0, 1.0), -2.0);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
    }

    #[test]
    fn test_lasso_invalid_alpha() {
        std::panic::catch_unwind(|| {
            Lasso::new().alpha(-1.0);
        })
        .expect_err("Should panic on negative alpha");
    }

    #[test]
    fn test_lasso_predict_without_fit() {
        let x = array![[1.0], [2.0]];
        let model = Lasso::new();

        assert!(model.predict(&x).is_err());
    }
}
