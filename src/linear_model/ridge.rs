use super::{Regressor, center, check_fit_input, linear_predict, solve_normal_equation};
use crate::error::Result;
use crate::{Matrix, Vector};
use tracing::debug;

/// Minimizes `||y - Xw||² + alpha·||w||²`. The intercept is not penalized.
#[derive(Clone, Debug)]
pub struct Ridge {
    pub coefficients: Option<Vector>,
    pub intercept: Option<f64>,
    alpha: f64,
    fit_intercept: bool,
}

impl Ridge {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            alpha: 1.0,
            fit_intercept: true,
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

    pub fn penalty(&self) -> f64 {
        self.alpha
    }
}

impl Regressor for Ridge {
    fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()> {
        check_fit_input(x, y)?;

        let (coeffs, intercept) = if self.fit_intercept {
            let (x_means, x_centered, y_mean, y_centered) = center(x, y)?;
            let coeffs = solve_normal_equation(&x_centered, &y_centered, self.alpha)?;
            let intercept = y_mean - coeffs.dot(&x_means);
            (coeffs, intercept)
        } else {
            (solve_normal_equation(x, y, self.alpha)?, 0.0)
        };

        debug!("Ridge(alpha={}) fit: intercept={:.4}", self.alpha, intercept);
        self.coefficients = Some(coeffs);
        self.intercept = Some(intercept);
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> Result<Vector> {
        linear_predict("Ridge", self.coefficients.as_ref(), self.intercept, x)
    }

    fn coefficients(&self) -> Option<&Vector> {
        self.coefficients.as_ref()
    }

    fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    fn name(&self) -> &'static str {
        "Ridge Regression"
    }
}

impl Default for Ridge {
    fn default() -> Self {
        Self::new()
    }
}
