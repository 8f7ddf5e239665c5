use super::{Regressor, center, check_fit_input, linear_predict, solve_normal_equation};
use crate::error::Result;
use crate::{Matrix, Vector};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct LinearRegression {
    pub coefficients: Option<Vector>,
    pub intercept: Option<f64>,
    fit_intercept: bool,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
        }
    }

    pub fn with_intercept(fit_intercept: bool) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept,
        }
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()> {
        check_fit_input(x, y)?;

        let (coeffs, intercept) = if self.fit_intercept {
            let (x_means, x_centered, y_mean, y_centered) = center(x, y)?;
            let coeffs = solve_normal_equation(&x_centered, &y_centered, 0.0)?;
            let intercept = y_mean - coeffs.dot(&x_means);
            (coeffs, intercept)
        } else {
            (solve_normal_equation(x, y, 0.0)?, 0.0)
        };

        debug!("LinearRegression fit: intercept={:.4}", intercept);
        self.coefficients = Some(coeffs);
        self.intercept = Some(intercept);
        Ok(())
    }

    fn predict(&self, x: &Matrix) -> Result<Vector> {
        linear_predict(
            "LinearRegression",
            self.coefficients.as_ref(),
            self.intercept,
            x,
        )
    }

    fn coefficients(&self) -> Option<&Vector> {
        self.coefficients.as_ref()
    }

    fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    fn name(&self) -> &'static str {
        "Linear Regression"
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}
