//! A column transformer chained with a regressor.

use crate::error::{Error, Result};
use crate::linear_model::Regressor;
use crate::preprocessing::{ColumnTransformer, Transformer};
use crate::Vector;
use polars::prelude::DataFrame;
use tracing::debug;

/// Fits the transformer and the regressor together on training rows; prediction
/// only reapplies the fitted transformer.
#[derive(Clone, Debug)]
pub struct RegressionPipeline<R: Regressor> {
    transformer: ColumnTransformer,
    regressor: R,
}

impl<R: Regressor> RegressionPipeline<R> {
    pub fn new(transformer: ColumnTransformer, regressor: R) -> Self {
        Self {
            transformer,
            regressor,
        }
    }

    pub fn fit(&mut self, df: &DataFrame, y: &Vector) -> Result<()> {
        let x = self.transformer.fit_transform(df)?;
        debug!(
            "{}: fitting on {} rows x {} features",
            self.regressor.name(),
            x.nrows(),
            x.ncols()
        );
        self.regressor.fit(&x, y)
    }

    pub fn predict(&self, df: &DataFrame) -> Result<Vector> {
        let x = self.transformer.transform(df)?;
        self.regressor.predict(&x)
    }

    pub fn score(&self, df: &DataFrame, y: &Vector) -> Result<f64> {
        let x = self.transformer.transform(df)?;
        self.regressor.score(&x, y)
    }

    pub fn name(&self) -> &'static str {
        self.regressor.name()
    }

    pub fn transformer(&self) -> &ColumnTransformer {
        &self.transformer
    }

    pub fn regressor(&self) -> &R {
        &self.regressor
    }

    /// Fitted coefficients paired with the transformer's output feature names.
    pub fn named_coefficients(&self) -> Result<Vec<(String, f64)>> {
        let coefficients = self
            .regressor
            .coefficients()
            .ok_or(Error::NotFitted("RegressionPipeline"))?;
        let names = self.transformer.feature_names_out()?;

        Ok(names.into_iter().zip(coefficients.iter().copied()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_model::{Lasso, LinearRegression};
    use ndarray::array;

    fn frame(csv: &str) -> DataFrame {
        crate::frame::read_csv_str(csv).unwrap()
    }

    fn transformer() -> ColumnTransformer {
        ColumnTransformer::new()
            .numeric(["odometer"])
            .categorical(["condition"])
    }

    #[test]
    fn test_predict_does_not_refit() {
        // price = 100 - odometer + 10 * [good]
        let train = frame(
            "odometer,condition\n10,fair\n20,good\n30,fair\n40,good\n50,fair\n",
        );
        let y = array![90.0, 90.0, 70.0, 70.0, 50.0];

        let mut pipeline = RegressionPipeline::new(transformer(), LinearRegression::new());
        pipeline.fit(&train, &y).unwrap();

        // a test frame with very different statistics must still map through
        // the training mean and std
        let test = frame("odometer,condition\n1000,good\n1000,good\n");
        let predictions = pipeline.predict(&test).unwrap();
        assert!((predictions[0] - (100.0 - 1000.0 + 10.0)).abs() < 1e-6);

        let mean = pipeline.transformer().scaler().mean().unwrap();
        assert!((mean[0] - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_named_coefficients() {
        let train = frame(
            "odometer,condition\n10,fair\n20,good\n30,fair\n40,good\n50,fair\n",
        );
        let y = array![90.0, 90.0, 70.0, 70.0, 50.0];

        let mut pipeline = RegressionPipeline::new(transformer(), Lasso::new().alpha(0.1));
        pipeline.fit(&train, &y).unwrap();

        let named = pipeline.named_coefficients().unwrap();
        let names: Vec<&str> = named.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["odometer", "condition_good"]);
        assert!(named[0].1 < 0.0);
        assert!(pipeline.score(&train, &y).unwrap() > 0.95);
    }

    #[test]
    fn test_unknown_category_at_predict() {
        let train = frame("odometer,condition\n10,fair\n20,good\n30,fair\n");
        let y = array![1.0, 2.0, 3.0];

        let mut pipeline = RegressionPipeline::new(transformer(), LinearRegression::new());
        pipeline.fit(&train, &y).unwrap();

        let test = frame("odometer,condition\n10,salvage\n");
        assert!(matches!(
            pipeline.predict(&test),
            Err(Error::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_predict_before_fit() {
        let pipeline = RegressionPipeline::new(transformer(), LinearRegression::new());
        let test = frame("odometer,condition\n10,fair\n");
        assert!(pipeline.predict(&test).is_err());
        assert!(pipeline.named_coefficients().is_err());
    }
}
