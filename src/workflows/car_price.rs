//! Used-car price regression.
//!
//! Rows with any missing cell are dropped, `year` is replaced by `Car_Age`,
//! odometer and price outliers are removed with IQR fences, and three linear
//! models are fit on the same scaled and one-hot encoded training rows.

use crate::cleaning::{IqrBounds, derive_age, detect_outliers, drop_missing_rows, retain_within};
use crate::config::{CarPriceConfig, JsonConfig};
use crate::error::Result;
use crate::frame::{describe, info, numeric_vector, render_summaries, take_rows};
use crate::linear_model::{Lasso, LinearRegression, Regressor, Ridge};
use crate::metrics::RegressionMetrics;
use crate::model_selection::TrainTestSplit;
use crate::pipeline::RegressionPipeline;
use crate::preprocessing::ColumnTransformer;
use crate::report::{bar_chart, section};
use crate::schema::{ColumnKind, Schema};
use crate::Vector;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::fmt;
use tracing::info;

pub const YEAR: &str = "year";
pub const ODOMETER: &str = "odometer";
pub const CONDITION: &str = "condition";
pub const PRICE: &str = "price";
pub const CAR_AGE: &str = "Car_Age";

pub const NUMERIC_FEATURES: [&str; 2] = [CAR_AGE, ODOMETER];
pub const CATEGORICAL_FEATURES: [&str; 1] = [CONDITION];

const CHART_TITLE: &str = "Feature Importance in Lasso Regression";
const CHART_HALF_WIDTH: usize = 30;

/// Columns of the raw listings.
pub fn schema() -> Schema {
    Schema::new()
        .column(YEAR, ColumnKind::Numeric)
        .column(ODOMETER, ColumnKind::Numeric)
        .column(CONDITION, ColumnKind::Categorical)
        .column(PRICE, ColumnKind::Numeric)
}

/// Columns after cleaning, features first and the target last.
pub fn feature_schema() -> Schema {
    let schema = NUMERIC_FEATURES
        .iter()
        .fold(Schema::new(), |schema, &name| schema.column(name, ColumnKind::Numeric));
    CATEGORICAL_FEATURES
        .iter()
        .fold(schema, |schema, &name| schema.column(name, ColumnKind::Categorical))
        .column(PRICE, ColumnKind::Numeric)
}

/// First rows, column info and numeric summaries of the raw frame.
pub fn explore(df: &DataFrame, head_rows: usize) -> Result<String> {
    Ok(format!(
        "{}\n\n{}\n{}",
        df.head(Some(head_rows)),
        info(df),
        render_summaries(&describe(df)?)
    ))
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutlierSummary {
    pub column: String,
    pub count: usize,
    pub bounds: IqrBounds,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelEvaluation {
    pub model: String,
    pub metrics: RegressionMetrics,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CarPriceReport {
    pub rows_loaded: usize,
    pub rows_after_cleaning: usize,
    pub rows_after_outliers: usize,
    pub n_train: usize,
    pub n_test: usize,
    /// Counted on the cleaned rows, before either filter is applied.
    pub outliers: Vec<OutlierSummary>,
    pub models: Vec<ModelEvaluation>,
    pub lasso_coefficients: Vec<(String, f64)>,
}

impl fmt::Display for CarPriceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outlier in &self.outliers {
            writeln!(f, "{} outliers: {}", capitalize(&outlier.column), outlier.count)?;
        }
        writeln!(f)?;

        for evaluation in &self.models {
            writeln!(f, "{}", section(&evaluation.model))?;
            writeln!(f, "{}", evaluation.metrics)?;
            writeln!(f)?;
        }

        write!(
            f,
            "{}",
            bar_chart(CHART_TITLE, &self.lasso_coefficients, CHART_HALF_WIDTH)
        )
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn evaluate<R: Regressor>(
    pipeline: &mut RegressionPipeline<R>,
    train: &DataFrame,
    y_train: &Vector,
    test: &DataFrame,
    y_test: &Vector,
) -> Result<ModelEvaluation> {
    pipeline.fit(train, y_train)?;
    let y_pred = pipeline.predict(test)?;
    let metrics = RegressionMetrics::evaluate(y_test, &y_pred)?;

    info!("{}: R^2 = {:.4}", pipeline.name(), metrics.r2);
    Ok(ModelEvaluation {
        model: pipeline.name().to_string(),
        metrics,
    })
}

/// Cleans the raw frame and fits, evaluates and reports the three regressors.
///
/// Both outlier fences are computed on the cleaned rows before any filtering;
/// the odometer filter is applied first and the price filter, with its
/// precomputed fences, to what remains.
pub fn run(df: &DataFrame, config: &CarPriceConfig) -> Result<CarPriceReport> {
    config.validate()?;
    schema().validate(df)?;
    let rows_loaded = df.height();

    let cleaned = drop_missing_rows(df)?;
    let cleaned = derive_age(cleaned, YEAR, CAR_AGE, f64::from(config.reference_year))?
        .drop(YEAR)?;
    let features = feature_schema();
    features.validate(&cleaned)?;
    info!(
        "Cleaned data: {} of {} rows kept",
        cleaned.height(),
        rows_loaded
    );

    let (odometer_outliers, odometer_bounds) =
        detect_outliers(&cleaned, ODOMETER, config.iqr_multiplier)?;
    let (price_outliers, price_bounds) = detect_outliers(&cleaned, PRICE, config.iqr_multiplier)?;
    info!(
        "Odometer outliers: {}, price outliers: {}",
        odometer_outliers.len(),
        price_outliers.len()
    );

    let filtered = retain_within(&cleaned, ODOMETER, &odometer_bounds)?;
    let filtered = retain_within(&filtered, PRICE, &price_bounds)?;

    let split = TrainTestSplit::new(filtered.height(), config.test_size, config.random_state)?;
    let train = take_rows(&filtered, &split.train)?;
    let test = take_rows(&filtered, &split.test)?;
    let y_train = numeric_vector(&train, PRICE)?;
    let y_test = numeric_vector(&test, PRICE)?;
    info!("Split: {} train rows, {} test rows", train.height(), test.height());

    let transformer = || ColumnTransformer::from_schema(&features, &[PRICE]);

    let mut linear = RegressionPipeline::new(transformer(), LinearRegression::new());
    let mut ridge = RegressionPipeline::new(transformer(), Ridge::new().alpha(config.ridge_alpha));
    let mut lasso = RegressionPipeline::new(transformer(), Lasso::new().alpha(config.lasso_alpha));

    let models = vec![
        evaluate(&mut linear, &train, &y_train, &test, &y_test)?,
        evaluate(&mut ridge, &train, &y_train, &test, &y_test)?,
        evaluate(&mut lasso, &train, &y_train, &test, &y_test)?,
    ];

    Ok(CarPriceReport {
        rows_loaded,
        rows_after_cleaning: cleaned.height(),
        rows_after_outliers: filtered.height(),
        n_train: train.height(),
        n_test: test.height(),
        outliers: vec![
            OutlierSummary {
                column: ODOMETER.to_string(),
                count: odometer_outliers.len(),
                bounds: odometer_bounds,
            },
            OutlierSummary {
                column: PRICE.to_string(),
                count: price_outliers.len(),
                bounds: price_bounds,
            },
        ],
        models,
        lasso_coefficients: lasso.named_coefficients()?,
    })
}
