//! Row and cell level cleaning steps.
//!
//! Every step takes a [`DataFrame`] and returns a new one, so the stages of a
//! workflow can be chained without shared mutable state:
//!
//! ```rust
//! use polars::prelude::{Float64Chunked, NewChunkedArray};
//! use tabular_eda::cleaning::{drop_missing_rows, IqrBounds};
//! use tabular_eda::frame;
//!
//! let df = frame::read_csv_str("price,odometer\n1,10\n2,\n3,30\n").unwrap();
//! let df = drop_missing_rows(&df).unwrap();
//! assert_eq!(df.height(), 2);
//!
//! let prices = Float64Chunked::from_slice("price".into(), &[1.0, 2.0, 3.0, 4.0, 100.0]);
//! let bounds = IqrBounds::compute(&prices).unwrap();
//! assert_eq!((bounds.lower, bounds.upper), (-1.0, 7.0));
//! ```

use crate::error::{Error, Result};
use crate::frame::{float_column, quantile};
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Drops every row holding a missing cell in any column.
pub fn drop_missing_rows(df: &DataFrame) -> Result<DataFrame> {
    let cleaned = df.drop_nulls::<String>(None)?;
    debug!(
        "Dropped {} rows with missing values",
        df.height() - cleaned.height()
    );
    Ok(cleaned)
}

/// Appends `age_column = reference_year - year_column`.
pub fn derive_age(
    mut df: DataFrame,
    year_column: &str,
    age_column: &str,
    reference_year: f64,
) -> Result<DataFrame> {
    let ages: Float64Chunked = float_column(&df, year_column)?
        .into_iter()
        .map(|year| year.map(|y| reference_year - y))
        .collect();

    df.with_column(ages.with_name(age_column.into()).into_series())?;
    Ok(df)
}

/// Turns every cell equal to `value` in the named columns into a missing cell.
pub fn replace_with_missing(mut df: DataFrame, columns: &[&str], value: f64) -> Result<DataFrame> {
    for &name in columns {
        let values = float_column(&df, name)?;
        let replaced: Float64Chunked = values
            .into_iter()
            .map(|v| v.filter(|x| *x != value))
            .collect();

        debug!(
            "Marked {} cells equal to {} as missing in '{}'",
            replaced.null_count() - values.null_count(),
            value,
            name
        );
        df.replace(name, replaced.with_name(name.into()).into_series())?;
    }
    Ok(df)
}

/// Fills the missing cells of each named column with the mean of its present cells.
/// Other columns are left untouched.
pub fn impute_mean(mut df: DataFrame, columns: &[&str]) -> Result<DataFrame> {
    for &name in columns {
        let values = float_column(&df, name)?;
        let mean = values
            .mean()
            .ok_or_else(|| Error::NoValidValues(name.to_string()))?;
        let missing = values.null_count();

        let filled = values
            .clone()
            .into_series()
            .fill_null(FillNullStrategy::Mean)?;

        debug!(
            "Filled {} missing cells in '{}' with mean {:.4}",
            missing, name, mean
        );
        df.replace(name, filled)?;
    }
    Ok(df)
}

/// Tukey fences around the interquartile range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    pub const DEFAULT_MULTIPLIER: f64 = 1.5;

    pub fn compute(values: &Float64Chunked) -> Option<Self> {
        Self::with_multiplier(values, Self::DEFAULT_MULTIPLIER)
    }

    /// Quartiles of the present values; `None` when there are none.
    pub fn with_multiplier(values: &Float64Chunked, multiplier: f64) -> Option<Self> {
        let q1 = quantile(values, 0.25)?;
        let q3 = quantile(values, 0.75)?;
        let iqr = q3 - q1;

        Some(Self {
            q1,
            q3,
            iqr,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    /// Values sitting exactly on a fence are inside.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Row indices of the outliers in `column`, along with the fences used.
pub fn detect_outliers(
    df: &DataFrame,
    column: &str,
    multiplier: f64,
) -> Result<(Vec<usize>, IqrBounds)> {
    let values = float_column(df, column)?;
    let bounds = IqrBounds::with_multiplier(values, multiplier)
        .ok_or_else(|| Error::NoValidValues(column.to_string()))?;

    let outliers = values
        .into_iter()
        .enumerate()
        .filter_map(|(row, v)| match v {
            Some(x) if !bounds.contains(x) => Some(row),
            _ => None,
        })
        .collect();

    Ok((outliers, bounds))
}

/// Keeps rows whose `column` value lies within `bounds`. Missing cells are kept.
pub fn retain_within(df: &DataFrame, column: &str, bounds: &IqrBounds) -> Result<DataFrame> {
    let keep: Vec<bool> = float_column(df, column)?
        .into_iter()
        .map(|v| v.is_none_or(|x| bounds.contains(x)))
        .collect();

    let mask = BooleanChunked::from_slice("mask".into(), &keep);
    let filtered = df.filter(&mask)?;
    debug!(
        "Removed {} rows outside [{:.2}, {:.2}] in '{}'",
        df.height() - filtered.height(),
        bounds.lower,
        bounds.upper,
        column
    );
    Ok(filtered)
}
