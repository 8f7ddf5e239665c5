use super::is_numeric;
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

/// Linear-interpolated quantile of the present values at `q` in `[0, 1]`,
/// taken at position `(n - 1) * q` of the sorted values.
pub fn quantile(values: &Float64Chunked, q: f64) -> Option<f64> {
    values.quantile(q, QuantileMethod::Linear).ok().flatten()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameInfo {
    pub n_rows: usize,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    fn from_values(name: &str, values: &Float64Chunked) -> Option<Self> {
        let count = values.len() - values.null_count();
        if count == 0 {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            count,
            mean: values.mean()?,
            // sample standard deviation, NaN for a single value
            std: values.std(1).unwrap_or(f64::NAN),
            min: values.min()?,
            q25: quantile(values, 0.25)?,
            median: quantile(values, 0.5)?,
            q75: quantile(values, 0.75)?,
            max: values.max()?,
        })
    }
}

pub fn info(df: &DataFrame) -> FrameInfo {
    FrameInfo {
        n_rows: df.height(),
        columns: df
            .get_columns()
            .iter()
            .map(|column| ColumnInfo {
                name: column.name().to_string(),
                non_null: column.len() - column.null_count(),
                dtype: column.dtype().to_string(),
            })
            .collect(),
    }
}

/// Summary statistics over the present values of every numeric column.
pub fn describe(df: &DataFrame) -> Result<Vec<ColumnSummary>> {
    let mut summaries = Vec::new();
    for column in df.get_columns() {
        if !is_numeric(column.dtype()) {
            continue;
        }
        let values = column.cast(&DataType::Float64)?;
        let values = values.as_materialized_series().f64()?;
        if let Some(summary) = ColumnSummary::from_values(column.name().as_str(), values) {
            summaries.push(summary);
        }
    }
    Ok(summaries)
}

impl fmt::Display for FrameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RangeIndex: {} entries", self.n_rows)?;
        writeln!(f, "Data columns (total {} columns):", self.columns.len())?;

        let width = self
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max("Column".len());

        writeln!(f, " #   {:<width$}  Non-Null Count  Dtype", "Column")?;
        for (i, column) in self.columns.iter().enumerate() {
            writeln!(
                f,
                " {:<3} {:<width$}  {:>5} non-null  {}",
                i, column.name, column.non_null, column.dtype
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ColumnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} {:>8} {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>12.3}",
            self.name,
            self.count,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max
        )
    }
}

/// Renders a `describe()` result as a table, one row per column.
pub fn render_summaries(summaries: &[ColumnSummary]) -> String {
    let mut out = format!(
        "{:<16} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for summary in summaries {
        out.push_str(&summary.to_string());
        out.push('\n');
    }
    out
}
