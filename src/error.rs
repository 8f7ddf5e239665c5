//! Error type shared by every stage of the workflows.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A column the caller referenced is absent from the frame.
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("Column '{column}' must be {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Not enough data: {0}")]
    EmptyData(String),

    /// `transform`/`predict` called before `fit`.
    #[error("{0} not fitted. Call fit() first.")]
    NotFitted(&'static str),

    #[error("Matrix is singular or nearly singular")]
    SingularMatrix,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Found unknown category '{value}' in column '{column}' during transform")]
    UnknownCategory { column: String, value: String },

    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),
}
