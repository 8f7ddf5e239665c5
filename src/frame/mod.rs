//! CSV loading and typed column access over polars data frames.
//!
//! Integer columns are widened to `f64` on load, so every numeric column of a
//! loaded frame is `Float64` and every other column is left as read. Cleaning
//! steps take a frame and hand back a new one.
//!
//! ```rust
//! use tabular_eda::frame;
//!
//! let csv = "year,condition,price\n2015,good,9000\n,fair,4000\n";
//! let df = frame::read_csv_str(csv).unwrap();
//!
//! assert_eq!(df.shape(), (2, 3));
//! let years: Vec<Option<f64>> = frame::float_column(&df, "year").unwrap().into_iter().collect();
//! assert_eq!(years, vec![Some(2015.0), None]);
//! ```

mod summary;

pub use summary::{ColumnInfo, ColumnSummary, FrameInfo, describe, info, quantile, render_summaries};

use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Cell spellings read as missing, on top of empty fields.
pub const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None", "<NA>"];

fn read_options() -> CsvReadOptions {
    let markers = MISSING_MARKERS.iter().map(|&marker| marker.into()).collect();

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(
            CsvParseOptions::default().with_null_values(Some(NullValues::AllColumns(markers))),
        )
}

/// Reads a headed CSV file. The file handle is released before this returns,
/// on success and on error alike.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let path = path.as_ref();
    let df = read_options()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    let df = numeric_as_float(df)?;

    debug!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Same as [`read_csv`] over in-memory text.
pub fn read_csv_str(text: &str) -> Result<DataFrame> {
    let df = read_options()
        .into_reader_with_file_handle(Cursor::new(text.to_string()))
        .finish()?;
    numeric_as_float(df)
}

fn numeric_as_float(df: DataFrame) -> Result<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| {
            if column.dtype().is_integer() {
                column.cast(&DataType::Float64)
            } else {
                Ok(column.clone())
            }
        })
        .collect::<PolarsResult<Vec<Column>>>()?;

    Ok(DataFrame::new(columns)?)
}

pub fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_float() || dtype.is_integer()
}

pub fn get_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| Error::MissingColumn(name.to_string()))
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

pub fn float_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked> {
    let column = get_column(df, name)?;
    if column.dtype() != &DataType::Float64 {
        return Err(Error::ColumnType {
            column: name.to_string(),
            expected: "numeric",
        });
    }
    Ok(column.as_materialized_series().f64()?)
}

pub fn text_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    let column = get_column(df, name)?;
    if column.dtype() != &DataType::String {
        return Err(Error::ColumnType {
            column: name.to_string(),
            expected: "text",
        });
    }
    Ok(column.as_materialized_series().str()?)
}

fn require_complete(df: &DataFrame, name: &str) -> Result<()> {
    if float_column(df, name)?.null_count() > 0 {
        return Err(Error::ColumnType {
            column: name.to_string(),
            expected: "numeric with no missing values",
        });
    }
    Ok(())
}

/// Dense numeric column; any missing cell is an error.
pub fn numeric_vector(df: &DataFrame, name: &str) -> Result<Vector> {
    require_complete(df, name)?;
    Ok(float_column(df, name)?.into_no_null_iter().collect())
}

/// Dense matrix of the named numeric columns, in the order given.
pub fn to_matrix(df: &DataFrame, names: &[&str]) -> Result<Matrix> {
    if names.is_empty() {
        return Ok(Matrix::zeros((df.height(), 0)));
    }
    for name in names {
        require_complete(df, name)?;
    }

    let selected = df.select(names.iter().copied())?;
    Ok(selected.to_ndarray::<Float64Type>(IndexOrder::C)?)
}

/// Rows at `rows`, in that order.
pub fn take_rows(df: &DataFrame, rows: &[usize]) -> Result<DataFrame> {
    let indices = IdxCa::from_vec(
        "rows".into(),
        rows.iter().map(|&row| row as IdxSize).collect(),
    );
    Ok(df.take(&indices)?)
}

pub fn missing_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|column| (column.name().to_string(), column.null_count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const CARS: &str = "\
year,odometer,condition,price
2015,52000,good,12000
2010,,fair,6000
2018,30000,NA,18000
";

    fn cars() -> DataFrame {
        read_csv_str(CARS).unwrap()
    }

    #[test]
    fn test_read_widens_integers_and_marks_missing() {
        let df = cars();

        assert_eq!(df.shape(), (3, 4));
        assert_eq!(get_column(&df, "year").unwrap().dtype(), &DataType::Float64);
        assert_eq!(get_column(&df, "condition").unwrap().dtype(), &DataType::String);
        assert_eq!(float_column(&df, "odometer").unwrap().get(1), None);
        assert_eq!(text_column(&df, "condition").unwrap().get(2), None);
    }

    #[test]
    fn test_missing_counts() {
        let counts = missing_counts(&cars());

        assert_eq!(counts[0], ("year".to_string(), 0));
        assert_eq!(counts[1], ("odometer".to_string(), 1));
        assert_eq!(counts[2], ("condition".to_string(), 1));
    }

    #[test]
    fn test_missing_column() {
        let df = cars();
        assert!(matches!(get_column(&df, "mileage"), Err(Error::MissingColumn(_))));
        assert!(matches!(
            float_column(&df, "condition"),
            Err(Error::ColumnType { .. })
        ));
        assert!(!has_column(&df, "mileage"));
    }

    #[test]
    fn test_to_matrix_rejects_missing() {
        let df = cars();
        assert!(to_matrix(&df, &["year", "odometer"]).is_err());

        let m = to_matrix(&df, &["year", "price"]).unwrap();
        assert_eq!(m, array![[2015.0, 12000.0], [2010.0, 6000.0], [2018.0, 18000.0]]);
        assert_eq!(to_matrix(&df, &[]).unwrap().shape(), &[3, 0]);
    }

    #[test]
    fn test_take_rows_keeps_order() {
        let subset = take_rows(&cars(), &[2, 0]).unwrap();

        assert_eq!(subset.height(), 2);
        assert_eq!(numeric_vector(&subset, "year").unwrap(), array![2018.0, 2015.0]);
    }

    #[test]
    fn test_float_frame_is_displayed() {
        let rendered = cars().head(Some(2)).to_string();

        assert!(rendered.contains("condition"));
        assert!(rendered.contains("2015.0"));
    }
}
