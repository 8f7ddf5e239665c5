//! Feature preprocessing.
//!
//! This module provides:
//! - `StandardScaler`: Centers columns and scales them to unit variance
//! - `OneHotEncoder`: Expands text columns into indicator columns
//! - `ColumnTransformer`: Scales the numeric columns of a frame and encodes
//!   its categorical ones into a single feature matrix
//!
//! Every transformer learns its state in `fit` and only applies it in
//! `transform`, so statistics seen on training rows are reused unchanged for
//! test rows.
//!
//! # Examples
//!
//! ```rust
//! use tabular_eda::preprocessing::Transformer;
//! use tabular_eda::{ColumnTransformer, frame};
//!
//! let train = frame::read_csv_str(
//!     "odometer,condition\n10,good\n20,fair\n30,excellent\n",
//! ).unwrap();
//!
//! let mut transformer = ColumnTransformer::new()
//!     .numeric(["odometer"])
//!     .categorical(["condition"]);
//! let x = transformer.fit_transform(&train).unwrap();
//!
//! // one scaled column plus two indicators ("excellent" is dropped)
//! assert_eq!(x.ncols(), 3);
//! assert_eq!(
//!     transformer.feature_names_out().unwrap(),
//!     vec!["odometer", "condition_fair", "condition_good"]
//! );
//! ```

mod column_transformer;
mod one_hot;
mod scaler;

pub use column_transformer::ColumnTransformer;
pub use one_hot::OneHotEncoder;
pub use scaler::StandardScaler;

use crate::Matrix;
use crate::error::Result;
use polars::prelude::DataFrame;

/// A frame-to-matrix step with learned state.
pub trait Transformer {
    fn fit(&mut self, df: &DataFrame) -> Result<()>;

    fn transform(&self, df: &DataFrame) -> Result<Matrix>;

    /// Names of the output columns, in matrix order.
    fn feature_names_out(&self) -> Result<Vec<String>>;

    fn fit_transform(&mut self, df: &DataFrame) -> Result<Matrix> {
        self.fit(df)?;
        self.transform(df)
    }
}
