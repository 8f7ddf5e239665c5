use super::{OneHotEncoder, StandardScaler, Transformer};
use crate::Matrix;
use crate::error::{Error, Result};
use crate::frame::to_matrix;
use crate::schema::{ColumnKind, Schema};
use ndarray::s;
use polars::prelude::DataFrame;

/// Scales numeric columns and one-hot encodes categorical columns.
///
/// Output is the scaled numeric block followed by the encoded block. Columns
/// named in neither list are dropped.
#[derive(Clone, Debug)]
pub struct ColumnTransformer {
    numeric: Vec<String>,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    fitted: bool,
}

impl ColumnTransformer {
    pub fn new() -> Self {
        Self {
            numeric: Vec::new(),
            scaler: StandardScaler::new(),
            encoder: OneHotEncoder::new(Vec::<String>::new()),
            fitted: false,
        }
    }

    /// Numeric and categorical columns as the schema declares them, minus `exclude`.
    pub fn from_schema(schema: &Schema, exclude: &[&str]) -> Self {
        let pick = |kind: ColumnKind| -> Vec<String> {
            schema
                .columns()
                .iter()
                .filter(|spec| spec.kind == kind && !exclude.contains(&spec.name.as_str()))
                .map(|spec| spec.name.clone())
                .collect()
        };

        Self::new()
            .numeric(pick(ColumnKind::Numeric))
            .categorical(pick(ColumnKind::Categorical))
    }

    pub fn numeric<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Categorical columns are encoded with their first category dropped.
    pub fn categorical<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.encoder = OneHotEncoder::new(columns);
        self
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric
    }

    pub fn categorical_columns(&self) -> &[String] {
        self.encoder.columns()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    fn numeric_block(&self, df: &DataFrame) -> Result<Matrix> {
        let names: Vec<&str> = self.numeric.iter().map(String::as_str).collect();
        to_matrix(df, &names)
    }
}

impl Default for ColumnTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for ColumnTransformer {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        if self.numeric.is_empty() && self.encoder.columns().is_empty() {
            return Err(Error::InvalidParameter(
                "ColumnTransformer needs at least one column".to_string(),
            ));
        }

        self.scaler.fit(&self.numeric_block(df)?)?;
        self.encoder.fit(df)?;
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<Matrix> {
        if !self.fitted {
            return Err(Error::NotFitted("ColumnTransformer"));
        }

        let scaled = self.scaler.transform(&self.numeric_block(df)?)?;
        let encoded = self.encoder.transform(df)?;

        let split = scaled.ncols();
        let mut out = Matrix::zeros((df.height(), split + encoded.ncols()));
        out.slice_mut(s![.., ..split]).assign(&scaled);
        out.slice_mut(s![.., split..]).assign(&encoded);
        Ok(out)
    }

    fn feature_names_out(&self) -> Result<Vec<String>> {
        if !self.fitted {
            return Err(Error::NotFitted("ColumnTransformer"));
        }

        let mut names = self.numeric.clone();
        names.extend(self.encoder.feature_names_out()?);
        Ok(names)
    }
}
