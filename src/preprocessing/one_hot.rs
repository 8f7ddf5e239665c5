use super::Transformer;
use crate::Matrix;
use crate::error::{Error, Result};
use crate::frame::text_column;
use polars::prelude::DataFrame;
use tracing::debug;

/// Indicator encoding of text columns.
///
/// Categories are the sorted distinct values seen during `fit`. With
/// `drop_first` the smallest category of each column gets no indicator, so a
/// column with `k` categories yields `k - 1` output columns and its dropped
/// category encodes as all zeros. Values not seen during `fit` are rejected.
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    columns: Vec<String>,
    drop_first: bool,
    categories: Option<Vec<Vec<String>>>,
}

impl OneHotEncoder {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            drop_first: true,
            categories: None,
        }
    }

    pub fn drop_first(mut self, drop_first: bool) -> Self {
        self.drop_first = drop_first;
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Learned categories per input column, sorted.
    pub fn categories(&self) -> Option<&[Vec<String>]> {
        self.categories.as_deref()
    }

    /// The category of each column that encodes as all zeros.
    pub fn dropped_categories(&self) -> Result<Vec<&str>> {
        let categories = self.fitted()?;
        if !self.drop_first {
            return Ok(Vec::new());
        }
        Ok(categories
            .iter()
            .filter_map(|cats| cats.first().map(String::as_str))
            .collect())
    }

    pub fn n_features_out(&self) -> Result<usize> {
        Ok(self
            .fitted()?
            .iter()
            .map(|cats| cats.len().saturating_sub(self.skip()))
            .sum())
    }

    fn fitted(&self) -> Result<&[Vec<String>]> {
        self.categories
            .as_deref()
            .ok_or(Error::NotFitted("OneHotEncoder"))
    }

    fn skip(&self) -> usize {
        usize::from(self.drop_first)
    }

    fn present_values<'a>(df: &'a DataFrame, column: &str) -> Result<Vec<&'a str>> {
        text_column(df, column)?
            .into_iter()
            .map(|value| {
                value.ok_or_else(|| Error::ColumnType {
                    column: column.to_string(),
                    expected: "text with no missing values",
                })
            })
            .collect()
    }
}

impl Transformer for OneHotEncoder {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let mut categories = Vec::with_capacity(self.columns.len());

        for column in &self.columns {
            let mut values: Vec<String> = Self::present_values(df, column)?
                .into_iter()
                .map(str::to_string)
                .collect();
            values.sort();
            values.dedup();

            if values.is_empty() {
                return Err(Error::NoValidValues(column.clone()));
            }
            debug!("Column '{}': {} categories", column, values.len());
            categories.push(values);
        }

        self.categories = Some(categories);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<Matrix> {
        let categories = self.fitted()?;
        let skip = self.skip();
        let mut encoded = Matrix::zeros((df.height(), self.n_features_out()?));

        let mut offset = 0;
        for (column, cats) in self.columns.iter().zip(categories) {
            let values = Self::present_values(df, column)?;

            for (row, value) in values.into_iter().enumerate() {
                let idx = cats.binary_search_by(|c| c.as_str().cmp(value)).map_err(|_| {
                    Error::UnknownCategory {
                        column: column.clone(),
                        value: value.to_string(),
                    }
                })?;
                if idx >= skip {
                    encoded[(row, offset + idx - skip)] = 1.0;
                }
            }

            offset += cats.len().saturating_sub(skip);
        }

        Ok(encoded)
    }

    fn feature_names_out(&self) -> Result<Vec<String>> {
        let categories = self.fitted()?;
        Ok(self
            .columns
            .iter()
            .zip(categories)
            .flat_map(|(column, cats)| {
                cats.iter()
                    .skip(self.skip())
                    .map(move |cat| format!("{column}_{cat}"))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn conditions(values: &str) -> DataFrame {
        let csv = format!("condition\n{}\n", values.replace(' ', "\n"));
        crate::frame::read_csv_str(&csv).unwrap()
    }

    #[test]
    fn test_drop_first_shape() {
        let df = conditions("good fair excellent good like_new");
        let mut encoder = OneHotEncoder::new(["condition"]);

        let encoded = encoder.fit_transform(&df).unwrap();
        // four categories, first dropped
        assert_eq!(encoded.shape(), &[5, 3]);
        assert_eq!(
            encoder.feature_names_out().unwrap(),
            vec!["condition_fair", "condition_good", "condition_like_new"]
        );
        assert_eq!(
            encoded,
            array![
                [0.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0]
            ]
        );
    }

    #[test]
    fn test_dropped_category_is_reproducible() {
        let mut a = OneHotEncoder::new(["condition"]);
        let mut b = OneHotEncoder::new(["condition"]);
        a.fit(&conditions("good fair excellent")).unwrap();
        b.fit(&conditions("excellent good fair fair")).unwrap();

        assert_eq!(a.dropped_categories().unwrap(), vec!["excellent"]);
        assert_eq!(b.dropped_categories().unwrap(), vec!["excellent"]);
    }

    #[test]
    fn test_keep_all_categories() {
        let df = conditions("b a");
        let mut encoder = OneHotEncoder::new(["condition"]).drop_first(false);

        let encoded = encoder.fit_transform(&df).unwrap();
        assert_eq!(encoded, array![[0.0, 1.0], [1.0, 0.0]]);
        assert!(encoder.dropped_categories().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_category() {
        let mut encoder = OneHotEncoder::new(["condition"]);
        encoder.fit(&conditions("good fair")).unwrap();

        let err = encoder.transform(&conditions("salvage")).unwrap_err();
        assert!(matches!(err, Error::UnknownCategory { ref value, .. } if value == "salvage"));
    }

    #[test]
    fn test_numeric_column_rejected() {
        let df = crate::frame::read_csv_str("year\n2010\n2012\n").unwrap();
        let mut encoder = OneHotEncoder::new(["year"]);

        assert!(matches!(
            encoder.fit(&df),
            Err(Error::ColumnType { .. })
        ));
    }

    #[test]
    fn test_transform_before_fit() {
        let encoder = OneHotEncoder::new(["condition"]);
        assert!(encoder.transform(&conditions("good")).is_err());
    }
}
