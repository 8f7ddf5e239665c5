use crate::error::{Error, Result};
use crate::frame::{numeric_vector, to_matrix};
use crate::model_selection::TrainTestSplit;
use crate::{Matrix, Vector};
use ndarray::Axis;
use polars::prelude::DataFrame;

#[derive(Clone, Debug)]
pub struct Dataset {
    pub features: Matrix,
    pub labels: Vector,
    pub feature_names: Vec<String>,
}

impl Dataset {
    pub fn new(features: Matrix, labels: Vector) -> Result<Self> {
        let feature_names = (0..features.ncols()).map(|j| format!("x{j}")).collect();
        Self::with_feature_names(features, labels, feature_names)
    }

    pub fn with_feature_names(
        features: Matrix,
        labels: Vector,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(Error::DimensionMismatch {
                expected: features.nrows(),
                found: labels.len(),
            });
        }
        if feature_names.len() != features.ncols() {
            return Err(Error::DimensionMismatch {
                expected: features.ncols(),
                found: feature_names.len(),
            });
        }

        Ok(Self {
            features,
            labels,
            feature_names,
        })
    }

    /// Uses `target` as labels and every other column, in frame order, as a feature.
    pub fn from_frame(df: &DataFrame, target: &str) -> Result<Self> {
        let labels = numeric_vector(df, target)?;
        let names: Vec<&str> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .filter(|name| *name != target)
            .collect();
        let features = to_matrix(df, &names)?;

        Self::with_feature_names(
            features,
            labels,
            names.into_iter().map(str::to_string).collect(),
        )
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), rows),
            labels: self.labels.select(Axis(0), rows),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Shuffled split; the test part holds `ceil(test_size * n)` samples.
    pub fn train_test_split(&self, test_size: f64, random_state: u64) -> Result<(Self, Self)> {
        let split = TrainTestSplit::new(self.n_samples(), test_size, random_state)?;
        Ok((self.select(&split.train), self.select(&split.test)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dataset_creation() {
        let features = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let targets = array![1.0, 2.0, 3.0];

        let dataset = Dataset::new(features, targets).unwrap();
        assert_eq!(dataset.n_samples(), 3);
        assert_eq!(dataset.n_features(), 2);
    }

    #[test]
    fn test_dataset_mismatch() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let targets = array![1.0, 2.0, 3.0];

        assert!(Dataset::new(features, targets).is_err());
    }

    #[test]
    fn test_train_test_split() {
        let features = Matrix::zeros((100, 5));
        let targets = Vector::zeros(100);
        let dataset = Dataset::new(features, targets).unwrap();

        let (train, test) = dataset.train_test_split(0.2, 42).unwrap();
        assert_eq!(train.n_samples(), 80);
        assert_eq!(test.n_samples(), 20);
    }

    #[test]
    fn test_from_frame_drops_target() {
        let df = crate::frame::read_csv_str("Glucose,BMI,Outcome\n120,30.5,1\n90,22.1,0\n")
            .unwrap();
        let dataset = Dataset::from_frame(&df, "Outcome").unwrap();

        assert_eq!(dataset.feature_names, vec!["Glucose", "BMI"]);
        assert_eq!(dataset.features, array![[120.0, 30.5], [90.0, 22.1]]);
        assert_eq!(dataset.labels, array![1.0, 0.0]);
    }
}
