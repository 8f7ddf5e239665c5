//! Decision trees for classification.
//!
//! This module provides:
//! - `DecisionTreeClassifier`: CART tree with Gini or entropy splits
//! - `DecisionTreeParams` / `ParamGrid`: the tunable settings of a tree and
//!   an exhaustive grid over them
//! - `Classifier`: the contract shared with cross-validation
//!
//! # Examples
//!
//! ```rust
//! use tabular_eda::{Classifier, Criterion, DecisionTreeClassifier};
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
//! let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
//!
//! let mut tree = DecisionTreeClassifier::new()
//!     .max_depth(Some(5))
//!     .criterion(Criterion::Gini)
//!     .random_state(42);
//! tree.fit(&x, &y).unwrap();
//!
//! assert_eq!(tree.predict(&array![[2.5], [11.5]]).unwrap(), array![0.0, 1.0]);
//! ```

mod decision_tree;
mod export;
mod params;

pub use decision_tree::DecisionTreeClassifier;
pub use params::{DecisionTreeParams, ParamGrid};

use crate::error::Result;
use crate::metrics::accuracy_score;
use crate::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared contract of the classification models.
pub trait Classifier {
    fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()>;

    fn predict(&self, x: &Matrix) -> Result<Vector>;

    fn name(&self) -> &'static str;

    /// Mean accuracy on the given samples.
    fn score(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        let y_pred = self.predict(x)?;
        accuracy_score(y, &y_pred)
    }
}

/// Node impurity measure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    #[default]
    Gini,
    Entropy,
}

impl Criterion {
    /// Impurity of a node holding `counts[k]` samples of class `k`.
    pub fn impurity(self, counts: &[usize]) -> f64 {
        let total: usize = counts.iter().sum();
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;

        match self {
            Criterion::Gini => {
                1.0 - counts
                    .iter()
                    .map(|&c| {
                        let p = c as f64 / total;
                        p * p
                    })
                    .sum::<f64>()
            }
            Criterion::Entropy => counts
                .iter()
                .filter(|&&c| c > 0)
                .map(|&c| {
                    let p = c as f64 / total;
                    -p * p.log2()
                })
                .sum(),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Gini => write!(f, "gini"),
            Criterion::Entropy => write!(f, "entropy"),
        }
    }
}
