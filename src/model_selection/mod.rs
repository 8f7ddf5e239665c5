//! Data splitting, cross-validation and hyperparameter search.
//!
//! - `TrainTestSplit`: seeded shuffled hold-out split of row indices
//! - `StratifiedKFold`: class-balanced folds for classifiers
//! - `cross_val_score`: per-fold accuracy of a freshly built classifier
//! - `GridSearchCv`: exhaustive search over a list of candidate parameters
//!
//! # Examples
//!
//! ```rust
//! use tabular_eda::TrainTestSplit;
//!
//! let split = TrainTestSplit::new(10, 0.2, 0).unwrap();
//! assert_eq!(split.test.len(), 2);
//! assert_eq!(split.train.len(), 8);
//! ```

mod grid_search;
mod kfold;
mod split;

pub use grid_search::{CandidateScore, GridSearchCv, GridSearchResult, cross_val_score};
pub use kfold::{Fold, StratifiedKFold};
pub use split::TrainTestSplit;
