//! Exploratory tabular modelling for two datasets.
//!
//! The crate holds the building blocks (polars frame loading, schemas, cleaning steps,
//! scalers and encoders, linear models, decision trees, cross-validation) and
//! two end-to-end workflows that chain them:
//!
//! - [`workflows::car_price`]: used-car price regression with OLS, Ridge and Lasso.
//! - [`workflows::diabetes`]: diabetes outcome classification with a decision
//!   tree and a cross-validated grid search.
//!
//! ```rust
//! use tabular_eda::{LinearRegression, Regressor};
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0], [3.0]];
//! let y = array![2.0, 4.0, 6.0];
//!
//! let mut model = LinearRegression::new();
//! model.fit(&x, &y).unwrap();
//! let predictions = model.predict(&x).unwrap();
//! assert!((predictions[2] - 6.0).abs() < 1e-9);
//! ```

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod cleaning;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod frame;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod preprocessing;
pub mod report;
pub mod schema;
pub mod tree;
pub mod workflows;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

pub use config::{CarPriceConfig, DiabetesConfig, JsonConfig};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use linear_model::{Lasso, LinearRegression, Regressor, Ridge};
pub use metrics::{ClassificationReport, ConfusionMatrix, RegressionMetrics};
pub use model_selection::{GridSearchCv, GridSearchResult, StratifiedKFold, TrainTestSplit};
pub use pipeline::RegressionPipeline;
pub use preprocessing::{ColumnTransformer, OneHotEncoder, StandardScaler};
pub use schema::{ColumnKind, Schema};
pub use tree::{Classifier, Criterion, DecisionTreeClassifier};
