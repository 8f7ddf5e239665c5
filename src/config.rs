//! Workflow settings.
//!
//! Both configurations default to the constants the analyses are run with and
//! can be overridden from a JSON file; absent keys keep their default.
//!
//! ```rust
//! use tabular_eda::{CarPriceConfig, JsonConfig};
//!
//! let config = CarPriceConfig::default().lasso_alpha(0.5);
//! assert_eq!(config.reference_year, 2024);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{Error, Result};
use crate::tree::{Criterion, DecisionTreeParams, ParamGrid};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn check_test_size(test_size: f64) -> Result<()> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::InvalidParameter(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }
    Ok(())
}

/// Settings that start from their defaults and can be overridden by a JSON file.
pub trait JsonConfig: Default + DeserializeOwned {
    /// Rejects settings the workflow cannot run with.
    fn validate(&self) -> Result<()>;

    /// Reads and validates the file; absent keys keep their default.
    fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

/// Settings of the used-car price regression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarPriceConfig {
    /// `Car_Age` is `reference_year - year`.
    pub reference_year: i32,
    pub test_size: f64,
    pub random_state: u64,
    pub ridge_alpha: f64,
    pub lasso_alpha: f64,
    /// Width of the outlier fences in IQRs.
    pub iqr_multiplier: f64,
    /// Rows shown by the exploration step.
    pub head_rows: usize,
}

impl Default for CarPriceConfig {
    fn default() -> Self {
        Self {
            reference_year: 2024,
            test_size: 0.2,
            random_state: 0,
            ridge_alpha: 1.0,
            lasso_alpha: 0.1,
            iqr_multiplier: 1.5,
            head_rows: 5,
        }
    }
}

impl CarPriceConfig {
    pub fn reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    pub fn test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn ridge_alpha(mut self, alpha: f64) -> Self {
        self.ridge_alpha = alpha;
        self
    }

    pub fn lasso_alpha(mut self, alpha: f64) -> Self {
        self.lasso_alpha = alpha;
        self
    }

    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }
}

impl JsonConfig for CarPriceConfig {
    fn validate(&self) -> Result<()> {
        check_test_size(self.test_size)?;
        if self.ridge_alpha < 0.0 || self.lasso_alpha < 0.0 {
            return Err(Error::InvalidParameter(
                "regularization strengths must be non-negative".to_string(),
            ));
        }
        if self.iqr_multiplier < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "iqr_multiplier must be non-negative, got {}",
                self.iqr_multiplier
            )));
        }
        Ok(())
    }
}

/// Settings of the diabetes classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiabetesConfig {
    pub test_size: f64,
    pub random_state: u64,
    /// The tree evaluated on the hold-out rows.
    pub tree: DecisionTreeParams,
    pub cv_folds: usize,
    pub grid: ParamGrid,
}

impl Default for DiabetesConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
            tree: DecisionTreeParams {
                criterion: Criterion::Gini,
                max_depth: Some(5),
                min_samples_split: 2,
            },
            cv_folds: 5,
            grid: ParamGrid::default(),
        }
    }
}

impl DiabetesConfig {
    pub fn test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn tree(mut self, tree: DecisionTreeParams) -> Self {
        self.tree = tree;
        self
    }

    pub fn cv_folds(mut self, folds: usize) -> Self {
        self.cv_folds = folds;
        self
    }

    pub fn grid(mut self, grid: ParamGrid) -> Self {
        self.grid = grid;
        self
    }
}

impl JsonConfig for DiabetesConfig {
    fn validate(&self) -> Result<()> {
        check_test_size(self.test_size)?;
        if self.cv_folds < 2 {
            return Err(Error::InvalidParameter(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        if self.grid.is_empty() {
            return Err(Error::InvalidParameter(
                "grid must have at least one value per parameter".to_string(),
            ));
        }

        let candidates = self.grid.candidates();
        for params in std::iter::once(&self.tree).chain(&candidates) {
            if params.max_depth == Some(0) || params.min_samples_split < 2 {
                return Err(Error::InvalidParameter(format!(
                    "invalid tree settings: {}",
                    params
                )));
            }
        }
        Ok(())
    }
}
