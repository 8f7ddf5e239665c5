//! Diabetes outcome classification.
//!
//! Physiologically impossible zeros are treated as missing and imputed with
//! the column mean, then a depth-limited decision tree is evaluated on a
//! hold-out split and a cross-validated grid search tunes its settings on the
//! training rows.

use crate::cleaning::{impute_mean, replace_with_missing};
use crate::config::{DiabetesConfig, JsonConfig};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::metrics::{ClassificationReport, ConfusionMatrix, accuracy_score};
use crate::model_selection::{GridSearchCv, GridSearchResult, StratifiedKFold};
use crate::frame::{describe, float_column, info, missing_counts, render_summaries};
use crate::schema::{ColumnKind, Remainder, Schema};
use crate::tree::{Classifier, DecisionTreeParams};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::fmt;
use tracing::info;

pub const TARGET: &str = "Outcome";

/// Measurements where a zero means "not recorded".
pub const ZERO_AS_MISSING: [&str; 5] = ["Glucose", "BloodPressure", "SkinThickness", "Insulin", "BMI"];

/// Display names of outcome 0 and outcome 1.
pub const CLASS_NAMES: [&str; 2] = ["Non-Diabetic", "Diabetic"];

pub fn schema() -> Schema {
    ZERO_AS_MISSING
        .iter()
        .fold(Schema::new(), |schema, &name| {
            schema.column(name, ColumnKind::Numeric)
        })
        .column(TARGET, ColumnKind::Numeric)
        .remainder(Remainder::Numeric)
}

/// Column info, numeric summaries and missing-value counts of the raw frame.
pub fn explore(df: &DataFrame) -> Result<String> {
    let mut out = format!("{}\n{}\n", info(df), render_summaries(&describe(df)?));
    let counts = missing_counts(df);
    let width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, missing) in counts {
        out.push_str(&format!("{name:<width$} {missing:>6}\n"));
    }
    Ok(out)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiabetesReport {
    pub n_samples: usize,
    pub n_train: usize,
    pub n_test: usize,
    /// Zero cells turned into missing and then imputed, per column.
    pub imputed: Vec<(String, usize)>,
    pub tree_params: DecisionTreeParams,
    pub accuracy: f64,
    pub confusion_matrix: ConfusionMatrix,
    pub classification_report: ClassificationReport,
    pub tree_text: String,
    pub feature_importances: Vec<(String, f64)>,
    pub grid_search: GridSearchResult<DecisionTreeParams>,
}

impl fmt::Display for DiabetesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decision tree ({}):", self.tree_params)?;
        writeln!(f, "{}", self.tree_text)?;
        writeln!(f, "Accuracy: {:.2}", self.accuracy)?;
        writeln!(f, "Confusion Matrix:")?;
        writeln!(f, "{}", self.confusion_matrix)?;
        writeln!(f, "\nClassification Report:")?;
        writeln!(f, "{}", self.classification_report)?;
        write!(f, "{}", self.grid_search)
    }
}

/// Imputes, splits, fits and evaluates the tree, then runs the grid search.
pub fn run(df: &DataFrame, config: &DiabetesConfig) -> Result<DiabetesReport> {
    config.validate()?;
    schema().validate(df)?;

    let marked = replace_with_missing(df.clone(), &ZERO_AS_MISSING, 0.0)?;
    let imputed_counts: Vec<(String, usize)> = ZERO_AS_MISSING
        .iter()
        .map(|&name| Ok((name.to_string(), float_column(&marked, name)?.null_count())))
        .collect::<Result<_>>()?;
    let imputed = impute_mean(marked, &ZERO_AS_MISSING)?;
    info!("Imputed zero readings: {:?}", imputed_counts);

    let dataset = Dataset::from_frame(&imputed, TARGET)?;
    let (train, test) = dataset.train_test_split(config.test_size, config.random_state)?;
    info!(
        "Split: {} train rows, {} test rows",
        train.n_samples(),
        test.n_samples()
    );

    let mut tree = config.tree.build(config.random_state);
    tree.fit(&train.features, &train.labels)?;
    let y_pred = tree.predict(&test.features)?;

    let accuracy = accuracy_score(&test.labels, &y_pred)?;
    info!("Decision tree hold-out accuracy: {:.4}", accuracy);

    let classes = tree.classes().unwrap_or_default();
    let confusion_matrix = ConfusionMatrix::with_labels(&test.labels, &y_pred, classes)?;
    let class_names: &[&str] = if classes.len() == CLASS_NAMES.len() {
        &CLASS_NAMES
    } else {
        &[]
    };
    let classification_report = ClassificationReport::from_confusion(&confusion_matrix, class_names)?;
    let tree_text = tree.export_text(&train.feature_names, class_names)?;

    let feature_importances = tree
        .feature_importances()
        .map(|importances| {
            train
                .feature_names
                .iter()
                .cloned()
                .zip(importances.iter().copied())
                .collect()
        })
        .unwrap_or_default();

    let search = GridSearchCv::new(config.grid.candidates(), StratifiedKFold::new(config.cv_folds));
    info!(
        "Grid search over {} candidates with {}-fold cross-validation",
        search.n_candidates(),
        config.cv_folds
    );
    let grid_search = search.fit(&train.features, &train.labels, |params| {
        params.build(config.random_state)
    })?;
    info!(
        "Best parameters: {} ({:.4})",
        grid_search.best_params, grid_search.best_score
    );

    Ok(DiabetesReport {
        n_samples: dataset.n_samples(),
        n_train: train.n_samples(),
        n_test: test.n_samples(),
        imputed: imputed_counts,
        tree_params: config.tree,
        accuracy,
        confusion_matrix,
        classification_report,
        tree_text,
        feature_importances,
        grid_search,
    })
}
