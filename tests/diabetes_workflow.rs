//! End-to-end tests of the diabetes workflow over a fixture CSV.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tabular_eda::cleaning::{impute_mean, replace_with_missing};
use tabular_eda::model_selection::{StratifiedKFold, cross_val_score};
use tabular_eda::tree::{DecisionTreeParams, ParamGrid};
use tabular_eda::workflows::diabetes::{self, CLASS_NAMES, TARGET, ZERO_AS_MISSING};
use polars::prelude::DataFrame;
use tabular_eda::frame::{self, numeric_vector};
use tabular_eda::{Criterion, Dataset, DiabetesConfig};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_patients() -> DataFrame {
    frame::read_csv(fixtures_path().join("diabetes.csv")).expect("Failed to read diabetes.csv")
}

fn imputed_patients() -> DataFrame {
    let marked = replace_with_missing(load_patients(), &ZERO_AS_MISSING, 0.0).unwrap();
    impute_mean(marked, &ZERO_AS_MISSING).unwrap()
}

fn small_grid() -> ParamGrid {
    ParamGrid {
        criterion: vec![Criterion::Gini, Criterion::Entropy],
        max_depth: vec![Some(2), None],
        min_samples_split: vec![2, 10],
    }
}

// ============================================================================
// Imputation
// ============================================================================

#[test]
fn test_load_and_schema() {
    let df = load_patients();

    assert_eq!(df.shape(), (100, 9));
    diabetes::schema().validate(&df).unwrap();
}

#[test]
fn test_zero_readings_are_imputed_with_mean() {
    let raw = load_patients();
    let imputed = imputed_patients();

    for &name in &ZERO_AS_MISSING {
        let before = numeric_vector(&raw, name).unwrap();
        let after = numeric_vector(&imputed, name).unwrap();

        let present: Vec<f64> = before.iter().copied().filter(|v| *v != 0.0).collect();
        let mean = present.iter().sum::<f64>() / present.len() as f64;

        assert!(after.iter().all(|v| *v != 0.0), "{} still has zeros", name);
        for (b, a) in before.iter().zip(after.iter()) {
            if *b == 0.0 {
                assert!((a - mean).abs() < 1e-9);
            } else {
                assert_eq!(a, b);
            }
        }
    }
}

#[test]
fn test_other_columns_untouched() {
    let raw = load_patients();
    let imputed = imputed_patients();

    for name in ["Pregnancies", "DiabetesPedigreeFunction", "Age", TARGET] {
        assert_eq!(
            numeric_vector(&raw, name).unwrap(),
            numeric_vector(&imputed, name).unwrap()
        );
    }
    // Pregnancies legitimately holds zeros
    assert!(
        numeric_vector(&imputed, "Pregnancies")
            .unwrap()
            .iter()
            .any(|v| *v == 0.0)
    );
}

#[test]
fn test_imputation_is_idempotent() {
    let once = imputed_patients();
    let twice = impute_mean(
        replace_with_missing(once.clone(), &ZERO_AS_MISSING, 0.0).unwrap(),
        &ZERO_AS_MISSING,
    )
    .unwrap();

    for &name in &ZERO_AS_MISSING {
        assert_eq!(
            numeric_vector(&once, name).unwrap(),
            numeric_vector(&twice, name).unwrap()
        );
    }
}

// ============================================================================
// Full Workflow
// ============================================================================

#[test]
fn test_run_reports_holdout_metrics() {
    let config = DiabetesConfig::default().grid(small_grid());
    let report = diabetes::run(&load_patients(), &config).unwrap();

    assert_eq!(report.n_samples, 100);
    assert_eq!(report.n_train, 80);
    assert_eq!(report.n_test, 20);
    assert_eq!(
        report.imputed,
        vec![
            ("Glucose".to_string(), 5),
            ("BloodPressure".to_string(), 7),
            ("SkinThickness".to_string(), 20),
            ("Insulin".to_string(), 57),
            ("BMI".to_string(), 8),
        ]
    );

    let total: usize = report.confusion_matrix.counts.iter().flatten().sum();
    assert_eq!(total, 20);
    let correct = report.confusion_matrix.counts[0][0] + report.confusion_matrix.counts[1][1];
    assert!((report.accuracy - correct as f64 / 20.0).abs() < 1e-12);

    let names: Vec<&str> = report
        .classification_report
        .classes
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, CLASS_NAMES.to_vec());
    assert_eq!(report.classification_report.macro_avg.support, 20);

    let importance: f64 = report.feature_importances.iter().map(|(_, v)| v).sum();
    assert!((importance - 1.0).abs() < 1e-9);
}

#[test]
fn test_tree_respects_max_depth() {
    let config = DiabetesConfig::default().grid(small_grid());
    let report = diabetes::run(&load_patients(), &config).unwrap();

    // depth 5 means at most six levels of "|---" prefixes
    let deepest = report
        .tree_text
        .lines()
        .map(|line| line.matches("|   ").count())
        .max()
        .unwrap();
    assert!(deepest <= 5);
    assert!(report.tree_text.starts_with("|--- "));
}

#[test]
fn test_grid_search_best_matches_its_scores() {
    let config = DiabetesConfig::default().grid(small_grid());
    let report = diabetes::run(&load_patients(), &config).unwrap();
    let search = &report.grid_search;

    assert_eq!(search.candidates.len(), 8);
    let best_mean = search
        .candidates
        .iter()
        .map(|c| c.mean_score)
        .fold(f64::MIN, f64::max);
    assert_eq!(search.best_score, best_mean);
    assert_eq!(search.candidates[search.best_index].rank, 1);
    assert_eq!(search.best_params, search.candidates[search.best_index].params);
    assert!(search.candidates.iter().all(|c| c.fold_scores.len() == 5));
}

#[test]
fn test_grid_search_scores_match_cross_val_score() {
    let dataset = Dataset::from_frame(&imputed_patients(), TARGET).unwrap();
    let (train, _) = dataset.train_test_split(0.2, 42).unwrap();

    let params = DecisionTreeParams {
        criterion: Criterion::Entropy,
        max_depth: Some(2),
        min_samples_split: 2,
    };
    let scores = cross_val_score(
        || params.build(42),
        &train.features,
        &train.labels,
        &StratifiedKFold::new(5),
    )
    .unwrap();

    let config = DiabetesConfig::default().grid(small_grid());
    let report = diabetes::run(&load_patients(), &config).unwrap();
    let candidate = report
        .grid_search
        .candidates
        .iter()
        .find(|c| c.params == params)
        .unwrap();

    assert_eq!(candidate.fold_scores, scores);
}

#[test]
fn test_default_grid_has_thirty_candidates() {
    let report = diabetes::run(&load_patients(), &DiabetesConfig::default()).unwrap();

    assert_eq!(report.grid_search.candidates.len(), 30);
    assert!(report.to_string().contains("Best parameters found: "));
}
