use crate::Vector;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

fn check_lengths(y_true: &Vector, y_pred: &Vector) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(Error::DimensionMismatch {
            expected: y_true.len(),
            found: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(Error::EmptyData("metrics need at least one sample".to_string()));
    }
    Ok(())
}

pub fn mean_squared_error(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let diff = y_true - y_pred;
    Ok(diff.mapv(|x| x * x).sum() / y_true.len() as f64)
}

pub fn mean_absolute_error(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let diff = y_true - y_pred;
    Ok(diff.mapv(f64::abs).sum() / y_true.len() as f64)
}

/// Coefficient of determination. A constant target scores 1.0 when predicted
/// exactly and 0.0 otherwise.
pub fn r2_score(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let y_mean = y_true.sum() / y_true.len() as f64;
    let ss_res = (y_true - y_pred).mapv(|x| x * x).sum();
    let ss_tot = y_true.mapv(|x| (x - y_mean) * (x - y_mean)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}

pub fn accuracy_score(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn evaluate(y_true: &Vector, y_pred: &Vector) -> Result<Self> {
        let mse = mean_squared_error(y_true, y_pred)?;
        Ok(Self {
            mae: mean_absolute_error(y_true, y_pred)?,
            mse,
            rmse: mse.sqrt(),
            r2: r2_score(y_true, y_pred)?,
        })
    }
}

impl fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mean Absolute Error: {:.2}", self.mae)?;
        writeln!(f, "Mean Squared Error: {:.2}", self.mse)?;
        writeln!(f, "Root Mean Squared Error: {:.2}", self.rmse)?;
        write!(f, "R^2 Score: {:.2}", self.r2)
    }
}

fn sorted_labels(y_true: &Vector, y_pred: &Vector) -> Vec<f64> {
    let mut labels: Vec<f64> = y_true.iter().chain(y_pred.iter()).copied().collect();
    labels.sort_by(f64::total_cmp);
    labels.dedup();
    labels
}

/// Rows are true classes, columns predicted classes, both in sorted label order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<f64>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Uses the sorted labels present in either vector.
    pub fn new(y_true: &Vector, y_pred: &Vector) -> Result<Self> {
        let labels = sorted_labels(y_true, y_pred);
        Self::with_labels(y_true, y_pred, &labels)
    }

    /// Uses a fixed label set, so classes absent from both vectors still get a row.
    pub fn with_labels(y_true: &Vector, y_pred: &Vector, labels: &[f64]) -> Result<Self> {
        check_lengths(y_true, y_pred)?;

        let index = |v: &f64| {
            labels.iter().position(|l| l == v).ok_or_else(|| {
                Error::InvalidParameter(format!("label {} is not one of {:?}", v, labels))
            })
        };

        let mut counts = vec![vec![0usize; labels.len()]; labels.len()];
        for (t, p) in y_true.iter().zip(y_pred.iter()) {
            counts[index(t)?][index(p)?] += 1;
        }

        Ok(Self {
            labels: labels.to_vec(),
            counts,
        })
    }

    fn true_positives(&self, k: usize) -> usize {
        self.counts[k][k]
    }

    fn support(&self, k: usize) -> usize {
        self.counts[k].iter().sum()
    }

    fn predicted(&self, k: usize) -> usize {
        self.counts.iter().map(|row| row[k]).sum()
    }

    fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);

        for (i, row) in self.counts.iter().enumerate() {
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i + 1 == self.counts.len() { "]]" } else { "]" };
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            write!(f, "{open}{}{close}", cells.join(" "))?;
            if i + 1 < self.counts.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class precision, recall and F1 plus accuracy, macro and weighted averages.
/// A ratio with a zero denominator counts as 0.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl ClassificationReport {
    /// `target_names` label the classes in sorted order; label values are used when empty.
    pub fn new(y_true: &Vector, y_pred: &Vector, target_names: &[&str]) -> Result<Self> {
        let matrix = ConfusionMatrix::new(y_true, y_pred)?;
        Self::from_confusion(&matrix, target_names)
    }

    pub fn from_confusion(matrix: &ConfusionMatrix, target_names: &[&str]) -> Result<Self> {
        let n_classes = matrix.labels.len();
        if !target_names.is_empty() && target_names.len() != n_classes {
            return Err(Error::DimensionMismatch {
                expected: n_classes,
                found: target_names.len(),
            });
        }

        let classes: Vec<ClassMetrics> = (0..n_classes)
            .map(|k| {
                let tp = matrix.true_positives(k);
                let precision = ratio(tp, matrix.predicted(k));
                let recall = ratio(tp, matrix.support(k));
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                let name = target_names
                    .get(k)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| matrix.labels[k].to_string());

                ClassMetrics {
                    name,
                    precision,
                    recall,
                    f1,
                    support: matrix.support(k),
                }
            })
            .collect();

        let total = matrix.total();
        let correct: usize = (0..n_classes).map(|k| matrix.true_positives(k)).sum();

        let average = |name: &str, weight: &dyn Fn(&ClassMetrics) -> f64| {
            let norm: f64 = classes.iter().map(weight).sum();
            let avg = |metric: fn(&ClassMetrics) -> f64| {
                if norm == 0.0 {
                    0.0
                } else {
                    classes.iter().map(|c| metric(c) * weight(c)).sum::<f64>() / norm
                }
            };
            ClassMetrics {
                name: name.to_string(),
                precision: avg(|c| c.precision),
                recall: avg(|c| c.recall),
                f1: avg(|c| c.f1),
                support: total,
            }
        };

        let macro_avg = average("macro avg", &|_| 1.0);
        let weighted_avg = average("weighted avg", &|c| c.support as f64);

        Ok(Self {
            classes,
            accuracy: ratio(correct, total),
            macro_avg,
            weighted_avg,
        })
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.name.len())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;

        let row = |f: &mut fmt::Formatter<'_>, c: &ClassMetrics| {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.name, c.precision, c.recall, c.f1, c.support
            )
        };

        for class in &self.classes {
            row(f, class)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        row(f, &self.macro_avg)?;
        row(f, &self.weighted_avg)
    }
}
