use super::DecisionTreeClassifier;
use super::decision_tree::Node;
use crate::error::{Error, Result};
use std::fmt::Write;

impl DecisionTreeClassifier {
    /// Indented text rendering of the fitted tree, one line per decision or leaf.
    ///
    /// ```text
    /// |--- Glucose <= 127.50
    /// |   |--- class: Non-Diabetic
    /// |--- Glucose >  127.50
    /// |   |--- class: Diabetic
    /// ```
    ///
    /// `class_names` label the sorted classes; when empty the label values are printed.
    pub fn export_text<F, C>(&self, feature_names: &[F], class_names: &[C]) -> Result<String>
    where
        F: AsRef<str>,
        C: AsRef<str>,
    {
        let root = self.root()?;

        if feature_names.len() != self.n_features() {
            return Err(Error::DimensionMismatch {
                expected: self.n_features(),
                found: feature_names.len(),
            });
        }
        let classes = self.classes().unwrap_or_default();
        if !class_names.is_empty() && class_names.len() != classes.len() {
            return Err(Error::DimensionMismatch {
                expected: classes.len(),
                found: class_names.len(),
            });
        }

        let class_label = |k: usize| match class_names.get(k) {
            Some(name) => name.as_ref().to_string(),
            None => classes[k].to_string(),
        };

        let mut out = String::new();
        render(root, 0, &mut out, &|j| feature_names[j].as_ref(), &class_label);
        Ok(out)
    }
}

fn render<'a>(
    node: &Node,
    depth: usize,
    out: &mut String,
    feature: &dyn Fn(usize) -> &'a str,
    class_label: &dyn Fn(usize) -> String,
) {
    let indent = "|   ".repeat(depth);

    match &node.split {
        None => {
            // writing to a String cannot fail
            let _ = writeln!(out, "{indent}|--- class: {}", class_label(node.majority()));
        }
        Some(split) => {
            let name = feature(split.feature);
            let _ = writeln!(out, "{indent}|--- {name} <= {:.2}", split.threshold);
            render(&split.left, depth + 1, out, feature, class_label);
            let _ = writeln!(out, "{indent}|--- {name} >  {:.2}", split.threshold);
            render(&split.right, depth + 1, out, feature, class_label);
        }
    }
}
