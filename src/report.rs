//! Plain-text rendering helpers for the workflow reports.

use std::fmt::Write;

/// Horizontal bar chart of signed values around a shared zero axis.
///
/// Negative values extend left of the axis and positive values right, each
/// scaled so the largest magnitude spans `half_width` characters.
///
/// ```rust
/// use tabular_eda::report::bar_chart;
///
/// let chart = bar_chart(
///     "Coefficients",
///     &[("odometer".to_string(), -2.0), ("Car_Age".to_string(), 1.0)],
///     4,
/// );
/// let lines: Vec<&str> = chart.lines().collect();
/// assert_eq!(lines[0], "Coefficients");
/// assert_eq!(lines[1], "odometer ####|        -2.00");
/// assert_eq!(lines[2], " Car_Age     |##       1.00");
/// ```
pub fn bar_chart(title: &str, bars: &[(String, f64)], half_width: usize) -> String {
    let label_width = bars.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let max_abs = bars
        .iter()
        .map(|(_, value)| value.abs())
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    let _ = writeln!(out, "{title}");

    for (label, value) in bars {
        let len = if max_abs > 0.0 {
            (value.abs() / max_abs * half_width as f64).round() as usize
        } else {
            0
        };
        let bar = "#".repeat(len);
        let (left, right) = if *value < 0.0 {
            (bar.as_str(), "")
        } else {
            ("", bar.as_str())
        };

        let _ = writeln!(
            out,
            "{label:>label_width$} {left:>half_width$}|{right:<half_width$} {value:>8.2}"
        );
    }

    out
}

/// Heading line used between report sections.
pub fn section(title: &str) -> String {
    format!("--- {title} ---")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values_have_no_bar() {
        let chart = bar_chart("t", &[("a".to_string(), 0.0)], 3);
        assert_eq!(chart, "t\na    |        0.00\n");
    }

    #[test]
    fn test_bars_scale_to_largest_magnitude() {
        let chart = bar_chart(
            "t",
            &[("a".to_string(), 10.0), ("b".to_string(), 5.0)],
            10,
        );
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[1].matches('#').count(), 10);
        assert_eq!(lines[2].matches('#').count(), 5);
    }

    #[test]
    fn test_empty_chart() {
        assert_eq!(bar_chart("Nothing", &[], 5), "Nothing\n");
    }

    #[test]
    fn test_section() {
        assert_eq!(section("Ridge Regression"), "--- Ridge Regression ---");
    }
}
