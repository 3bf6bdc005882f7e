use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use super::multivariate::MultivariateResults;
use super::univariate::UnivariateRow;
use crate::error::Error;
use crate::frame::{Axis, DataFrame};

/// Ascending significance thresholds; a p-value picks the marker of the
/// first threshold it does not exceed.
const THRESHOLDS: [f64; 4] = [0.0001, 0.001, 0.01, 0.05];
const MARKERS: [&str; 5] = ["****", "***", "**", "*", ""];

/// Significance marker for a p-value.
///
/// Boundaries are inclusive on the tighter side: `marker(0.0001)` is
/// `"****"`, `marker(0.05)` is `"*"`. A NaN p-value is rejected with
/// [`Error::InvalidArgument`].
pub fn marker(p_value: f64) -> Result<&'static str, Error> {
    if p_value.is_nan() {
        return Err(Error::InvalidArgument(
            "p-value is NaN, cannot annotate".to_string(),
        ));
    }
    let bucket = THRESHOLDS.partition_point(|&t| t < p_value);
    Ok(MARKERS[bucket])
}

/// Rounded p-value with its significance marker appended, e.g. `0.00321**`.
pub fn astrix(p_value: f64, digits: usize) -> Result<String, Error> {
    Ok(format!("{p_value:.digits$}{}", marker(p_value)?))
}

/// Summary table tallying conclusive (p <= 0.05) against inconclusive
/// outcomes, from the structured results rather than the rendered tables.
pub(crate) fn render(
    frame: &DataFrame,
    axis: Axis,
    multivariate: &MultivariateResults,
    univariate: &[UnivariateRow],
    digits: usize,
) -> String {
    let mn_total = multivariate.total();
    let mn_conclusive = multivariate.conclusive();
    let un_total: usize = univariate.iter().map(|r| r.results().len()).sum();
    let un_conclusive: usize = univariate.iter().map(UnivariateRow::conclusive).sum();

    let (rows, cols) = frame.shape();
    let mut title_table = Table::new();
    title_table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .add_row(vec![
            Cell::new(format!(
                "Result summary for the normality tests, {rows} x {cols} DataFrame, dim = {axis}"
            ))
            .set_alignment(CellAlignment::Center),
        ]);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("").set_alignment(CellAlignment::Center),
            Cell::new("conducted").set_alignment(CellAlignment::Center),
            Cell::new("conclusive").set_alignment(CellAlignment::Center),
            Cell::new("(c-rate)").set_alignment(CellAlignment::Center),
            Cell::new("inconclusive").set_alignment(CellAlignment::Center),
            Cell::new("(i-rate)").set_alignment(CellAlignment::Center),
        ]);

    table
        .add_row(tally_row("multivariate", mn_total, mn_conclusive, digits))
        .add_row(tally_row("univariate", un_total, un_conclusive, digits))
        .add_row(separator_row())
        .add_row(tally_row(
            "total",
            mn_total + un_total,
            mn_conclusive + un_conclusive,
            digits,
        ));

    format!("{title_table}\n{table}")
}

// Dashed ruling between the per-family tallies and the grand total.
fn separator_row() -> Vec<Cell> {
    std::iter::once(Cell::new(""))
        .chain((0..5).map(|_| Cell::new("- - -").set_alignment(CellAlignment::Center)))
        .collect()
}

fn tally_row(name: &str, total: usize, conclusive: usize, digits: usize) -> Vec<Cell> {
    let inconclusive = total - conclusive;
    let rate = |count: usize| {
        if total == 0 {
            format!("{:.digits$}", 0.0)
        } else {
            format!("{:.digits$}", count as f64 / total as f64)
        }
    };
    vec![
        Cell::new(name).set_alignment(CellAlignment::Left),
        Cell::new(total).set_alignment(CellAlignment::Right),
        Cell::new(conclusive).set_alignment(CellAlignment::Right),
        Cell::new(rate(conclusive)).set_alignment(CellAlignment::Right),
        Cell::new(inconclusive).set_alignment(CellAlignment::Right),
        Cell::new(rate(inconclusive)).set_alignment(CellAlignment::Right),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_strength_decreases_with_p() {
        assert_eq!(marker(0.00001).unwrap(), "****");
        assert_eq!(marker(0.0005).unwrap(), "***");
        assert_eq!(marker(0.005).unwrap(), "**");
        assert_eq!(marker(0.03).unwrap(), "*");
        assert_eq!(marker(0.5).unwrap(), "");
    }

    #[test]
    fn boundaries_are_inclusive_on_the_tighter_side() {
        assert_eq!(marker(0.0001).unwrap(), "****");
        assert_eq!(marker(0.001).unwrap(), "***");
        assert_eq!(marker(0.01).unwrap(), "**");
        assert_eq!(marker(0.05).unwrap(), "*");
        assert_eq!(marker(0.050000001).unwrap(), "");
    }

    #[test]
    fn nan_p_value_is_rejected() {
        assert!(matches!(
            marker(f64::NAN),
            Err(Error::InvalidArgument(_))
        ));
        assert!(astrix(f64::NAN, 5).is_err());
    }

    #[test]
    fn astrix_appends_the_marker_to_the_rounded_value() {
        assert_eq!(astrix(0.00321, 5).unwrap(), "0.00321**");
        assert_eq!(astrix(0.5, 3).unwrap(), "0.500");
        assert_eq!(astrix(0.00004, 5).unwrap(), "0.00004****");
    }
}
