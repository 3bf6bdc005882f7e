use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::frame::{Axis, DataFrame};
use crate::statistics::{Kurtosis, Mean, Quantile, Skewness, Statistic, StdDev, Variance};

const COLUMNS: [&str; 9] = [
    "mean", "median", "variance", "stdev", "kurtosis", "skewness", "min", "max", "quant (95%)",
];

/// One row of summary statistics per vector along `axis`.
///
/// Variance and standard deviation are the population (ddof = 0) estimates,
/// kurtosis is excess kurtosis, and the 95% quantile interpolates linearly
/// between order statistics. Pure computation over a read-only frame, so
/// repeated calls produce byte-identical output.
pub(crate) fn render(frame: &DataFrame, axis: Axis, digits: usize) -> String {
    let mean = Mean;
    let median = Quantile::median();
    let variance = Variance::population();
    let stdev = StdDev::population();
    let kurtosis = Kurtosis::biased();
    let skewness = Skewness::biased();
    let q95 = Quantile::new(0.95);

    let (nrows, ncols) = frame.shape();
    let mut title_table = Table::new();
    title_table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .add_row(vec![
            Cell::new(format!(
                "Descriptive statistics, {nrows} x {ncols} DataFrame, dim = {axis}"
            ))
            .set_alignment(CellAlignment::Center),
        ]);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            std::iter::once(Cell::new("").set_alignment(CellAlignment::Center))
                .chain(COLUMNS.map(|c| Cell::new(c).set_alignment(CellAlignment::Center)))
                .collect::<Vec<_>>(),
        );

    for (index, vector) in frame.vectors(axis) {
        let min = vector.iter().copied().fold(f64::INFINITY, f64::min);
        let max = vector.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let values: [f64; 9] = [
            mean.compute(&vector),
            median.compute(&vector),
            variance.compute(&vector),
            stdev.compute(&vector),
            kurtosis.compute(&vector),
            skewness.compute(&vector),
            min,
            max,
            q95.compute(&vector),
        ];
        let mut cells = vec![Cell::new(index).set_alignment(CellAlignment::Right)];
        cells.extend(
            values.map(|v| Cell::new(format!("{v:.digits$}")).set_alignment(CellAlignment::Right)),
        );
        table.add_row(cells);
    }

    format!("{title_table}\n{table}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::from_rows(vec![
            vec![2.0, 1.0],
            vec![4.0, 2.0],
            vec![4.0, 3.0],
            vec![4.0, 4.0],
            vec![5.0, 5.0],
            vec![5.0, 6.0],
            vec![7.0, 7.0],
            vec![9.0, 8.0],
        ])
        .unwrap()
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let df = frame();
        let first = render(&df, Axis::Col, 5);
        let second = render(&df, Axis::Col, 5);
        assert_eq!(first, second);
    }

    #[test]
    fn known_column_statistics_appear_rounded() {
        // First column is the classic {2,4,4,4,5,5,7,9}: mean 5, population
        // variance 4, stdev 2.
        let text = render(&frame(), Axis::Col, 2);
        assert!(text.contains("5.00"));
        assert!(text.contains("4.00"));
        assert!(text.contains("2.00"));
    }

    #[test]
    fn row_axis_yields_one_line_per_row() {
        let df = frame();
        let text = render(&df, Axis::Row, 3);
        // All eight 1-based indices show up as leading cells.
        for i in 1..=8 {
            assert!(text.contains(&format!(" {i} ")), "missing row {i}");
        }
    }
}
