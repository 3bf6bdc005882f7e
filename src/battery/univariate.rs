use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use super::summary::astrix;
use crate::error::Error;
use crate::frame::{Axis, DataFrame};
use crate::hypothesis::{
    DagostinoPearson, JarqueBera, KolmogorovSmirnov, NormalityTest, ShapiroWilk, TestResult,
};

/// The four univariate outcomes for one row or column vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnivariateRow {
    /// 1-based vector index along the tested axis.
    pub index: usize,
    pub jb: TestResult,
    pub k2: TestResult,
    pub ks: TestResult,
    pub sw: TestResult,
}

impl UnivariateRow {
    pub fn results(&self) -> [TestResult; 4] {
        [self.jb, self.k2, self.ks, self.sw]
    }

    /// How many of the four tests reject normality at the 5% level.
    pub fn conclusive(&self) -> usize {
        self.results().iter().filter(|r| r.is_conclusive()).count()
    }
}

pub(crate) fn run(frame: &DataFrame, axis: Axis) -> Result<Vec<UnivariateRow>, Error> {
    let jarque_bera = JarqueBera;
    let dagostino = DagostinoPearson::new();
    let kolmogorov = KolmogorovSmirnov;
    let shapiro = ShapiroWilk::new();

    let mut rows = Vec::with_capacity(frame.vector_count(axis));
    for (index, vector) in frame.vectors(axis) {
        rows.push(UnivariateRow {
            index,
            jb: jarque_bera.test(&vector)?,
            k2: dagostino.test(&vector)?,
            ks: kolmogorov.test(&vector)?,
            sw: shapiro.test(&vector)?,
        });
    }
    Ok(rows)
}

pub(crate) fn render(
    frame: &DataFrame,
    axis: Axis,
    rows: &[UnivariateRow],
    digits: usize,
) -> Result<String, Error> {
    let (nrows, ncols) = frame.shape();
    let mut title_table = Table::new();
    title_table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .add_row(vec![
            Cell::new(format!(
                "Univariate normality tests, {nrows} x {ncols} DataFrame, dim = {axis}"
            ))
            .set_alignment(CellAlignment::Center),
        ]);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header_cells(axis));

    for row in rows {
        let mut cells = vec![
            Cell::new(""),
            Cell::new(row.index).set_alignment(CellAlignment::Right),
        ];
        for result in row.results() {
            cells.push(
                Cell::new(format!("{:.digits$}", result.statistic))
                    .set_alignment(CellAlignment::Right),
            );
            cells.push(
                Cell::new(astrix(result.p_value, digits)?).set_alignment(CellAlignment::Right),
            );
        }
        table.add_row(cells);
    }

    Ok(format!("{title_table}\n{table}"))
}

fn header_cells(axis: Axis) -> Vec<Cell> {
    let mut cells = vec![
        Cell::new("").set_alignment(CellAlignment::Center),
        Cell::new(axis.name()).set_alignment(CellAlignment::Center),
    ];
    for name in ["jb", "k2", "ks", "sw"] {
        cells.push(Cell::new(name).set_alignment(CellAlignment::Center));
        cells.push(Cell::new(format!("p-value ({name})")).set_alignment(CellAlignment::Center));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_from_columns(cols: Vec<Vec<f64>>) -> DataFrame {
        let nrows = cols[0].len();
        let rows = (0..nrows)
            .map(|i| cols.iter().map(|c| c[i]).collect())
            .collect();
        DataFrame::from_rows(rows).unwrap()
    }

    #[test]
    fn one_row_per_vector_in_ascending_order() {
        let ramp: Vec<f64> = (0..25).map(f64::from).collect();
        let frame = frame_from_columns(vec![ramp.clone(), ramp]);
        let rows = run(&frame, Axis::Col).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[1].index, 2);
    }

    #[test]
    fn degenerate_vector_aborts_the_run() {
        let frame = frame_from_columns(vec![vec![1.0; 20], (0..20).map(f64::from).collect()]);
        assert!(matches!(
            run(&frame, Axis::Col),
            Err(Error::Computation(_))
        ));
    }

    #[test]
    fn rendered_table_contains_every_index_and_test_name() {
        let ramp: Vec<f64> = (0..25).map(f64::from).collect();
        let frame = frame_from_columns(vec![ramp]);
        let rows = run(&frame, Axis::Col).unwrap();
        let text = render(&frame, Axis::Col, &rows, 5).unwrap();
        for name in ["jb", "k2", "ks", "sw"] {
            assert!(text.contains(name), "missing column {name}");
        }
        assert!(text.contains("dim = col"));
    }

    #[test]
    fn index_column_is_headed_by_the_axis_name() {
        let cells = header_cells(Axis::Row);
        assert_eq!(cells[0].content(), "");
        assert_eq!(cells[1].content(), "row");
        assert_eq!(cells.len(), 10);
    }
}
