use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use super::summary::astrix;
use crate::error::Error;
use crate::frame::DataFrame;
use crate::hypothesis::TestResult;
use crate::multivariate::{Mardia, MardiaResult, MvnBackend, MvnTestKind};

/// Structured outcome of the whole multivariate run: Mardia's two
/// components plus one result per backend test.
#[derive(Debug, Clone, PartialEq)]
pub struct MultivariateResults {
    pub mardia: MardiaResult,
    pub backend: Vec<(MvnTestKind, TestResult)>,
}

impl MultivariateResults {
    /// Number of conducted tests; Mardia counts twice.
    pub fn total(&self) -> usize {
        2 + self.backend.len()
    }

    /// How many tests reject normality at the 5% level.
    pub fn conclusive(&self) -> usize {
        let mardia = [self.mardia.skewness, self.mardia.kurtosis];
        mardia
            .iter()
            .chain(self.backend.iter().map(|(_, r)| r))
            .filter(|r| r.is_conclusive())
            .count()
    }
}

pub(crate) fn run<B: MvnBackend>(
    frame: &DataFrame,
    backend: &B,
) -> Result<MultivariateResults, Error> {
    let matrix = frame.to_matrix();
    let mardia = Mardia::new().test(&matrix)?;

    let mut results = Vec::with_capacity(MvnTestKind::ALL.len());
    for kind in MvnTestKind::ALL {
        results.push((kind, backend.run_test(kind, &matrix)?));
    }

    Ok(MultivariateResults {
        mardia,
        backend: results,
    })
}

pub(crate) fn render(
    frame: &DataFrame,
    results: &MultivariateResults,
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
                "Multivariate normality tests, {nrows} x {ncols} DataFrame"
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
            Cell::new("t1").set_alignment(CellAlignment::Center),
            Cell::new("p-value (t1)").set_alignment(CellAlignment::Center),
            Cell::new("t2").set_alignment(CellAlignment::Center),
            Cell::new("p-value (t2)").set_alignment(CellAlignment::Center),
        ]);

    // Mardia carries both of its components on one row.
    table.add_row(vec![
        Cell::new("mardia").set_alignment(CellAlignment::Left),
        stat_cell(results.mardia.skewness, digits),
        p_cell(results.mardia.skewness, digits)?,
        stat_cell(results.mardia.kurtosis, digits),
        p_cell(results.mardia.kurtosis, digits)?,
    ]);
    for (kind, result) in &results.backend {
        table.add_row(vec![
            Cell::new(kind.name()).set_alignment(CellAlignment::Left),
            stat_cell(*result, digits),
            p_cell(*result, digits)?,
            Cell::new(""),
            Cell::new(""),
        ]);
    }

    Ok(format!("{title_table}\n{table}"))
}

fn stat_cell(result: TestResult, digits: usize) -> Cell {
    Cell::new(format!("{:.digits$}", result.statistic)).set_alignment(CellAlignment::Right)
}

fn p_cell(result: TestResult, digits: usize) -> Result<Cell, Error> {
    Ok(Cell::new(astrix(result.p_value, digits)?).set_alignment(CellAlignment::Right))
}
