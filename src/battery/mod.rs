mod descriptive;
mod multivariate;
mod report;
mod summary;
mod univariate;

pub use multivariate::MultivariateResults;
pub use summary::{astrix, marker};
pub use univariate::UnivariateRow;

use std::path::PathBuf;

use crate::error::Error;
use crate::frame::{Axis, DataFrame};
use crate::multivariate::{MvnBackend, NativeBackend};

/// Smallest number of cells a frame needs before any battery is run;
/// smaller frames give multivariate results too noisy to report.
pub const MIN_CELLS: usize = 400;

/// Where and how [`NormalityBattery::normality_report`] writes its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Output directory, created when absent.
    pub file_dir: PathBuf,
    /// Axis the univariate and descriptive runners iterate over.
    pub axis: Axis,
    /// Rounding precision for every reported number.
    pub digits: usize,
    /// Append the descriptive statistics section.
    pub descriptive: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file_dir: PathBuf::from("reports/txt"),
            axis: Axis::Col,
            digits: 5,
            descriptive: false,
        }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file_dir = dir.into();
        self
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    pub fn descriptive(mut self, descriptive: bool) -> Self {
        self.descriptive = descriptive;
        self
    }
}

/// The full battery over one read-only frame.
///
/// All methods take `&self`; nothing is cached between calls and the frame
/// is never mutated, so any sequence of calls is valid and repeatable. The
/// backend supplies the four multivariate tests that are not computed
/// inline; [`NormalityBattery::new`] wires in the native one.
#[derive(Debug, Clone)]
pub struct NormalityBattery<B = NativeBackend> {
    frame: DataFrame,
    backend: B,
}

impl NormalityBattery<NativeBackend> {
    /// Battery backed by the built-in multivariate tests.
    ///
    /// Fails with [`Error::InsufficientData`] when the frame holds fewer
    /// than [`MIN_CELLS`] cells.
    pub fn new(frame: DataFrame) -> Result<Self, Error> {
        Self::with_backend(frame, NativeBackend)
    }
}

impl<B: MvnBackend> NormalityBattery<B> {
    /// Battery with an injected multivariate backend.
    pub fn with_backend(frame: DataFrame, backend: B) -> Result<Self, Error> {
        let (rows, cols) = frame.shape();
        if frame.len() < MIN_CELLS {
            return Err(Error::InsufficientData {
                rows,
                cols,
                min_cells: MIN_CELLS,
            });
        }
        Ok(Self { frame, backend })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Rendered table of summary statistics per vector along `axis`.
    pub fn descriptive_statistics(&self, axis: Axis, digits: usize) -> String {
        descriptive::render(&self.frame, axis, digits)
    }

    /// Rendered table of the four univariate tests per vector along `axis`.
    pub fn univariate_normality(&self, axis: Axis, digits: usize) -> Result<String, Error> {
        let rows = self.univariate_results(axis)?;
        univariate::render(&self.frame, axis, &rows, digits)
    }

    /// Rendered table of the five multivariate tests over the whole frame.
    pub fn multivariate_normality(&self, digits: usize) -> Result<String, Error> {
        let results = self.multivariate_results()?;
        multivariate::render(&self.frame, &results, digits)
    }

    /// Rendered conclusive/inconclusive tally over all conducted tests.
    pub fn result_summary(&self, axis: Axis, digits: usize) -> Result<String, Error> {
        let mv = self.multivariate_results()?;
        let un = self.univariate_results(axis)?;
        Ok(summary::render(&self.frame, axis, &mv, &un, digits))
    }

    /// Runs everything and writes the report file.
    ///
    /// Section order: banner, version, summary, multivariate, univariate
    /// and, when configured, descriptive statistics. Returns the path of
    /// the written file.
    pub fn normality_report(&self, config: &ReportConfig) -> Result<PathBuf, Error> {
        let (rows, cols) = self.frame.shape();
        log::debug!(
            "running normality battery on a {rows} x {cols} frame, dim = {}",
            config.axis
        );

        let mv = self.multivariate_results()?;
        let un = self.univariate_results(config.axis)?;

        let mut sections = vec![
            summary::render(&self.frame, config.axis, &mv, &un, config.digits),
            multivariate::render(&self.frame, &mv, config.digits)?,
            univariate::render(&self.frame, config.axis, &un, config.digits)?,
        ];
        if config.descriptive {
            sections.push(descriptive::render(&self.frame, config.axis, config.digits));
        }

        report::write(&config.file_dir, &report::assemble(&sections))
    }

    /// Structured univariate results, one entry per vector.
    pub fn univariate_results(&self, axis: Axis) -> Result<Vec<UnivariateRow>, Error> {
        univariate::run(&self.frame, axis)
    }

    /// Structured multivariate results.
    pub fn multivariate_results(&self) -> Result<MultivariateResults, Error> {
        multivariate::run(&self.frame, &self.backend)
    }
}
