//! A battery of normality tests for tabular numeric data.
//!
//! The entry point is [`NormalityBattery`]: it takes a read-only
//! [`DataFrame`], runs four univariate tests (Jarque-Bera,
//! D'Agostino-Pearson, Kolmogorov-Smirnov, Shapiro-Wilk) over each row or
//! column, five multivariate tests (Mardia, Royston, Henze-Zirkler,
//! Doornik-Hansen, Energy) over the whole frame, and renders the results,
//! a descriptive statistics table and a conclusive/inconclusive summary
//! into a timestamped text report.
//!
//! ```no_run
//! use normbatt::{Axis, DataFrame, NormalityBattery, ReportConfig};
//!
//! # fn main() -> Result<(), normbatt::Error> {
//! let frame = DataFrame::read_csv("data.csv")?;
//! let battery = NormalityBattery::new(frame)?;
//! let path = battery.normality_report(
//!     &ReportConfig::new().axis(Axis::Col).digits(5).descriptive(true),
//! )?;
//! println!("report written to {}", path.display());
//! # Ok(())
//! # }
//! ```

mod battery;
mod error;
mod frame;
mod hypothesis;
mod multivariate;
mod statistics;

pub use crate::battery::{
    MIN_CELLS, MultivariateResults, NormalityBattery, ReportConfig, UnivariateRow, astrix, marker,
};
pub use crate::error::Error;
pub use crate::frame::{Axis, DataFrame, Vectors};
pub use crate::hypothesis::{
    DagostinoPearson, JarqueBera, KolmogorovSmirnov, NormalityTest, ShapiroWilk, TestResult,
};
pub use crate::multivariate::{
    DoornikHansen, Energy, HenzeZirkler, Mardia, MardiaResult, MvnBackend, MvnTestKind,
    NativeBackend, Royston,
};
pub use crate::statistics::{Kurtosis, Mean, Quantile, Skewness, Statistic, StdDev, Variance};
