use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type shared by the whole battery.
///
/// No variant is ever downgraded or retried internally: every failure aborts
/// the current test or report invocation and surfaces to the caller.
#[derive(Debug)]
pub enum Error {
    /// A parameter had the wrong value or could not be interpreted
    /// (unknown axis name, NaN p-value, ...).
    InvalidArgument(String),
    /// The frame is too small for any of the results to be meaningful.
    InsufficientData {
        rows: usize,
        cols: usize,
        min_cells: usize,
    },
    /// The input contained a cell that is not a finite number.
    NonNumericData(String),
    /// A delegated statistical computation failed (degenerate vector,
    /// singular covariance matrix, sample size outside a test's domain).
    Computation(String),
    /// The report output directory could not be created.
    DirectoryCreation { dir: PathBuf, source: io::Error },
    Io(io::Error),
    Csv(csv::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Error::InsufficientData {
                rows,
                cols,
                min_cells,
            } => write!(
                f,
                "frame must have at least {min_cells} observations to conduct \
                 any meaningful normality tests, got {rows} x {cols}"
            ),
            Error::NonNumericData(msg) => write!(f, "only numeric data accepted: {msg}"),
            Error::Computation(msg) => write!(f, "computation failed: {msg}"),
            Error::DirectoryCreation { dir, source } => write!(
                f,
                "creation of dir {} failed with: {source}",
                dir.display()
            ),
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Csv(e) => write!(f, "CSV parsing error: {e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::DirectoryCreation { source, .. } => Some(source),
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e)
    }
}
