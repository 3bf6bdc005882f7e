mod dagostino;
mod jarque_bera;
mod kolmogorov;
mod shapiro;

pub use dagostino::DagostinoPearson;
pub use jarque_bera::JarqueBera;
pub use kolmogorov::KolmogorovSmirnov;
pub use shapiro::ShapiroWilk;

pub(crate) use dagostino::skewness_z;
pub(crate) use shapiro::w_to_z;

use crate::error::Error;

/// Statistic and p-value produced by one test on one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
}

impl TestResult {
    /// Whether the test rejects normality at the conventional 5% level.
    pub fn is_conclusive(&self) -> bool {
        self.p_value <= 0.05
    }
}

/// A goodness-of-fit test of the null hypothesis that a sample is drawn
/// from a normal distribution.
///
/// Implementations fail with [`Error::Computation`] on samples outside
/// their domain (too few observations, zero variance); nothing is retried
/// or downgraded.
pub trait NormalityTest {
    fn test(&self, data: &[f64]) -> Result<TestResult, Error>;
}

pub(crate) fn require_min_n(data: &[f64], min_n: usize, test: &str) -> Result<(), Error> {
    if data.len() < min_n {
        return Err(Error::Computation(format!(
            "{test} requires at least {min_n} observations, got {}",
            data.len()
        )));
    }
    Ok(())
}

pub(crate) fn require_spread(data: &[f64], test: &str) -> Result<(), Error> {
    let first = data[0];
    if data.iter().all(|&x| x == first) {
        return Err(Error::Computation(format!(
            "{test} is undefined for a constant sample"
        )));
    }
    Ok(())
}
