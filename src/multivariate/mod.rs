mod doornik_hansen;
mod energy;
mod henze_zirkler;
mod mardia;
mod royston;

pub use doornik_hansen::DoornikHansen;
pub use energy::Energy;
pub use henze_zirkler::HenzeZirkler;
pub use mardia::{Mardia, MardiaResult};
pub use royston::Royston;

use nalgebra::{Cholesky, DMatrix, Dyn};

use crate::error::Error;
use crate::hypothesis::TestResult;

/// The multivariate tests that go through a [`MvnBackend`].
///
/// Mardia is not listed: it is always computed locally by [`Mardia`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MvnTestKind {
    Royston,
    HenzeZirkler,
    DoornikHansen,
    Energy,
}

impl MvnTestKind {
    pub const ALL: [MvnTestKind; 4] = [
        MvnTestKind::Royston,
        MvnTestKind::HenzeZirkler,
        MvnTestKind::DoornikHansen,
        MvnTestKind::Energy,
    ];

    /// Row label used in the multivariate results table.
    pub fn name(self) -> &'static str {
        match self {
            MvnTestKind::Royston => "royston",
            MvnTestKind::HenzeZirkler => "henze-zirkler",
            MvnTestKind::DoornikHansen => "doornik-hansen",
            MvnTestKind::Energy => "energy",
        }
    }
}

/// Provider of the multivariate normality tests the battery does not
/// compute inline.
///
/// The battery ships [`NativeBackend`]; an alternative implementation (for
/// example one that shells out to an external statistics runtime) can be
/// injected through `NormalityBattery::with_backend`.
pub trait MvnBackend {
    fn run_test(&self, kind: MvnTestKind, data: &DMatrix<f64>) -> Result<TestResult, Error>;
}

/// Pure-Rust implementation of all four backend tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl MvnBackend for NativeBackend {
    fn run_test(&self, kind: MvnTestKind, data: &DMatrix<f64>) -> Result<TestResult, Error> {
        match kind {
            MvnTestKind::Royston => Royston::default().test(data),
            MvnTestKind::HenzeZirkler => HenzeZirkler.test(data),
            MvnTestKind::DoornikHansen => DoornikHansen.test(data),
            MvnTestKind::Energy => Energy::default().test(data),
        }
    }
}

// ----- shared matrix helpers -------------------------------------------------

/// Column-centered copy of `x`.
pub(crate) fn center(x: &DMatrix<f64>) -> DMatrix<f64> {
    let mut c = x.clone();
    for mut col in c.column_iter_mut() {
        let mean = col.iter().sum::<f64>() / col.len() as f64;
        col.iter_mut().for_each(|v| *v -= mean);
    }
    c
}

/// Covariance matrix of the rows of `x`; `ddof` 0 gives the maximum
/// likelihood estimate, 1 the unbiased one.
pub(crate) fn covariance(x: &DMatrix<f64>, ddof: usize) -> Result<DMatrix<f64>, Error> {
    let n = x.nrows();
    if n <= ddof {
        return Err(Error::Computation(format!(
            "covariance needs more than {ddof} observations, got {n}"
        )));
    }
    let c = center(x);
    Ok(c.transpose() * &c / (n - ddof) as f64)
}

/// Cholesky factorization, mapping a non-positive-definite (singular)
/// covariance to [`Error::Computation`].
pub(crate) fn cholesky(s: DMatrix<f64>) -> Result<Cholesky<f64, Dyn>, Error> {
    Cholesky::new(s).ok_or_else(|| {
        Error::Computation("covariance matrix is singular or not positive definite".to_string())
    })
}

/// Pearson correlation matrix of the columns of `x`.
pub(crate) fn correlation(x: &DMatrix<f64>) -> Result<DMatrix<f64>, Error> {
    let cov = covariance(x, 1)?;
    let p = cov.nrows();
    let mut corr = DMatrix::zeros(p, p);
    for i in 0..p {
        for j in 0..p {
            let denom = (cov[(i, i)] * cov[(j, j)]).sqrt();
            if denom == 0.0 {
                return Err(Error::Computation(format!(
                    "column {i} or {j} has zero variance"
                )));
            }
            corr[(i, j)] = cov[(i, j)] / denom;
        }
    }
    Ok(corr)
}

#[cfg(test)]
pub(crate) mod test_data {
    use nalgebra::DMatrix;
    use rand::{Rng, SeedableRng};
    use rand::distributions::Distribution;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use statrs::distribution::Normal;

    /// Deterministic n x p matrix of independent standard normal draws.
    pub fn normal_matrix(n: usize, p: usize, seed: u64) -> DMatrix<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        DMatrix::from_fn(n, p, |_, _| normal.sample(&mut rng))
    }

    /// Deterministic n x p matrix with strongly bimodal, mutually
    /// independent columns. The mode is drawn per cell so the bimodality
    /// survives any decorrelating rotation of the columns.
    pub fn bimodal_matrix(n: usize, p: usize, seed: u64) -> DMatrix<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let noise = Normal::new(0.0, 0.1).unwrap();
        DMatrix::from_fn(n, p, |_, _| {
            let mode = if rng.gen_bool(0.5) { -3.0 } else { 3.0 };
            mode + noise.sample(&mut rng)
        })
    }
}
