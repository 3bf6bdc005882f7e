use nalgebra::{DMatrix, SymmetricEigen};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use super::{center, correlation};
use crate::error::Error;
use crate::hypothesis::{TestResult, skewness_z};
use crate::statistics::{Kurtosis, Skewness, Statistic};

/// Doornik-Hansen (1994) omnibus test.
///
/// The data are rescaled to unit variance and rotated through the inverse
/// square root of the correlation matrix, which makes the columns exactly
/// uncorrelated. Each rotated column then contributes a normalized
/// skewness z (D'Agostino's transformation) and a normalized kurtosis z
/// (a Wilson-Hilferty cube-root on a gamma approximation); the sum of all
/// 2p squares is chi-squared with 2p degrees of freedom under H0.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoornikHansen;

impl DoornikHansen {
    pub fn test(&self, x: &DMatrix<f64>) -> Result<TestResult, Error> {
        let n = x.nrows();
        let p = x.ncols();
        if n < 8 {
            return Err(Error::Computation(format!(
                "Doornik-Hansen requires at least 8 observations, got {n}"
            )));
        }

        let st = decorrelate(x)?;

        let mut statistic = 0.0;
        for col in st.column_iter() {
            let sample: Vec<f64> = col.iter().copied().collect();
            let g1: f64 = Skewness::biased().compute(&sample);
            let b2: f64 = Kurtosis::biased().compute(&sample) + 3.0;

            let z1 = skewness_z(g1, n);
            let z2 = kurtosis_z(g1 * g1, b2, n)?;
            statistic += z1 * z1 + z2 * z2;
        }

        let df = 2.0 * p as f64;
        let chi2 = ChiSquared::new(df)
            .map_err(|e| Error::Computation(format!("chi-squared({df}): {e}")))?;
        Ok(TestResult {
            statistic,
            p_value: chi2.sf(statistic),
        })
    }
}

// Z * H * diag(1/sqrt(lambda)) * H' for the correlation eigensystem, with Z
// the data scaled to zero mean and unit variance.
fn decorrelate(x: &DMatrix<f64>) -> Result<DMatrix<f64>, Error> {
    let n = x.nrows();
    let corr = correlation(x)?;

    let mut z = center(x);
    for mut col in z.column_iter_mut() {
        let sd = (col.iter().map(|&v| v * v).sum::<f64>() / (n - 1) as f64).sqrt();
        col.iter_mut().for_each(|v| *v /= sd);
    }

    let eigen = SymmetricEigen::new(corr);
    let mut inv_sqrt = DMatrix::zeros(x.ncols(), x.ncols());
    for (i, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= 1e-12 {
            return Err(Error::Computation(
                "correlation matrix is singular or not positive definite".to_string(),
            ));
        }
        inv_sqrt[(i, i)] = 1.0 / lambda.sqrt();
    }

    Ok(z * &eigen.eigenvectors * inv_sqrt * eigen.eigenvectors.transpose())
}

// Doornik & Hansen's gamma approximation of the kurtosis, conditional on
// the observed squared skewness b1, mapped to normality by the
// Wilson-Hilferty cube-root.
fn kurtosis_z(b1: f64, b2: f64, n: usize) -> Result<f64, Error> {
    let n = n as f64;

    let d = (n - 3.0) * (n + 1.0) * (n * n + 15.0 * n - 4.0);
    let a = (n - 2.0) * (n + 5.0) * (n + 7.0) * (n * n + 27.0 * n - 70.0) / (6.0 * d);
    let c = (n - 7.0) * (n + 5.0) * (n + 7.0) * (n * n + 2.0 * n - 5.0) / (6.0 * d);
    let k =
        (n + 5.0) * (n + 7.0) * (n.powi(3) + 37.0 * n * n + 11.0 * n - 313.0) / (12.0 * d);

    let alpha = a + b1 * c;
    if alpha <= 0.0 {
        return Err(Error::Computation(
            "kurtosis gamma approximation degenerated (non-positive shape)".to_string(),
        ));
    }
    let chi = (b2 - 1.0 - b1) * 2.0 * k;

    Ok(((chi / (2.0 * alpha)).cbrt() - 1.0 + 1.0 / (9.0 * alpha)) * (9.0 * alpha).sqrt())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::super::test_data::{bimodal_matrix, normal_matrix};
    use super::*;

    #[test]
    fn normal_data_is_not_rejected() {
        let x = normal_matrix(400, 3, 2718);
        let r = DoornikHansen.test(&x).unwrap();
        assert!(r.p_value > 0.01, "p = {}", r.p_value);
    }

    #[test]
    fn bimodal_data_is_rejected() {
        let x = bimodal_matrix(120, 2, 23);
        let r = DoornikHansen.test(&x).unwrap();
        assert!(r.p_value < 1e-6, "p = {}", r.p_value);
    }

    #[test]
    fn decorrelated_columns_are_uncorrelated() {
        // Build strongly correlated columns, rotate, and check the result.
        let base = normal_matrix(300, 2, 77);
        let x = DMatrix::from_fn(300, 2, |i, j| {
            if j == 0 {
                base[(i, 0)]
            } else {
                0.9 * base[(i, 0)] + 0.1 * base[(i, 1)]
            }
        });
        let st = decorrelate(&x).unwrap();
        let corr = correlation(&st).unwrap();
        assert_abs_diff_eq!(corr[(0, 1)], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn small_sample_is_an_error() {
        let x = normal_matrix(7, 2, 1);
        assert!(DoornikHansen.test(&x).is_err());
    }
}
