use nalgebra::DMatrix;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use super::{center, cholesky, covariance};
use crate::error::Error;
use crate::hypothesis::TestResult;

/// Both components of Mardia's test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MardiaResult {
    /// Multivariate skewness component, chi-squared distributed under H0.
    pub skewness: TestResult,
    /// Multivariate kurtosis component, standard normal under H0.
    pub kurtosis: TestResult,
}

/// Mardia's (1970) test for multivariate normality.
///
/// Works on the matrix of squared Mahalanobis inner products
/// `D = C S^-1 C^T` (C column-centered data, S the maximum-likelihood
/// covariance): the skewness coefficient is the mean cubed entry of `D`,
/// the kurtosis coefficient the mean squared diagonal. A small-sample
/// correction factor is applied to the skewness statistic when n < 20.
#[derive(Debug, Clone, Copy)]
pub struct Mardia {
    /// Use the (n-1)/n adjusted covariance matrix. On by default.
    pub adjusted_cov: bool,
}

impl Default for Mardia {
    fn default() -> Self {
        Self { adjusted_cov: true }
    }
}

impl Mardia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn test(&self, x: &DMatrix<f64>) -> Result<MardiaResult, Error> {
        let n = x.nrows();
        let p = x.ncols();
        if n < 3 || p < 1 {
            return Err(Error::Computation(format!(
                "Mardia requires at least 3 observations, got {n} x {p}"
            )));
        }

        let ddof = usize::from(!self.adjusted_cov);
        let sigma = covariance(x, ddof)?;
        let s_inv = cholesky(sigma)?.inverse();

        let c = center(x);
        let d = &c * s_inv * c.transpose();

        let n_f = n as f64;
        let p_f = p as f64;

        let g1 = d.iter().map(|&v| v.powi(3)).sum::<f64>() / (n_f * n_f);
        let g2 = d.diagonal().iter().map(|&v| v * v).sum::<f64>() / n_f;

        // Small-sample correction factor for the skewness statistic.
        let k = ((p_f + 1.0) * (n_f + 1.0) * (n_f + 3.0))
            / (n_f * ((n_f + 1.0) * (p_f + 1.0) - 6.0));
        let skew_stat = if n < 20 {
            n_f * k * g1 / 6.0
        } else {
            n_f * g1 / 6.0
        };

        let df = p_f * (p_f + 1.0) * (p_f + 2.0) / 6.0;
        let chi2 = ChiSquared::new(df)
            .map_err(|e| Error::Computation(format!("chi-squared({df}): {e}")))?;
        let p_skew = chi2.sf(skew_stat);

        let kurt_stat =
            (g2 - p_f * (p_f + 2.0)) * (n_f / (8.0 * p_f * (p_f + 2.0))).sqrt();
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| Error::Computation(format!("standard normal: {e}")))?;
        let p_kurt = 2.0 * normal.sf(kurt_stat.abs());

        Ok(MardiaResult {
            skewness: TestResult {
                statistic: skew_stat,
                p_value: p_skew,
            },
            kurtosis: TestResult {
                statistic: kurt_stat,
                p_value: p_kurt,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_data::{bimodal_matrix, normal_matrix};
    use super::*;

    #[test]
    fn normal_data_is_not_rejected() {
        let x = normal_matrix(500, 4, 42);
        let r = Mardia::new().test(&x).unwrap();
        assert!(r.skewness.p_value > 0.01, "p = {}", r.skewness.p_value);
        assert!(r.kurtosis.p_value > 0.01, "p = {}", r.kurtosis.p_value);
    }

    #[test]
    fn bimodal_data_fails_kurtosis() {
        let x = bimodal_matrix(200, 3, 11);
        let r = Mardia::new().test(&x).unwrap();
        // A two-point mixture is strongly platykurtic in every direction.
        assert!(r.kurtosis.p_value < 0.01, "p = {}", r.kurtosis.p_value);
    }

    #[test]
    fn duplicate_column_is_singular() {
        let x = DMatrix::from_fn(30, 2, |i, _| (i as f64).sin());
        assert!(matches!(
            Mardia::new().test(&x),
            Err(Error::Computation(_))
        ));
    }
}
