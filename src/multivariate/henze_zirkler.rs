use nalgebra::DMatrix;
use statrs::distribution::{ContinuousCDF, LogNormal};

use super::{center, cholesky, covariance};
use crate::error::Error;
use crate::hypothesis::TestResult;

/// Henze-Zirkler (1990) test for multivariate normality.
///
/// The statistic is a weighted L2 distance between the empirical
/// characteristic function of the Mahalanobis-scaled data and the
/// characteristic function of the standard multivariate normal, with the
/// smoothing bandwidth
///
/// ```text
/// b = ((2p + 1) n / 4)^(1/(p+4)) / sqrt(2)
/// ```
///
/// Under H0 the statistic is approximately log-normal; the p-value comes
/// from the matched log-normal upper tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct HenzeZirkler;

impl HenzeZirkler {
    pub fn test(&self, x: &DMatrix<f64>) -> Result<TestResult, Error> {
        let n = x.nrows();
        let p = x.ncols();
        if n < 3 || p < 1 {
            return Err(Error::Computation(format!(
                "Henze-Zirkler requires at least 3 observations, got {n} x {p}"
            )));
        }

        let sigma = covariance(x, 0)?;
        let s_inv = cholesky(sigma)?.inverse();

        let c = center(x);
        // d[(i, j)] = c_i' S^-1 c_j; squared Mahalanobis distances fall out
        // of the diagonal and the pairwise cross terms.
        let d = &c * s_inv * c.transpose();

        let n_f = n as f64;
        let p_f = p as f64;
        let b = ((2.0 * p_f + 1.0) * n_f / 4.0).powf(1.0 / (p_f + 4.0))
            / std::f64::consts::SQRT_2;
        let b2 = b * b;

        let mut pair_sum = 0.0;
        for i in 0..n {
            for j in 0..n {
                let djk = d[(i, i)] + d[(j, j)] - 2.0 * d[(i, j)];
                pair_sum += (-b2 / 2.0 * djk).exp();
            }
        }
        let mut single_sum = 0.0;
        for i in 0..n {
            single_sum += (-b2 / (2.0 * (1.0 + b2)) * d[(i, i)]).exp();
        }

        let statistic = n_f
            * (pair_sum / (n_f * n_f)
                - 2.0 * (1.0 + b2).powf(-p_f / 2.0) * single_sum / n_f
                + (1.0 + 2.0 * b2).powf(-p_f / 2.0));

        // Log-normal moment match (Henze & Zirkler 1990, section 3).
        let a = 1.0 + 2.0 * b2;
        let wb = (1.0 + b2) * (1.0 + 3.0 * b2);
        let mu = 1.0
            - a.powf(-p_f / 2.0)
                * (1.0 + p_f * b2 / a + p_f * (p_f + 2.0) * b2 * b2 / (2.0 * a * a));
        let si2 = 2.0 * (1.0 + 4.0 * b2).powf(-p_f / 2.0)
            + 2.0 * a.powf(-p_f)
                * (1.0
                    + 2.0 * p_f * b2.powi(2) / (a * a)
                    + 3.0 * p_f * (p_f + 2.0) * b2.powi(4) / (4.0 * a.powi(4)))
            - 4.0 * wb.powf(-p_f / 2.0)
                * (1.0
                    + 3.0 * p_f * b2.powi(2) / (2.0 * wb)
                    + p_f * (p_f + 2.0) * b2.powi(4) / (2.0 * wb * wb));

        let pmu = (mu.powi(4) / (si2 + mu * mu)).sqrt().ln();
        let psi = ((si2 + mu * mu) / (mu * mu)).ln().sqrt();
        let lognormal = LogNormal::new(pmu, psi)
            .map_err(|e| Error::Computation(format!("log-normal({pmu}, {psi}): {e}")))?;

        Ok(TestResult {
            statistic,
            p_value: lognormal.sf(statistic),
        })
    }
}
