use nalgebra::DMatrix;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use super::correlation;
use crate::error::Error;
use crate::hypothesis::{NormalityTest, ShapiroWilk, TestResult, w_to_z};

/// Royston's (1992) extension of Shapiro-Wilk to several dimensions.
///
/// Each marginal W statistic is normalized to a z-score, folded into an
/// equivalent chi-squared value, and the values are pooled. Because the
/// marginals are correlated the pooled sum is compared against a
/// chi-squared distribution with *equivalent degrees of freedom*
/// `e = p / (1 + (p - 1) c)`, where `c` is an average transformed
/// correlation.
///
/// Valid for 4 <= n <= 2000, the range of Royston's polynomial fits.
#[derive(Debug, Clone, Copy)]
pub struct Royston {
    min_n: usize,
    max_n: usize,
}

impl Default for Royston {
    fn default() -> Self {
        Self {
            min_n: 4,
            max_n: 2000,
        }
    }
}

impl Royston {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn test(&self, x: &DMatrix<f64>) -> Result<TestResult, Error> {
        let n = x.nrows();
        let p = x.ncols();
        if n < self.min_n || n > self.max_n {
            return Err(Error::Computation(format!(
                "Royston is calibrated for {} to {} observations, got {n}",
                self.min_n, self.max_n
            )));
        }
        if p < 2 {
            return Err(Error::Computation(format!(
                "Royston needs at least 2 variables, got {p}"
            )));
        }

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| Error::Computation(format!("standard normal: {e}")))?;
        let shapiro = ShapiroWilk::new();

        // Equivalent chi-squared(1) value for each marginal.
        let mut r_sum = 0.0;
        for col in x.column_iter() {
            let sample: Vec<f64> = col.iter().copied().collect();
            let w = shapiro.test(&sample)?.statistic;
            let z = w_to_z(w, n);
            let r = normal.inverse_cdf(normal.sf(z) / 2.0).powi(2);
            r_sum += r;
        }

        let edf = equivalent_dof(x, n, p)?;
        let statistic = edf * r_sum / p as f64;

        let chi2 = ChiSquared::new(edf)
            .map_err(|e| Error::Computation(format!("chi-squared({edf}): {e}")))?;
        Ok(TestResult {
            statistic,
            p_value: chi2.sf(statistic),
        })
    }
}

// Royston's estimate of the equivalent degrees of freedom from the average
// transformed pairwise correlation.
fn equivalent_dof(x: &DMatrix<f64>, n: usize, p: usize) -> Result<f64, Error> {
    let ln_n = (n as f64).ln();
    let u = 0.715;
    let v = 0.21364 + 0.015124 * ln_n.powi(2) - 0.0018034 * ln_n.powi(3);
    let lambda = 5;

    let corr = correlation(x)?;
    let mut total = 0.0;
    for i in 0..p {
        for j in 0..p {
            let c = corr[(i, j)];
            total += c.powi(lambda) * (1.0 - u * (1.0 - c).powf(u) / v);
        }
    }
    // Subtract the p unit diagonal entries, then average the off-diagonal.
    let mean_c = (total - p as f64) / (p * p - p) as f64;
    Ok(p as f64 / (1.0 + (p as f64 - 1.0) * mean_c))
}

#[cfg(test)]
mod tests {
    use super::super::test_data::{bimodal_matrix, normal_matrix};
    use super::*;

    #[test]
    fn normal_data_is_not_rejected() {
        let x = normal_matrix(200, 3, 314);
        let r = Royston::new().test(&x).unwrap();
        assert!(r.p_value > 0.01, "p = {}", r.p_value);
    }

    #[test]
    fn bimodal_data_is_rejected() {
        let x = bimodal_matrix(100, 2, 8);
        let r = Royston::new().test(&x).unwrap();
        assert!(r.p_value < 1e-4, "p = {}", r.p_value);
    }

    #[test]
    fn equivalent_dof_near_p_for_independent_columns() {
        let x = normal_matrix(500, 4, 99);
        let e = equivalent_dof(&x, 500, 4).unwrap();
        assert!(e > 3.0 && e <= 4.5, "edf = {e}");
    }

    #[test]
    fn sample_size_limits() {
        let small = normal_matrix(3, 2, 1);
        assert!(Royston::new().test(&small).is_err());
        let narrow = normal_matrix(50, 1, 1);
        assert!(Royston::new().test(&narrow).is_err());
    }
}
