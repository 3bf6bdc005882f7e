use statrs::distribution::{ChiSquared, ContinuousCDF};

use super::{NormalityTest, TestResult, require_min_n, require_spread};
use crate::error::Error;
use crate::statistics::{Kurtosis, Skewness, Statistic};

/// D'Agostino-Pearson omnibus test (the `k2` column).
///
/// Combines a normalized skewness statistic (D'Agostino 1970, corrected
/// 1973) with a normalized kurtosis statistic (Anscombe-Glynn 1983):
///
/// ```text
/// K2 = Z1^2 + Z2^2 ~ chi2(2)
/// ```
///
/// Requires at least 8 observations for the skewness transformation to be
/// defined.
#[derive(Debug, Clone, Copy)]
pub struct DagostinoPearson {
    min_n: usize,
}

impl Default for DagostinoPearson {
    fn default() -> Self {
        Self { min_n: 8 }
    }
}

impl DagostinoPearson {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NormalityTest for DagostinoPearson {
    fn test(&self, data: &[f64]) -> Result<TestResult, Error> {
        require_min_n(data, self.min_n, "D'Agostino-Pearson")?;
        require_spread(data, "D'Agostino-Pearson")?;

        let n = data.len();
        let g1: f64 = Skewness::biased().compute(&data);
        let g2: f64 = Kurtosis::biased().compute(&data);
        let b2 = g2 + 3.0;

        let z1 = skewness_z(g1, n);
        let z2 = kurtosis_z(b2, n)?;
        let statistic = z1 * z1 + z2 * z2;

        let chi2 = ChiSquared::new(2.0)
            .map_err(|e| Error::Computation(format!("chi-squared(2): {e}")))?;
        let p_value = chi2.sf(statistic);

        Ok(TestResult { statistic, p_value })
    }
}

// D'Agostino (1970, 1973 correction) normalization of the sample skewness.
// Also the skewness component of the Doornik-Hansen omnibus statistic.
pub(crate) fn skewness_z(g1: f64, n: usize) -> f64 {
    let n = n as f64;

    let y = g1 * ((n + 1.0) * (n + 3.0) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / w2.sqrt().ln().sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    let y = if y == 0.0 { 1.0 } else { y };

    delta * (y / alpha + ((y / alpha).powi(2) + 1.0).sqrt()).ln()
}

// Anscombe-Glynn (1983) normalization of the sample kurtosis b2 = m4/m2^2.
fn kurtosis_z(b2: f64, n: usize) -> Result<f64, Error> {
    let n = n as f64;

    let e = 3.0 * (n - 1.0) / (n + 1.0);
    let var = 24.0 * n * (n - 2.0) * (n - 3.0)
        / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (b2 - e) / var.sqrt();

    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * (6.0 * (n + 3.0) * (n + 5.0) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0 + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());

    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    if denom == 0.0 {
        return Err(Error::Computation(
            "kurtosis normalization degenerated (zero denominator)".to_string(),
        ));
    }
    let term = ((1.0 - 2.0 / a) / denom.abs()).cbrt().copysign(denom);
    Ok((1.0 - 2.0 / (9.0 * a) - term) / (2.0 / (9.0 * a)).sqrt())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn matches_reference_on_fixed_sample() {
        // scipy.stats.normaltest(range(20))
        let data: Vec<f64> = (0..20).map(f64::from).collect();
        let r = DagostinoPearson::new().test(&data).unwrap();
        assert_abs_diff_eq!(r.statistic, 3.992_116_190_2, epsilon = 1e-8);
        assert_abs_diff_eq!(r.p_value, 0.135_869_814_9, epsilon = 1e-8);
    }

    #[test]
    fn near_normal_sample_is_not_rejected() {
        // Quantile-spaced draws from a standard normal shape.
        let data = [
            -1.64, -1.04, -0.74, -0.51, -0.32, -0.15, 0.0, 0.15, 0.32, 0.51,
            0.74, 1.04, 1.64, -0.2, 0.2, -0.6, 0.6, -1.2, 1.2, 0.05,
        ];
        let r = DagostinoPearson::new().test(&data).unwrap();
        assert!(r.p_value > 0.05, "p = {}", r.p_value);
    }

    #[test]
    fn requires_eight_observations() {
        let err = DagostinoPearson::new()
            .test(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])
            .unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }
}
