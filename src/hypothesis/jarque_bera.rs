use statrs::distribution::{ChiSquared, ContinuousCDF};

use super::{NormalityTest, TestResult, require_min_n, require_spread};
use crate::error::Error;
use crate::statistics::{Kurtosis, Skewness, Statistic};

/// Jarque-Bera goodness-of-fit test.
///
/// Measures how far the sample skewness and kurtosis are from the values a
/// normal distribution would produce:
///
/// ```text
/// JB = n/6 * (g1^2 + (g2^2) / 4) ~ chi2(2)
/// ```
///
/// where g1 is the biased sample skewness and g2 the biased excess
/// kurtosis. The chi-squared approximation is asymptotic; for very small
/// samples the test is conservative.
#[derive(Debug, Clone, Copy, Default)]
pub struct JarqueBera;

impl NormalityTest for JarqueBera {
    fn test(&self, data: &[f64]) -> Result<TestResult, Error> {
        require_min_n(data, 3, "Jarque-Bera")?;
        require_spread(data, "Jarque-Bera")?;

        let n = data.len() as f64;
        let g1: f64 = Skewness::biased().compute(&data);
        let g2: f64 = Kurtosis::biased().compute(&data);

        let statistic = n / 6.0 * (g1 * g1 + g2 * g2 / 4.0);

        let chi2 = ChiSquared::new(2.0)
            .map_err(|e| Error::Computation(format!("chi-squared(2): {e}")))?;
        let p_value = chi2.sf(statistic);

        Ok(TestResult { statistic, p_value })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn known_value() {
        // scipy.stats.jarque_bera([2, 4, 4, 4, 5, 5, 7, 9])
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let r = JarqueBera.test(&data).unwrap();
        assert_abs_diff_eq!(r.statistic, 0.590_169_270_8, epsilon = 1e-8);
        assert_abs_diff_eq!(r.p_value, 0.744_469_44, epsilon = 1e-6);
    }

    #[test]
    fn uniform_grid_keeps_low_statistic() {
        let data: Vec<f64> = (0..100).map(f64::from).collect();
        let r = JarqueBera.test(&data).unwrap();
        // Uniform data is platykurtic but symmetric; JB picks up kurtosis only.
        assert!(r.statistic > 0.0);
        assert!(r.p_value <= 1.0);
    }

    #[test]
    fn rejects_tiny_sample() {
        let err = JarqueBera.test(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }

    #[test]
    fn rejects_constant_sample() {
        let err = JarqueBera.test(&[5.0; 10]).unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }
}
