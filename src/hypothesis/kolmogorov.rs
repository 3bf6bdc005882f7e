use statrs::distribution::{ContinuousCDF, Normal};

use super::{NormalityTest, TestResult, require_min_n};
use crate::error::Error;

/// One-sample Kolmogorov-Smirnov test against the standard normal CDF.
///
/// The statistic is the supremum distance between the empirical CDF and
/// Phi(x):
///
/// ```text
/// D = sup_x |F_n(x) - Phi(x)|
/// ```
///
/// The null distribution is N(0, 1) with *fixed* parameters; the sample is
/// not standardized first. The p-value uses the asymptotic Kolmogorov
/// series, which is slightly conservative for small n.
#[derive(Debug, Clone, Copy, Default)]
pub struct KolmogorovSmirnov;

impl NormalityTest for KolmogorovSmirnov {
    fn test(&self, data: &[f64]) -> Result<TestResult, Error> {
        require_min_n(data, 1, "Kolmogorov-Smirnov")?;

        let n = data.len();
        let n_f = n as f64;
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| Error::Computation(format!("standard normal: {e}")))?;

        let mut sorted = data.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("no NaNs in sample"));

        let mut d_plus: f64 = 0.0;
        let mut d_minus: f64 = 0.0;
        for (i, &x) in sorted.iter().enumerate() {
            let f = normal.cdf(x);
            d_plus = d_plus.max((i + 1) as f64 / n_f - f);
            d_minus = d_minus.max(f - i as f64 / n_f);
        }
        let statistic = d_plus.max(d_minus);

        Ok(TestResult {
            statistic,
            p_value: kolmogorov_sf(statistic, n_f),
        })
    }
}

// Asymptotic two-sided survival function:
// p = 2 * sum_{k>=1} (-1)^(k-1) exp(-2 k^2 D^2 n)
fn kolmogorov_sf(d: f64, n: f64) -> f64 {
    if d <= 0.0 {
        return 1.0;
    }
    if d >= 1.0 {
        return 0.0;
    }

    let mut sum = 0.0;
    for k in 1..=100 {
        let exponent = -2.0 * (k as f64).powi(2) * d * d * n;
        if exponent < -700.0 {
            break;
        }
        let term = if k % 2 == 1 { exponent.exp() } else { -exponent.exp() };
        sum += term;
        if term.abs() < 1e-15 {
            break;
        }
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn matches_reference_on_even_grid() {
        // 20 evenly spaced points on [-2, 2] vs N(0, 1).
        let data: Vec<f64> = (0..20).map(|i| -2.0 + 4.0 * i as f64 / 19.0).collect();
        let r = KolmogorovSmirnov.test(&data).unwrap();
        assert_abs_diff_eq!(r.statistic, 0.128_274_461_6, epsilon = 1e-10);
        assert_abs_diff_eq!(r.p_value, 0.897_121_410_7, epsilon = 1e-8);
    }

    #[test]
    fn shifted_sample_is_rejected() {
        // Mean 10 is nowhere near N(0, 1).
        let data: Vec<f64> = (0..30).map(|i| 10.0 + 0.01 * i as f64).collect();
        let r = KolmogorovSmirnov.test(&data).unwrap();
        assert!(r.statistic > 0.9);
        assert!(r.p_value < 1e-6);
    }

    #[test]
    fn sf_bounds() {
        assert_abs_diff_eq!(kolmogorov_sf(0.0, 20.0), 1.0);
        assert_abs_diff_eq!(kolmogorov_sf(1.0, 20.0), 0.0);
    }
}
