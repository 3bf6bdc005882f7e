use statrs::distribution::{ContinuousCDF, Normal};

use super::{NormalityTest, TestResult, require_min_n, require_spread};
use crate::error::Error;

/// Shapiro-Wilk test, Royston's AS R94 approximation.
///
/// W relates the squared best linear unbiased estimate of the slope of the
/// normal Q-Q plot to the sample variance; values close to 1 indicate
/// normality. Coefficients come from Blom's expected normal order
/// statistics with Royston's polynomial corrections; the p-value uses his
/// small-sample (n <= 11) and log-normal (n > 11) transformations.
///
/// Valid for 3 <= n <= 5000.
#[derive(Debug, Clone, Copy)]
pub struct ShapiroWilk {
    max_n: usize,
}

impl Default for ShapiroWilk {
    fn default() -> Self {
        Self { max_n: 5000 }
    }
}

impl ShapiroWilk {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NormalityTest for ShapiroWilk {
    fn test(&self, data: &[f64]) -> Result<TestResult, Error> {
        require_min_n(data, 3, "Shapiro-Wilk")?;
        require_spread(data, "Shapiro-Wilk")?;

        let n = data.len();
        if n > self.max_n {
            return Err(Error::Computation(format!(
                "Shapiro-Wilk is calibrated up to {} observations, got {n}",
                self.max_n
            )));
        }

        let mut x = data.to_vec();
        x.sort_by(|a, b| a.partial_cmp(b).expect("no NaNs in sample"));

        if n == 3 {
            return Ok(shapiro_n3(&x));
        }

        let half = n / 2;
        let a = coefficients(n, half)?;

        // W = (sum a_i (x_(n+1-i) - x_(i)))^2 / sum (x_i - mean)^2
        let mut sa = 0.0;
        for i in 0..half {
            sa += a[i] * (x[n - 1 - i] - x[i]);
        }
        let mean = x.iter().sum::<f64>() / n as f64;
        let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
        let statistic = (sa * sa / ss).min(1.0);

        Ok(TestResult {
            statistic,
            p_value: p_value(statistic, n),
        })
    }
}

// Exact solution for n = 3.
fn shapiro_n3(x: &[f64]) -> TestResult {
    let mean = (x[0] + x[1] + x[2]) / 3.0;
    let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
    let num = std::f64::consts::FRAC_1_SQRT_2 * (x[2] - x[0]);
    let w = (num * num / ss).clamp(0.75, 1.0);
    let p = (1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos()).clamp(0.0, 1.0);
    TestResult {
        statistic: w,
        p_value: p,
    }
}

// Royston polynomial sets (AS R94).
const C1: [f64; 6] = [0.0, 0.221_157, -0.147_981, -2.071_19, 4.434_685, -2.706_056];
const C2: [f64; 6] = [0.0, 0.042_981, -0.293_762, -1.752_461, 5.682_633, -3.582_633];
const C3: [f64; 4] = [0.544, -0.399_78, 0.025_054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.778_57, 0.062_767, -0.002_032_2];
const C5: [f64; 4] = [-1.5861, -0.310_82, -0.083_751, 0.003_891_5];
const C6: [f64; 3] = [-0.4803, -0.082_676, 0.003_030_2];
const G: [f64; 2] = [-2.273, 0.459];

fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

fn coefficients(n: usize, half: usize) -> Result<Vec<f64>, Error> {
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| Error::Computation(format!("standard normal: {e}")))?;

    // Blom scores for the lower half of the order statistics.
    let mut m = Vec::with_capacity(half);
    for i in 0..half {
        let p = (i as f64 + 1.0 - 0.375) / (n as f64 + 0.25);
        m.push(normal.inverse_cdf(p));
    }
    let summ2: f64 = 2.0 * m.iter().map(|&v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();

    let mut a = vec![0.0; half];
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;

    if n <= 5 {
        let fac_sq = (summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1);
        if fac_sq <= 0.0 {
            return Err(Error::Computation(
                "Shapiro-Wilk coefficient normalization failed".to_string(),
            ));
        }
        let fac = fac_sq.sqrt();
        a[0] = a1;
        for i in 1..half {
            a[i] = -m[i] / fac;
        }
    } else {
        let a2 = poly(&C2, rsn) - m[1] / ssumm2;
        let fac_sq = (summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2);
        if fac_sq <= 0.0 {
            return Err(Error::Computation(
                "Shapiro-Wilk coefficient normalization failed".to_string(),
            ));
        }
        let fac = fac_sq.sqrt();
        a[0] = a1;
        a[1] = a2;
        for i in 2..half {
            a[i] = -m[i] / fac;
        }
    }

    Ok(a)
}

// Royston's normalizing transformation of W; the same z feeds both the
// univariate p-value and the column scores of the Royston multivariate test.
pub(crate) fn w_to_z(w: f64, n: usize) -> f64 {
    let nf = n as f64;

    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let y = w1.ln();

    if n <= 11 {
        let gamma = poly(&G, nf);
        if y >= gamma {
            return f64::INFINITY;
        }
        let y2 = -(gamma - y).ln();
        (y2 - poly(&C3, nf)) / poly(&C4, nf).exp()
    } else {
        let xx = nf.ln();
        (y - poly(&C5, xx)) / poly(&C6, xx).exp()
    }
}

fn p_value(w: f64, n: usize) -> f64 {
    let z = w_to_z(w, n);
    if z == f64::NEG_INFINITY {
        return 1.0;
    }
    if z == f64::INFINITY {
        return 0.0;
    }
    let normal = Normal::new(0.0, 1.0).expect("valid standard normal");
    normal.sf(z).clamp(0.0, 1.0)
}
