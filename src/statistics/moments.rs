use num_traits::{Float, FromPrimitive};

use super::{Mean, Statistic};

// Central moments m2..m4 in one pass over the mean-centered data.
fn central_moments<T: Float + FromPrimitive>(slice: &[T], mean: T) -> (T, T, T) {
    let n = T::from_usize(slice.len()).expect("n fits in float");
    let mut s2 = T::zero();
    let mut s3 = T::zero();
    let mut s4 = T::zero();
    for &x in slice {
        let d = x - mean;
        let d2 = d * d;
        s2 = s2 + d2;
        s3 = s3 + d2 * d;
        s4 = s4 + d2 * d2;
    }
    (s2 / n, s3 / n, s4 / n)
}

/// Variance with a configurable degrees-of-freedom adjustment.
///
/// `ddof = 0` is the population variance, `ddof = 1` the unbiased sample
/// variance. The descriptive tables use `ddof = 0`.
#[derive(Debug, Clone, Copy)]
pub struct Variance {
    pub ddof: usize,
}

impl Variance {
    pub fn new(ddof: usize) -> Self {
        Variance { ddof }
    }

    pub fn population() -> Self {
        Variance { ddof: 0 }
    }
}

impl Default for Variance {
    fn default() -> Self {
        Variance { ddof: 1 }
    }
}

impl<D, T> Statistic<D, T> for Variance
where
    D: AsRef<[T]>,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        let slice = data.as_ref();
        if slice.len() <= self.ddof || slice.is_empty() {
            return T::nan();
        }
        let mean = Mean.compute(data);
        let mut sq = T::zero();
        for &x in slice {
            let d = x - mean;
            sq = sq + d * d;
        }
        sq / T::from_usize(slice.len() - self.ddof).expect("n fits in float")
    }
}

/// Standard deviation, square root of [`Variance`].
#[derive(Debug, Clone, Copy)]
pub struct StdDev {
    pub ddof: usize,
}

impl StdDev {
    pub fn new(ddof: usize) -> Self {
        StdDev { ddof }
    }

    pub fn population() -> Self {
        StdDev { ddof: 0 }
    }
}

impl Default for StdDev {
    fn default() -> Self {
        StdDev { ddof: 1 }
    }
}

impl<D, T> Statistic<D, T> for StdDev
where
    D: AsRef<[T]>,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        Variance { ddof: self.ddof }.compute(data).sqrt()
    }
}

/// Sample skewness g1 = m3 / m2^(3/2).
///
/// The biased estimator is the default; it is what the univariate test
/// statistics and the descriptive tables are defined on. The bias-corrected
/// variant applies the usual sqrt(n(n-1))/(n-2) factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Skewness {
    pub corrected: bool,
}

impl Skewness {
    pub fn biased() -> Self {
        Skewness { corrected: false }
    }

    pub fn corrected() -> Self {
        Skewness { corrected: true }
    }
}

impl<D, T> Statistic<D, T> for Skewness
where
    D: AsRef<[T]>,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        let slice = data.as_ref();
        let n = slice.len();
        if n < 2 || (self.corrected && n < 3) {
            return T::nan();
        }

        let mean = Mean.compute(data);
        let (m2, m3, _) = central_moments(slice, mean);
        let denom = m2.sqrt().powi(3);
        if denom == T::zero() {
            return T::nan();
        }
        let g1 = m3 / denom;

        if self.corrected {
            let n_f = T::from_usize(n).expect("n fits in float");
            let one = T::one();
            let two = T::from_u8(2).expect("2");
            g1 * (n_f * (n_f - one)).sqrt() / (n_f - two)
        } else {
            g1
        }
    }
}

/// Sample excess kurtosis g2 = m4 / m2^2 - 3 (0 for a normal distribution).
///
/// Biased by default, matching the moments the test statistics are built on.
#[derive(Debug, Clone, Copy, Default)]
pub struct Kurtosis {
    pub corrected: bool,
}

impl Kurtosis {
    pub fn biased() -> Self {
        Kurtosis { corrected: false }
    }

    pub fn corrected() -> Self {
        Kurtosis { corrected: true }
    }
}

impl<D, T> Statistic<D, T> for Kurtosis
where
    D: AsRef<[T]>,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        let slice = data.as_ref();
        let n = slice.len();
        if n < 2 || (self.corrected && n < 4) {
            return T::nan();
        }

        let mean = Mean.compute(data);
        let (m2, _, m4) = central_moments(slice, mean);
        if m2 == T::zero() {
            return T::nan();
        }
        let three = T::from_u8(3).expect("3");
        let g2 = m4 / (m2 * m2) - three;

        if self.corrected {
            let n_f = T::from_usize(n).expect("n fits in float");
            let one = T::one();
            // Fisher-corrected: (n-1)/((n-2)(n-3)) * ((n+1) g2 + 6)
            let six = T::from_u8(6).expect("6");
            let two = T::from_u8(2).expect("2");
            (n_f - one) / ((n_f - two) * (n_f - three))
                * ((n_f + one) * g2 + six)
        } else {
            g2
        }
    }
}
