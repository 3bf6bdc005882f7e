use num_traits::{Float, FromPrimitive};

use super::Statistic;

/// Linear-interpolation quantile estimator (R type 7).
///
/// Q(p) sits at rank h = (n - 1) * p of the sorted sample, interpolating
/// between the two neighbouring order statistics. This is the definition the
/// descriptive tables report (median = Q(0.5), 95% quantile = Q(0.95)).
#[derive(Debug, Clone, Copy)]
pub struct Quantile {
    p: f64,
}

impl Quantile {
    /// Quantile estimator for probability `p`. `compute` yields NaN when
    /// `p` is outside `[0, 1]`.
    pub fn new(p: f64) -> Self {
        Self { p }
    }

    pub fn median() -> Self {
        Self { p: 0.5 }
    }
}

impl<D, T> Statistic<D, T> for Quantile
where
    D: AsRef<[T]>,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        let slice = data.as_ref();
        let n = slice.len();
        if n == 0 || !(0.0..=1.0).contains(&self.p) {
            return T::nan();
        }

        let mut sorted = slice.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("no NaNs in sample"));

        let h = (n - 1) as f64 * self.p;
        let lo = h.floor() as usize;
        let hi = lo.min(n - 1).saturating_add(1).min(n - 1);
        let frac = T::from_f64(h - h.floor()).expect("fraction fits in float");

        sorted[lo] + frac * (sorted[hi] - sorted[lo])
    }
}
