use num_traits::{Float, FromPrimitive};

use super::Statistic;

/// Arithmetic mean with Kahan-compensated summation.
///
/// Compensation matters here because downstream moment estimators subtract
/// the mean from every observation; a drifting mean biases skewness and
/// kurtosis on long vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl<D, T> Statistic<D, T> for Mean
where
    D: AsRef<[T]>,
    T: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> T {
        let slice = data.as_ref();
        if slice.is_empty() {
            return T::nan();
        }

        let mut sum = T::zero();
        let mut c = T::zero();
        for &x in slice {
            let y = x - c;
            let t = sum + y;
            c = (t - sum) - y;
            sum = t;
        }

        sum / T::from_usize(slice.len()).expect("n fits in float")
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn empty_slice_is_nan() {
        let m: f64 = Mean.compute(&Vec::<f64>::new());
        assert!(m.is_nan());
    }

    #[test]
    fn integer_mean() {
        assert_abs_diff_eq!(Mean.compute(&[1.0_f64, 2.0, 3.0, 4.0]), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn works_for_f32() {
        assert_abs_diff_eq!(Mean.compute(&[0.5_f32, 1.5]), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn compensated_sum_stays_accurate() {
        let data = vec![0.1_f64; 100_000];
        assert_abs_diff_eq!(Mean.compute(&data), 0.1, epsilon = 1e-14);
    }
}
