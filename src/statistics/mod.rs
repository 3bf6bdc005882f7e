mod mean;
mod moments;
mod quantile;

pub use mean::Mean;
pub use moments::{Kurtosis, Skewness, StdDev, Variance};
pub use quantile::Quantile;

/// An estimator that maps a data set to a value.
pub trait Statistic<D, T> {
    fn compute(&self, data: &D) -> T;
}
