//! `SampledSf`: a regularly-sampled spectral function over `n` bins
//! spanning `[lambda_min, lambda_max]`, sampled at each bin's centre. Also
//! the concrete return type of every `sample_multiple` call.

use crate::core::error::{Error, Result};
use crate::core::pbrt::Float;
use crate::core::spectral::piecewise::{linear_eval, linear_mean};

#[derive(Debug, Clone, PartialEq)]
pub struct SampledSf {
    lambda_min: Float,
    lambda_max: Float,
    bins: Vec<Float>,
    /// When true, `sample`/`sample_multiple` interpolate at bin centres
    /// instead of integrating.
    fast_sample: bool,
}

impl SampledSf {
    pub fn from_bins(
        lambda_min: Float,
        lambda_max: Float,
        bins: Vec<Float>,
        fast_sample: bool,
    ) -> Result<Self> {
        if lambda_min <= 0.0 || lambda_max <= 0.0 {
            return Err(Error::InvalidArgument(
                "wavelengths must be positive".into(),
            ));
        }
        if lambda_min >= lambda_max {
            return Err(Error::InvalidArgument(
                "lambda_min must be < lambda_max".into(),
            ));
        }
        if bins.is_empty() {
            return Err(Error::InvalidArgument("n must be >= 1".into()));
        }
        Ok(SampledSf {
            lambda_min,
            lambda_max,
            bins,
            fast_sample,
        })
    }

    pub fn n(&self) -> usize {
        self.bins.len()
    }

    pub fn lambda_min(&self) -> Float {
        self.lambda_min
    }

    pub fn lambda_max(&self) -> Float {
        self.lambda_max
    }

    pub fn delta(&self) -> Float {
        (self.lambda_max - self.lambda_min) / self.n() as Float
    }

    pub fn fast_sample(&self) -> bool {
        self.fast_sample
    }

    pub fn bin(&self, i: usize) -> Float {
        self.bins[i]
    }

    pub fn bins(&self) -> &[Float] {
        &self.bins
    }

    /// The wavelength at the centre of bin `i`: `lambda_min + (i+0.5)*delta`.
    pub fn bin_centre(&self, i: usize) -> Float {
        self.lambda_min + (i as Float + 0.5) * self.delta()
    }

    fn bin_centres(&self) -> Vec<Float> {
        (0..self.n()).map(|i| self.bin_centre(i)).collect()
    }

    /// Point evaluation at `lambda`, interpolating between bin centres
    /// (extrapolating linearly beyond the first/last one) regardless of
    /// `fast_sample` — that flag only governs the two-endpoint `sample`.
    pub fn value_at(&self, lambda: Float) -> Float {
        linear_eval(&self.bin_centres(), &self.bins, lambda)
    }

    pub fn sample(&self, lambda_lo: Float, lambda_hi: Float) -> Result<Float> {
        validate_range(lambda_lo, lambda_hi)?;
        let centres = self.bin_centres();
        if self.fast_sample {
            let mid = (lambda_lo + lambda_hi) / 2.0;
            Ok(linear_eval(&centres, &self.bins, mid))
        } else {
            Ok(linear_mean(&centres, &self.bins, lambda_lo, lambda_hi))
        }
    }

    pub fn sample_multiple(&self, lambda_lo: Float, lambda_hi: Float, n: usize) -> Result<SampledSf> {
        validate_range(lambda_lo, lambda_hi)?;
        if n < 1 {
            return Err(Error::InvalidArgument("n must be >= 1".into()));
        }
        if n == self.n() && lambda_lo == self.lambda_min && lambda_hi == self.lambda_max {
            return Ok(self.clone());
        }
        let centres = self.bin_centres();
        let delta = (lambda_hi - lambda_lo) / n as Float;
        let mut out_bins = Vec::with_capacity(n);
        for i in 0..n {
            let bin_lo = lambda_lo + i as Float * delta;
            let bin_hi = bin_lo + delta;
            let v = if self.fast_sample {
                linear_eval(&centres, &self.bins, bin_lo + delta / 2.0)
            } else {
                linear_mean(&centres, &self.bins, bin_lo, bin_hi)
            };
            out_bins.push(v);
        }
        SampledSf::from_bins(lambda_lo, lambda_hi, out_bins, self.fast_sample)
    }
}

fn validate_range(lambda_lo: Float, lambda_hi: Float) -> Result<()> {
    if lambda_lo <= 0.0 || lambda_hi <= 0.0 {
        return Err(Error::InvalidArgument(
            "wavelengths must be positive".into(),
        ));
    }
    if lambda_lo >= lambda_hi {
        return Err(Error::InvalidArgument("lambda_lo must be < lambda_hi".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sample_multiple_returns_self_on_matching_request() {
        let sf = SampledSf::from_bins(400.0, 700.0, vec![1.0, 2.0, 3.0], false).unwrap();
        let same = sf.sample_multiple(400.0, 700.0, 3).unwrap();
        assert_eq!(same, sf);
    }

    #[test]
    fn fast_mode_samples_at_bin_centre() {
        let sf = SampledSf::from_bins(1.0, 5.0, vec![0.0, 4.0], true).unwrap();
        // centres are at 2.0 and 4.0, linear between them
        let v = sf.sample(2.5, 3.5).unwrap(); // midpoint 3.0 -> interpolated value 2.0
        assert_abs_diff_eq!(v, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn slow_mode_integrates_over_the_requested_range() {
        let sf = SampledSf::from_bins(1.0, 5.0, vec![0.0, 4.0], false).unwrap();
        let v = sf.sample(1.0, 5.0).unwrap();
        assert_abs_diff_eq!(v, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn value_at_interpolates_between_bin_centres() {
        let sf = SampledSf::from_bins(1.0, 5.0, vec![0.0, 4.0], false).unwrap();
        // centres at 2.0 and 4.0; midpoint 3.0 -> interpolated value 2.0
        assert_abs_diff_eq!(sf.value_at(3.0), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_empty_bins() {
        assert!(SampledSf::from_bins(1.0, 2.0, vec![], false).is_err());
    }

    #[test]
    fn rejects_non_positive_lambda_min() {
        assert!(SampledSf::from_bins(-1.0, 2.0, vec![1.0], false).is_err());
    }
}
