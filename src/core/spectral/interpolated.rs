//! `InterpolatedSf`: an irregularly-sampled spectral function given as
//! parallel `(wavelength, value)` arrays, linearly interpolated between
//! anchors and linearly extrapolated beyond them.

use crate::core::error::{Error, Result};
use crate::core::pbrt::Float;
use crate::core::spectral::piecewise::{linear_eval, linear_mean};
use crate::core::spectral::sampled::SampledSf;

#[derive(Debug, Clone)]
pub struct InterpolatedSf {
    lambdas: Vec<Float>,
    values: Vec<Float>,
}

impl InterpolatedSf {
    pub fn new(lambdas: Vec<Float>, values: Vec<Float>) -> Result<Self> {
        if lambdas.len() != values.len() {
            return Err(Error::InvalidArgument(
                "wavelength and value arrays must have matching length".into(),
            ));
        }
        if lambdas.len() < 2 {
            return Err(Error::InvalidArgument(
                "interpolated spectral function needs at least two anchors".into(),
            ));
        }
        if lambdas.iter().any(|&l| l <= 0.0) {
            return Err(Error::InvalidArgument(
                "wavelengths must be positive".into(),
            ));
        }
        if !lambdas.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::InvalidArgument(
                "wavelengths must be strictly increasing".into(),
            ));
        }
        Ok(InterpolatedSf { lambdas, values })
    }

    /// Mean over `[lambda_lo, lambda_hi]`. `InterpolatedSf` has no
    /// `fast_sample` flag (unlike `SampledSf`), so it always computes the
    /// exact piecewise-linear mean; `sample_multiple` is likewise always
    /// "slow" for this variant.
    pub fn sample(&self, lambda_lo: Float, lambda_hi: Float) -> Result<Float> {
        validate_range(lambda_lo, lambda_hi)?;
        Ok(linear_mean(&self.lambdas, &self.values, lambda_lo, lambda_hi))
    }

    pub fn sample_multiple(&self, lambda_lo: Float, lambda_hi: Float, n: usize) -> Result<SampledSf> {
        validate_range(lambda_lo, lambda_hi)?;
        if n < 1 {
            return Err(Error::InvalidArgument("n must be >= 1".into()));
        }
        let delta = (lambda_hi - lambda_lo) / n as Float;
        let mut bins = Vec::with_capacity(n);
        for i in 0..n {
            let bin_lo = lambda_lo + i as Float * delta;
            let bin_hi = bin_lo + delta;
            bins.push(linear_mean(&self.lambdas, &self.values, bin_lo, bin_hi));
        }
        SampledSf::from_bins(lambda_lo, lambda_hi, bins, false)
    }

    pub fn value_at(&self, lambda: Float) -> Float {
        linear_eval(&self.lambdas, &self.values, lambda)
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
