//! `ConstantSf`: a spectral function that returns the same scalar at every
//! wavelength.

use std::cell::RefCell;

use crate::core::error::{Error, Result};
use crate::core::pbrt::Float;
use crate::core::spectral::sampled::SampledSf;

#[derive(Debug, Clone)]
pub struct ConstantSf {
    v: Float,
    /// One-slot cache of the most recently produced `SampledSf`, keyed by
    /// the request shape that produced it. `RefCell` because
    /// `sample_multiple` takes `&self` — the `SpectralFunction` interface
    /// is read-only.
    cache: RefCell<Option<((Float, Float, usize), SampledSf)>>,
}

impl ConstantSf {
    pub fn new(v: Float) -> Self {
        ConstantSf {
            v,
            cache: RefCell::new(None),
        }
    }

    pub fn value(&self) -> Float {
        self.v
    }

    pub fn value_at(&self, _lambda: Float) -> Float {
        self.v
    }

    pub fn sample(&self, lambda_lo: Float, lambda_hi: Float) -> Result<Float> {
        validate_range(lambda_lo, lambda_hi)?;
        Ok(self.v)
    }

    pub fn sample_multiple(&self, lambda_lo: Float, lambda_hi: Float, n: usize) -> Result<SampledSf> {
        validate_range(lambda_lo, lambda_hi)?;
        if n < 1 {
            return Err(Error::InvalidArgument("n must be >= 1".into()));
        }
        let shape = (lambda_lo, lambda_hi, n);
        if let Some((cached_shape, cached)) = &*self.cache.borrow() {
            if *cached_shape == shape {
                return Ok(cached.clone());
            }
        }
        let bins = vec![self.v; n];
        let sampled = SampledSf::from_bins(lambda_lo, lambda_hi, bins, false)?;
        *self.cache.borrow_mut() = Some((shape, sampled.clone()));
        Ok(sampled)
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

    #[test]
    fn sample_always_returns_the_constant() {
        let sf = ConstantSf::new(0.5);
        assert_eq!(sf.sample(400.0, 700.0).unwrap(), 0.5);
    }

    #[test]
    fn every_bin_of_sample_multiple_equals_the_constant() {
        let sf = ConstantSf::new(0.9);
        let sampled = sf.sample_multiple(400.0, 700.0, 16).unwrap();
        for i in 0..16 {
            assert_eq!(sampled.bin(i), 0.9);
        }
    }

    #[test]
    fn repeated_identical_request_hits_the_cache() {
        let sf = ConstantSf::new(0.2);
        let a = sf.sample_multiple(400.0, 700.0, 8).unwrap();
        let b = sf.sample_multiple(400.0, 700.0, 8).unwrap();
        assert_eq!(a.bin(0), b.bin(0));
        assert_eq!(sf.cache.borrow().as_ref().unwrap().0, (400.0, 700.0, 8));
    }

    #[test]
    fn non_positive_wavelength_is_rejected() {
        let sf = ConstantSf::new(1.0);
        assert!(sf.sample(-1.0, 10.0).is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let sf = ConstantSf::new(1.0);
        assert!(sf.sample(10.0, 5.0).is_err());
    }
}
