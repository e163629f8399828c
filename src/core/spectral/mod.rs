//! Spectral function abstraction: three concrete shapes — constant,
//! irregularly-interpolated, and regularly-sampled — unified behind a
//! closed enum rather than a trait object. This sits on the hot path of
//! every material evaluation, so dispatch is a match rather than a vtable
//! call.

pub mod constant;
pub mod interpolated;
pub mod piecewise;
pub mod sampled;

pub use constant::ConstantSf;
pub use interpolated::InterpolatedSf;
pub use sampled::SampledSf;

use crate::core::error::Result;
use crate::core::pbrt::Float;

/// A 1D wavelength-to-scalar function, evaluated at a single point rather
/// than integrated over a range. `Sellmeier` and `SpectralFunction` both
/// implement this so material constructors can accept either without
/// caring which one they got.
pub trait Function1D {
    fn value_at(&self, lambda: Float) -> Float;
}

#[derive(Debug, Clone)]
pub enum SpectralFunction {
    Constant(ConstantSf),
    Interpolated(InterpolatedSf),
    Sampled(SampledSf),
}

impl SpectralFunction {
    pub fn sample(&self, lambda_lo: Float, lambda_hi: Float) -> Result<Float> {
        match self {
            SpectralFunction::Constant(sf) => sf.sample(lambda_lo, lambda_hi),
            SpectralFunction::Interpolated(sf) => sf.sample(lambda_lo, lambda_hi),
            SpectralFunction::Sampled(sf) => sf.sample(lambda_lo, lambda_hi),
        }
    }

    pub fn sample_multiple(&self, lambda_lo: Float, lambda_hi: Float, n: usize) -> Result<SampledSf> {
        match self {
            SpectralFunction::Constant(sf) => sf.sample_multiple(lambda_lo, lambda_hi, n),
            SpectralFunction::Interpolated(sf) => sf.sample_multiple(lambda_lo, lambda_hi, n),
            SpectralFunction::Sampled(sf) => sf.sample_multiple(lambda_lo, lambda_hi, n),
        }
    }

    pub fn value_at(&self, lambda: Float) -> Float {
        match self {
            SpectralFunction::Constant(sf) => sf.value_at(lambda),
            SpectralFunction::Interpolated(sf) => sf.value_at(lambda),
            SpectralFunction::Sampled(sf) => sf.value_at(lambda),
        }
    }
}

impl Function1D for SpectralFunction {
    fn value_at(&self, lambda: Float) -> Float {
        SpectralFunction::value_at(self, lambda)
    }
}

impl From<ConstantSf> for SpectralFunction {
    fn from(sf: ConstantSf) -> Self {
        SpectralFunction::Constant(sf)
    }
}

impl From<InterpolatedSf> for SpectralFunction {
    fn from(sf: InterpolatedSf) -> Self {
        SpectralFunction::Interpolated(sf)
    }
}

impl From<SampledSf> for SpectralFunction {
    fn from(sf: SampledSf) -> Self {
        SpectralFunction::Sampled(sf)
    }
}
