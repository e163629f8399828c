//! The ray/spectrum/world collaborator interfaces: the dielectric material
//! is written against these traits rather than a concrete renderer, so it
//! can be driven by whatever ray/world types an embedding host supplies.

use crate::core::geometry::{Point3, Vector3};
use crate::core::pbrt::Float;

/// A radiance accumulator with a fixed number of wavelength bins.
pub trait Spectrum: Clone {
    fn bins(&self) -> &[Float];
    fn mul_scalar(&mut self, f: Float);
    /// Bin-wise add; `other.len()` must equal `self.bins().len()`.
    fn add_array(&mut self, other: &[Float]);
}

/// A traced ray, carrying enough state for the dielectric material to spawn
/// reflected/transmitted daughters and recurse into the world.
pub trait Ray: Sized {
    type Spectrum: Spectrum;
    type World;

    fn origin(&self) -> Point3;
    fn direction(&self) -> Vector3;
    /// The wavelength, in nanometres, this ray currently carries for
    /// dispersion calculations.
    fn refraction_wavelength(&self) -> Float;
    /// A fresh, zeroed spectrum with this ray's bin count.
    fn new_spectrum(&self) -> Self::Spectrum;
    /// A daughter ray from `origin` along `direction`, carrying this ray's
    /// depth counter forward. Implementations refuse to recurse beyond a
    /// configured depth limit by returning an already-terminated ray whose
    /// `trace` immediately yields a zero spectrum.
    fn spawn_daughter(&self, origin: Point3, direction: Vector3) -> Self;
    fn trace(&self, world: &Self::World) -> Self::Spectrum;
}

#[cfg(test)]
pub mod testing {
    //! Minimal `Ray`/`Spectrum`/`World` implementations used to exercise
    //! `materials::dielectric` without a full renderer.
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub struct ToySpectrum {
        pub bins: Vec<Float>,
    }

    impl ToySpectrum {
        pub fn zero(n: usize) -> Self {
            ToySpectrum { bins: vec![0.0; n] }
        }
    }

    impl Spectrum for ToySpectrum {
        fn bins(&self) -> &[Float] {
            &self.bins
        }

        fn mul_scalar(&mut self, f: Float) {
            for b in &mut self.bins {
                *b *= f;
            }
        }

        fn add_array(&mut self, other: &[Float]) {
            assert_eq!(self.bins.len(), other.len());
            for (b, o) in self.bins.iter_mut().zip(other.iter()) {
                *b += *o;
            }
        }
    }

    /// A world that answers every trace with a fixed spectrum, regardless
    /// of the ray — enough to test the dielectric algorithm's branching and
    /// weighting in isolation from any real scene.
    pub struct ToyWorld {
        pub answer: ToySpectrum,
    }

    #[derive(Debug, Clone)]
    pub struct ToyRay {
        pub origin: Point3,
        pub direction: Vector3,
        pub lambda: Float,
        pub n_bins: usize,
        pub depth: u32,
        pub max_depth: u32,
    }

    impl Ray for ToyRay {
        type Spectrum = ToySpectrum;
        type World = ToyWorld;

        fn origin(&self) -> Point3 {
            self.origin
        }

        fn direction(&self) -> Vector3 {
            self.direction
        }

        fn refraction_wavelength(&self) -> Float {
            self.lambda
        }

        fn new_spectrum(&self) -> Self::Spectrum {
            ToySpectrum::zero(self.n_bins)
        }

        fn spawn_daughter(&self, origin: Point3, direction: Vector3) -> Self {
            ToyRay {
                origin,
                direction,
                lambda: self.lambda,
                n_bins: self.n_bins,
                depth: self.depth + 1,
                max_depth: self.max_depth,
            }
        }

        fn trace(&self, world: &Self::World) -> Self::Spectrum {
            if self.depth >= self.max_depth {
                return self.new_spectrum();
            }
            world.answer.clone()
        }
    }
}
