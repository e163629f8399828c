//! A dielectric interface material: reflection and refraction at a smooth
//! boundary between two transparent media, with Fresnel-weighted recursive
//! ray spawning instead of BSDF importance sampling. The index of refraction
//! is supplied as a 1D wavelength function — a closed-form Sellmeier curve
//! or a general spectral function — rather than hardcoded to one shape.

use crate::core::geometry::{Normal3, Point3, Transform};
use crate::core::pbrt::{clamp_t, Float};
use crate::core::ray::Ray;
use crate::core::sellmeier::Sellmeier;
use crate::core::spectral::{Function1D, SpectralFunction};

/// The index-of-refraction evaluator a `DielectricInterface` consumes:
/// either a closed-form Sellmeier curve or a general spectral function.
/// Closed over the two the same way `SpectralFunction` itself closes over
/// its variants, rather than boxing a trait object.
#[derive(Debug, Clone)]
pub enum IndexFunction {
    Sellmeier(Sellmeier),
    Spectral(SpectralFunction),
}

impl Function1D for IndexFunction {
    fn value_at(&self, lambda: Float) -> Float {
        match self {
            IndexFunction::Sellmeier(s) => s.value_at(lambda),
            IndexFunction::Spectral(sf) => sf.value_at(lambda),
        }
    }
}

impl From<Sellmeier> for IndexFunction {
    fn from(s: Sellmeier) -> Self {
        IndexFunction::Sellmeier(s)
    }
}

impl From<SpectralFunction> for IndexFunction {
    fn from(sf: SpectralFunction) -> Self {
        IndexFunction::Spectral(sf)
    }
}

/// Boundary between two dielectric media, dispersive via its `index`.
/// `cutoff` is the importance-culling threshold below which a reflected or
/// transmitted contribution is not worth the recursive trace. `transmission`
/// is reserved for bulk attenuation along the transmitted ray and is never
/// evaluated by `evaluate_surface`/`evaluate_volume` yet; it reuses
/// `SpectralFunction`'s own two-endpoint `sample` as its 2D (wavelength,
/// path length) shape rather than introducing a second function type.
#[derive(Debug, Clone)]
pub struct DielectricInterface {
    pub index: IndexFunction,
    pub transmission: Option<SpectralFunction>,
    pub cutoff: f64,
}

impl DielectricInterface {
    pub fn new(index: impl Into<IndexFunction>, cutoff: f64) -> Self {
        DielectricInterface {
            index: index.into(),
            transmission: None,
            cutoff,
        }
    }

    pub fn with_transmission(mut self, transmission: SpectralFunction) -> Self {
        self.transmission = Some(transmission);
        self
    }

    /// Volume interaction: bulk absorption is reserved but not implemented,
    /// so the spectrum passes through unchanged.
    pub fn evaluate_volume<R: Ray>(&self, _ray: &R, spectrum: R::Spectrum) -> R::Spectrum {
        spectrum
    }

    /// Surface interaction at a hit point. `normal`, `inside_point` and
    /// `outside_point` are given in local space; `local_to_world` and its
    /// inverse `world_to_local` carry geometry between the material's local
    /// frame and the frame `ray` and `world` operate in.
    pub fn evaluate_surface<R: Ray>(
        &self,
        ray: &R,
        normal: Normal3,
        exiting: bool,
        inside_point: Point3,
        outside_point: Point3,
        world_to_local: &Transform,
        local_to_world: &Transform,
        world: &R::World,
    ) -> R::Spectrum {
        let i = ray.direction().transform(world_to_local).normalise();
        let n = normal.normalise();
        let c1 = -n.dot_vec(&i);

        let lambda = ray.refraction_wavelength();
        let index = self.index.value_at(lambda);
        let (n1, n2) = if exiting { (index, 1.0) } else { (1.0, index) };
        let gamma = n1 / n2;
        let c2t = 1.0 - gamma * gamma * (1.0 - c1 * c1);

        let r_local = i + n.as_vector() * (2.0 * c1);

        if c2t <= 0.0 {
            let r_world = r_local.transform(local_to_world);
            let origin = if exiting { inside_point } else { outside_point };
            let origin_world = origin.transform(local_to_world);
            let daughter = ray.spawn_daughter(origin_world, r_world);
            return daughter.trace(world);
        }

        // The daughter direction's sign flips opposite the `exiting` flag,
        // not with it; verified against a worked normal-incidence example
        // in DESIGN.md.
        let sign = if exiting { -1.0 } else { 1.0 };
        let sqrt_c2t = c2t.sqrt();
        let t_local = i * gamma + n.as_vector() * (gamma * c1 + sign * sqrt_c2t);
        let ct = -n.dot_vec(&t_local);

        let r_parl = (n1 * c1 - n2 * ct) / (n1 * c1 + n2 * ct);
        let r_perp = (n1 * ct - n2 * c1) / (n1 * ct + n2 * c1);
        // Clamped: algebraically in [0, 1], but near grazing incidence the
        // squared terms can round a hair past 1.0.
        let r = clamp_t(0.5 * (r_parl * r_parl + r_perp * r_perp), 0.0, 1.0);
        let t = 1.0 - r;

        let r_world = r_local.transform(local_to_world);
        let t_world = t_local.transform(local_to_world);
        let inside_world = inside_point.transform(local_to_world);
        let outside_world = outside_point.transform(local_to_world);
        let (reflect_origin, transmit_origin) = if exiting {
            (inside_world, outside_world)
        } else {
            (outside_world, inside_world)
        };

        let mut result = if r > self.cutoff {
            let reflected = ray.spawn_daughter(reflect_origin, r_world);
            let mut s = reflected.trace(world);
            s.mul_scalar(r);
            s
        } else {
            ray.new_spectrum()
        };
        if t > self.cutoff {
            let transmitted = ray.spawn_daughter(transmit_origin, t_world);
            let mut s = transmitted.trace(world);
            s.mul_scalar(t);
            let bins = s.bins().to_vec();
            result.add_array(&bins);
        }
        result
    }
}
