//! Sellmeier dispersion equation: the index of refraction of an optical
//! glass as a function of wavelength, from three pairs of empirically
//! fitted coefficients.

use crate::core::pbrt::Float;
use crate::core::spectral::Function1D;

/// `n(lambda) = sqrt(1 + sum_i b_i * w^2 / (w^2 - c_i))`, with
/// `w = lambda * 1e-3` converting nanometres to the micrometre units the
/// standard Sellmeier coefficients (e.g. Schott glass catalogues) are
/// tabulated in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sellmeier {
    b1: Float,
    b2: Float,
    b3: Float,
    c1: Float,
    c2: Float,
    c3: Float,
}

impl Sellmeier {
    pub fn new(b1: Float, b2: Float, b3: Float, c1: Float, c2: Float, c3: Float) -> Self {
        Sellmeier {
            b1,
            b2,
            b3,
            c1,
            c2,
            c3,
        }
    }

    /// Index of refraction at `lambda_nm`. At a resonance (`w^2 == c_i`)
    /// this does not special-case the division and will propagate the
    /// resulting infinity/NaN through `sqrt` rather than error, since none
    /// of the standard glass catalogues have a resonance inside the visible
    /// range this crate samples; a warning is logged instead.
    pub fn n(&self, lambda_nm: Float) -> Float {
        let w = lambda_nm * 1e-3;
        let w2 = w * w;
        const RESONANCE_EPS: Float = 1e-9;
        if (w2 - self.c1).abs() < RESONANCE_EPS
            || (w2 - self.c2).abs() < RESONANCE_EPS
            || (w2 - self.c3).abs() < RESONANCE_EPS
        {
            log::warn!(
                "sellmeier: lambda={}nm is within {} of a resonance term, index is unreliable",
                lambda_nm,
                RESONANCE_EPS
            );
        }
        let sum = self.b1 * w2 / (w2 - self.c1)
            + self.b2 * w2 / (w2 - self.c2)
            + self.b3 * w2 / (w2 - self.c3);
        (1.0 + sum).sqrt()
    }
}

impl Function1D for Sellmeier {
    fn value_at(&self, lambda: Float) -> Float {
        self.n(lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // BK7 coefficients (Schott catalogue); n(587.56nm) ~= 1.5168.
    fn bk7() -> Sellmeier {
        Sellmeier::new(
            1.039_612_12,
            0.231_792_344,
            1.010_469_45,
            0.006_000_699_84,
            0.020_017_9144,
            103.560_653,
        )
    }

    #[test]
    fn bk7_index_at_the_helium_d_line_matches_the_published_value() {
        let n = bk7().n(587.56);
        assert_abs_diff_eq!(n, 1.5168, epsilon = 1e-4);
    }

    #[test]
    fn index_decreases_with_increasing_wavelength_away_from_resonance() {
        let g = bk7();
        assert!(g.n(400.0) > g.n(700.0));
    }
}
