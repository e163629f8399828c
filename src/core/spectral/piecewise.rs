//! Shared piecewise-linear evaluation/integration over a set of control
//! points (anchor pairs for `InterpolatedSf`, bin centres for `SampledSf`).
//! Outside the control-point range the function is linearly extrapolated
//! from the nearest end segment.

use crate::core::pbrt::Float;

/// Evaluate the piecewise-linear curve through `(xs[i], ys[i])` at `x`,
/// linearly extrapolating beyond either end. `xs` must be sorted strictly
/// increasing and non-empty.
pub fn linear_eval(xs: &[Float], ys: &[Float], x: Float) -> Float {
    if xs.len() == 1 {
        return ys[0];
    }
    if x <= xs[0] {
        let slope = (ys[1] - ys[0]) / (xs[1] - xs[0]);
        return ys[0] + slope * (x - xs[0]);
    }
    let last = xs.len() - 1;
    if x >= xs[last] {
        let slope = (ys[last] - ys[last - 1]) / (xs[last] - xs[last - 1]);
        return ys[last] + slope * (x - xs[last]);
    }
    // binary search for the segment containing x
    let idx = match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap()) {
        Ok(i) => return ys[i],
        Err(i) => i,
    };
    let (x0, x1) = (xs[idx - 1], xs[idx]);
    let (y0, y1) = (ys[idx - 1], ys[idx]);
    let t = (x - x0) / (x1 - x0);
    y0 + t * (y1 - y0)
}

/// Definite integral of the (possibly extrapolated) piecewise-linear curve
/// over `[lo, hi]`, `lo < hi`. Exact, via the trapezoid rule evaluated at
/// every control-point breakpoint inside the range plus the two range
/// endpoints — trapezoids are exact for a function that is linear between
/// consecutive breakpoints.
pub fn linear_integral(xs: &[Float], ys: &[Float], lo: Float, hi: Float) -> Float {
    let mut breakpoints: Vec<Float> = vec![lo];
    breakpoints.extend(xs.iter().copied().filter(|&x| x > lo && x < hi));
    breakpoints.push(hi);
    breakpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut total = 0.0;
    for w in breakpoints.windows(2) {
        let (x0, x1) = (w[0], w[1]);
        let y0 = linear_eval(xs, ys, x0);
        let y1 = linear_eval(xs, ys, x1);
        total += (x1 - x0) * 0.5 * (y0 + y1);
    }
    total
}

/// Mean value of the curve over `[lo, hi]`.
pub fn linear_mean(xs: &[Float], ys: &[Float], lo: Float, hi: Float) -> Float {
    linear_integral(xs, ys, lo, hi) / (hi - lo)
}
