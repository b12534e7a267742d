// src/minimize/step_size.rs
//
// Two-point (Barzilai–Borwein) step sizes, one per site.
//
//   ds = m - m_prev,   dy = m×(m×H) - [m×(m×H)]_prev
//   even counter: tau = (ds·ds) / (ds·dy)
//   odd counter : tau = (ds·dy) / (dy·dy)
//
// A zero (or non-finite) quotient denominator falls back to a fixed small step.

use rayon::prelude::*;

use crate::vec3::{dot, sub};

/// Step used where the secant denominator vanishes, and on the very first step.
pub const TAU_FALLBACK: f64 = 1e-4;

/// Step size for a single site.
#[inline]
pub fn bb_step(ds: [f64; 3], dy: [f64; 3], counter: usize, fallback: f64) -> f64 {
    let (num, den) = if counter % 2 == 0 {
        (dot(ds, ds), dot(ds, dy))
    } else {
        (dot(ds, dy), dot(dy, dy))
    };
    if den == 0.0 {
        return fallback;
    }
    let tau = num / den;
    if tau.is_finite() { tau } else { fallback }
}

/// Fill `tau` from two consecutive iterates.
#[allow(clippy::too_many_arguments)]
pub fn estimate_step_sizes(
    spin: &[[f64; 3]],
    spin_prev: &[[f64; 3]],
    mxmxh: &[[f64; 3]],
    mxmxh_prev: &[[f64; 3]],
    counter: usize,
    fallback: f64,
    tau: &mut [f64],
    parallel: bool,
) {
    debug_assert_eq!(spin.len(), tau.len());

    let kernel = |(i, t): (usize, &mut f64)| {
        let ds = sub(spin[i], spin_prev[i]);
        let dy = sub(mxmxh[i], mxmxh_prev[i]);
        *t = bb_step(ds, dy, counter, fallback);
    };

    if parallel {
        tau.par_iter_mut().enumerate().for_each(kernel);
    } else {
        tau.iter_mut().enumerate().for_each(kernel);
    }
}

/// max_i |tau_i|
pub fn max_abs_step(tau: &[f64], parallel: bool) -> f64 {
    if parallel {
        tau.par_iter().map(|t| t.abs()).reduce(|| 0.0, f64::max)
    } else {
        tau.iter().map(|t| t.abs()).fold(0.0, f64::max)
    }
}
