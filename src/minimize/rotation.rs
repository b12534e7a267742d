// src/minimize/rotation.rs
//
// Cayley-type update, rotating m about m × H without trigonometry:
//
//   a²     = tau² |m × H|²
//   m_new  = ((4 - a²) m - 4 tau m×(m×H)) / (4 + a²)
//
// Exact for |m| when m ⟂ m × H, so only round-off drift is left for the normaliser.

use rayon::prelude::*;

use crate::vec3::norm2;

#[inline]
pub fn rotate_site(m: [f64; 3], mxh: [f64; 3], mxmxh: [f64; 3], tau: f64) -> [f64; 3] {
    let a2 = tau * tau * norm2(mxh);
    let factor_plus = 4.0 + a2;
    let factor_minus = 4.0 - a2;
    let t4 = 4.0 * tau;
    [
        (factor_minus * m[0] - t4 * mxmxh[0]) / factor_plus,
        (factor_minus * m[1] - t4 * mxmxh[1]) / factor_plus,
        (factor_minus * m[2] - t4 * mxmxh[2]) / factor_plus,
    ]
}

/// Write the rotated configuration into `out`. Pinned sites and vacancies are copied through.
#[allow(clippy::too_many_arguments)]
pub fn rotation_update(
    spin: &[[f64; 3]],
    mxh: &[[f64; 3]],
    mxmxh: &[[f64; 3]],
    tau: &[f64],
    pins: &[bool],
    mu_s: &[f64],
    out: &mut [[f64; 3]],
    parallel: bool,
) {
    debug_assert_eq!(spin.len(), out.len());

    let kernel = |(i, o): (usize, &mut [f64; 3])| {
        *o = if pins[i] || mu_s[i] == 0.0 {
            spin[i]
        } else {
            rotate_site(spin[i], mxh[i], mxmxh[i], tau[i])
        };
    };

    if parallel {
        out.par_iter_mut().enumerate().for_each(kernel);
    } else {
        out.iter_mut().enumerate().for_each(kernel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minimize::torque::torque_site;

    #[test]
    fn zero_step_is_identity() {
        let m = [0.48, -0.6, 0.64];
        let (mxh, mxmxh) = torque_site(m, [0.3, 2.0, -1.1]);
        assert_eq!(rotate_site(m, mxh, mxmxh, 0.0), m);
    }

    #[test]
    fn rotation_preserves_norm_for_unit_spin() {
        let m = [0.6, 0.0, 0.8];
        let (mxh, mxmxh) = torque_site(m, [0.0, 0.0, 1.0]);
        for tau in [1e-4, 0.1, 1.0, 10.0, -3.0] {
            let n = rotate_site(m, mxh, mxmxh, tau);
            assert!((norm2(n) - 1.0).abs() < 1e-14, "tau={tau}");
        }
    }

    #[test]
    fn positive_step_turns_spin_towards_field() {
        let m = [1.0, 0.0, 0.0];
        let (mxh, mxmxh) = torque_site(m, [0.0, 0.0, 1.0]);
        let n = rotate_site(m, mxh, mxmxh, 0.5);
        assert!(n[2] > 0.0);
        assert_eq!(n[1], 0.0);
    }

    #[test]
    fn pinned_and_vacant_sites_pass_through() {
        let spin = vec![[1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0; 3]];
        let mxh = vec![[0.0, -1.0, 0.0]; 3];
        let mxmxh = vec![[0.0, 0.0, -1.0]; 3];
        let tau = vec![0.5; 3];
        let pins = vec![false, true, false];
        let mu_s = vec![1.0, 1.0, 0.0];
        let mut out = vec![[9.0; 3]; 3];
        rotation_update(&spin, &mxh, &mxmxh, &tau, &pins, &mu_s, &mut out, false);
        assert!(out[0][2] > 0.0);
        assert_eq!(out[1], spin[1]);
        assert_eq!(out[2], [0.0; 3]);
    }
}
