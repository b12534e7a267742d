// src/minimize/torque.rs
//
// Transverse torque m × H and double torque m × (m × H), per site.
// m × (m × H) vanishes exactly where m is parallel or antiparallel to H.

use rayon::prelude::*;

use crate::vec3::cross;

#[inline]
pub fn torque_site(m: [f64; 3], h: [f64; 3]) -> ([f64; 3], [f64; 3]) {
    let mxh = cross(m, h);
    (mxh, cross(m, mxh))
}

/// Fill `mxh` and `mxmxh` from the spin and effective field.
pub fn compute_torques(
    spin: &[[f64; 3]],
    h_eff: &[[f64; 3]],
    mxh: &mut [[f64; 3]],
    mxmxh: &mut [[f64; 3]],
    parallel: bool,
) {
    debug_assert_eq!(spin.len(), h_eff.len());
    debug_assert_eq!(spin.len(), mxh.len());
    debug_assert_eq!(spin.len(), mxmxh.len());

    let kernel = |(i, (t1, t2)): (usize, (&mut [f64; 3], &mut [f64; 3]))| {
        let (a, b) = torque_site(spin[i], h_eff[i]);
        *t1 = a;
        *t2 = b;
    };

    if parallel {
        mxh.par_iter_mut()
            .zip(mxmxh.par_iter_mut())
            .enumerate()
            .for_each(kernel);
    } else {
        mxh.iter_mut().zip(mxmxh.iter_mut()).enumerate().for_each(kernel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_torque_vanishes_for_aligned_spin() {
        let (mxh, mxmxh) = torque_site([0.0, 0.0, 1.0], [0.0, 0.0, -3.0]);
        assert_eq!(mxh, [0.0; 3]);
        assert_eq!(mxmxh, [0.0; 3]);
    }

    #[test]
    fn double_torque_points_against_the_field_projection() {
        // m = x, H = z: m × H = -y, m × (m × H) = -z
        let (mxh, mxmxh) = torque_site([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert_eq!(mxh, [0.0, -1.0, 0.0]);
        assert_eq!(mxmxh, [0.0, 0.0, -1.0]);
    }

    #[test]
    fn parallel_and_serial_agree() {
        let spin: Vec<[f64; 3]> = (0..100)
            .map(|i| {
                let a = i as f64 * 0.1;
                [a.cos(), a.sin(), 0.0]
            })
            .collect();
        let h = vec![[0.3, -0.2, 1.0]; 100];
        let (mut a1, mut b1) = (vec![[0.0; 3]; 100], vec![[0.0; 3]; 100]);
        let (mut a2, mut b2) = (vec![[0.0; 3]; 100], vec![[0.0; 3]; 100]);
        compute_torques(&spin, &h, &mut a1, &mut b1, false);
        compute_torques(&spin, &h, &mut a2, &mut b2, true);
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
    }
}
