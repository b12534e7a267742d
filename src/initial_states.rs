// src/initial_states.rs
//
// Initial spin configurations (seeds) for minimisation runs.
//
// Conventions:
// - Every generator writes through `SpinState::set_with`, so vacancies stay at (0,0,0)
//   and non-vacancy sites are normalised.
// - Random generators are seeded explicitly so runs are reproducible.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::mesh::CuboidMesh;
use crate::spin_state::SpinState;
use crate::vec3::normalize;

/// Set a uniform direction (normalised).
pub fn init_uniform(s: &mut SpinState, dir: [f64; 3]) {
    s.set_uniform(dir[0], dir[1], dir[2]);
}

/// Uniform + small random tilt (useful to break symmetry).
pub fn init_uniform_with_noise(s: &mut SpinState, dir: [f64; 3], noise: f64, seed: u64) {
    let base = normalize(dir);
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let tilts: Vec<[f64; 3]> = (0..s.n_sites())
        .map(|_| {
            [
                noise * rng.gen_range(-1.0..1.0),
                noise * rng.gen_range(-1.0..1.0),
                noise * rng.gen_range(-1.0..1.0),
            ]
        })
        .collect();
    s.set_with(|id| {
        let t = tilts[id];
        [base[0] + t[0], base[1] + t[1], base[2] + t[2]]
    });
}

/// Random directions, uniform on the sphere (Marsaglia 1972).
pub fn init_random(s: &mut SpinState, seed: u64) {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let dirs: Vec<[f64; 3]> = (0..s.n_sites())
        .map(|_| loop {
            let u: f64 = rng.gen_range(-1.0..1.0);
            let v: f64 = rng.gen_range(-1.0..1.0);
            let r2 = u * u + v * v;
            if r2 < 1.0 && r2 > 0.0 {
                let f = 2.0 * (1.0 - r2).sqrt();
                break [u * f, v * f, 1.0 - 2.0 * r2];
            }
        })
        .collect();
    s.set_with(|id| dirs[id]);
}

/// 180° wall along x: m rotates in the x–z plane from -z (left) to +z (right).
///
/// - `x0`   : wall centre (same units as `mesh.dx`)
/// - `width`: characteristic wall width
pub fn init_domain_wall(s: &mut SpinState, mesh: &CuboidMesh, x0: f64, width: f64) {
    s.set_with(|id| {
        let x = mesh.position(id)[0];
        let u = (x - x0) / width;
        [1.0 / u.cosh(), 0.0, u.tanh()]
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::norm2;

    #[test]
    fn random_state_is_unit_and_reproducible() {
        let mut a = SpinState::new(32).unwrap();
        let mut b = SpinState::new(32).unwrap();
        init_random(&mut a, 7);
        init_random(&mut b, 7);
        assert_eq!(a.spin, b.spin);
        for v in &a.spin {
            assert!((norm2(*v) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn noisy_state_keeps_vacancies_at_zero() {
        let mut s = SpinState::new(8).unwrap();
        let mut mu = vec![1.0; 8];
        mu[3] = 0.0;
        s.set_mu_s(mu).unwrap();
        init_uniform_with_noise(&mut s, [0.0, 0.0, 1.0], 0.1, 3);
        assert_eq!(s.spin[3], [0.0; 3]);
        assert!(s.spin[0][2] > 0.9);
    }

    #[test]
    fn domain_wall_has_opposite_mz_at_edges() {
        let mesh = CuboidMesh::new(64, 1, 1, 1.0, 1.0, 1.0).unwrap();
        let mut s = SpinState::new(mesh.n_sites()).unwrap();
        init_domain_wall(&mut s, &mesh, 32.0, 4.0);
        let left = s.spin[0];
        let right = s.spin[63];
        assert!(left[2] < -0.99 && right[2] > 0.99);
        assert!((norm2(s.spin[31]) - 1.0).abs() < 1e-12);
    }
}
