// src/effective_field/exchange.rs
//
// Nearest-neighbour Heisenberg exchange.
//
//   E   = -J Σ_<i,j> S_i · S_j      (each pair counted once)
//   H_i =  J Σ_j S_j                (all neighbours of i)

use super::EnergyTerm;
use crate::mesh::CuboidMesh;
use crate::vec3::dot;

#[derive(Debug, Clone)]
pub struct Exchange {
    j: f64,
    neighbours: Vec<[Option<usize>; 6]>,
}

impl Exchange {
    pub fn new(mesh: &CuboidMesh, j: f64) -> Self {
        let neighbours = (0..mesh.n_sites()).map(|id| *mesh.neighbours(id)).collect();
        Self { j, neighbours }
    }

    pub fn j(&self) -> f64 {
        self.j
    }
}

impl EnergyTerm for Exchange {
    fn name(&self) -> &str {
        "exchange"
    }

    fn compute_field(&self, _t: f64, spin: &[[f64; 3]]) -> Vec<[f64; 3]> {
        self.neighbours
            .iter()
            .map(|ngs| {
                let mut f = [0.0; 3];
                for &j in ngs.iter().flatten() {
                    let s = spin[j];
                    f[0] += self.j * s[0];
                    f[1] += self.j * s[1];
                    f[2] += self.j * s[2];
                }
                f
            })
            .collect()
    }

    fn energy(&self, spin: &[[f64; 3]]) -> f64 {
        // Only the +x, +y, +z slots so each bond is visited once.
        let mut e = 0.0;
        for (i, ngs) in self.neighbours.iter().enumerate() {
            for slot in [1, 3, 5] {
                if let Some(j) = ngs[slot] {
                    e += dot(spin[i], spin[j]);
                }
            }
        }
        -self.j * e
    }

    fn n_sites(&self) -> Option<usize> {
        Some(self.neighbours.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_sums_neighbour_spins() {
        let mesh = CuboidMesh::new(3, 1, 1, 1.0, 1.0, 1.0).unwrap();
        let ex = Exchange::new(&mesh, 2.0);
        let spin = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let h = ex.compute_field(0.0, &spin);
        assert_eq!(h[0], [0.0, 2.0, 0.0]);
        assert_eq!(h[1], [2.0, 0.0, 2.0]);
        assert_eq!(h[2], [0.0, 2.0, 0.0]);
    }

    #[test]
    fn aligned_chain_energy_counts_each_bond_once() {
        let mesh = CuboidMesh::new(4, 1, 1, 1.0, 1.0, 1.0).unwrap();
        let ex = Exchange::new(&mesh, 1.5);
        let spin = vec![[0.0, 0.0, 1.0]; 4];
        assert_eq!(ex.energy(&spin), -1.5 * 3.0);

        let ring = CuboidMesh::with_periodicity(4, 1, 1, 1.0, 1.0, 1.0, true, false).unwrap();
        let ex = Exchange::new(&ring, 1.5);
        assert_eq!(ex.energy(&spin), -1.5 * 4.0);
    }
}
