// src/effective_field/dmi.rs
//
// Bulk Dzyaloshinskii–Moriya interaction on the cuboid lattice.
//
// Energy (each bond once):
//   E = Σ_<i,j> D r_ij · (S_i × S_j)
//
// Effective field:
//   H_i = D Σ_j r_ij × S_j
//
// r_ij is the unit bond vector from i to j (see `mesh::NEIGHBOUR_DIRS`).

use super::EnergyTerm;
use crate::mesh::{CuboidMesh, NEIGHBOUR_DIRS};
use crate::vec3::{cross, dot};

#[derive(Debug, Clone)]
pub struct BulkDmi {
    d: f64,
    neighbours: Vec<[Option<usize>; 6]>,
}

impl BulkDmi {
    pub fn new(mesh: &CuboidMesh, d: f64) -> Self {
        let neighbours = (0..mesh.n_sites()).map(|id| *mesh.neighbours(id)).collect();
        Self { d, neighbours }
    }

    pub fn d(&self) -> f64 {
        self.d
    }
}

impl EnergyTerm for BulkDmi {
    fn name(&self) -> &str {
        "dmi"
    }

    fn compute_field(&self, _t: f64, spin: &[[f64; 3]]) -> Vec<[f64; 3]> {
        self.neighbours
            .iter()
            .map(|ngs| {
                let mut f = [0.0; 3];
                for (slot, nb) in ngs.iter().enumerate() {
                    if let Some(j) = *nb {
                        let c = cross(NEIGHBOUR_DIRS[slot], spin[j]);
                        f[0] += self.d * c[0];
                        f[1] += self.d * c[1];
                        f[2] += self.d * c[2];
                    }
                }
                f
            })
            .collect()
    }

    fn energy(&self, spin: &[[f64; 3]]) -> f64 {
        let mut e = 0.0;
        for (i, ngs) in self.neighbours.iter().enumerate() {
            for slot in [1, 3, 5] {
                if let Some(j) = ngs[slot] {
                    e += dot(NEIGHBOUR_DIRS[slot], cross(spin[i], spin[j]));
                }
            }
        }
        self.d * e
    }

    fn n_sites(&self) -> Option<usize> {
        Some(self.neighbours.len())
    }
}
