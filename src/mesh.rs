// src/mesh.rs
//
// Simple cuboid lattice used by the energy terms.
// The minimiser itself only needs `n_sites()`.
//
// Flat index convention: x fastest, then y, then z.
// Neighbour slots are ordered (-x, +x, -y, +y, -z, +z); `None` marks an open boundary.

use crate::error::{MinimizeError, Result};

/// Unit bond vectors for the six neighbour slots.
pub const NEIGHBOUR_DIRS: [[f64; 3]; 6] = [
    [-1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, -1.0],
    [0.0, 0.0, 1.0],
];

#[derive(Debug, Clone)]
pub struct CuboidMesh {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub periodic_x: bool,
    pub periodic_y: bool,
    neighbours: Vec<[Option<usize>; 6]>,
}

impl CuboidMesh {
    /// Create an open-boundary lattice with nx × ny × nz sites and spacings dx, dy, dz.
    pub fn new(nx: usize, ny: usize, nz: usize, dx: f64, dy: f64, dz: f64) -> Result<Self> {
        Self::with_periodicity(nx, ny, nz, dx, dy, dz, false, false)
    }

    /// Create a lattice with optional periodic boundaries along x and y.
    #[allow(clippy::too_many_arguments)]
    pub fn with_periodicity(
        nx: usize,
        ny: usize,
        nz: usize,
        dx: f64,
        dy: f64,
        dz: f64,
        periodic_x: bool,
        periodic_y: bool,
    ) -> Result<Self> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(MinimizeError::EmptyMesh);
        }
        let mut mesh = Self {
            nx,
            ny,
            nz,
            dx,
            dy,
            dz,
            periodic_x,
            periodic_y,
            neighbours: Vec::new(),
        };
        mesh.neighbours = (0..mesh.n_sites())
            .map(|id| mesh.compute_neighbours(id))
            .collect();
        Ok(mesh)
    }

    /// Total number of sites.
    pub fn n_sites(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Convert (i, j, k) indices to a flat index.
    #[inline]
    pub fn idx(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < self.nx && j < self.ny && k < self.nz);
        (k * self.ny + j) * self.nx + i
    }

    /// Inverse of [`CuboidMesh::idx`].
    #[inline]
    pub fn ijk(&self, id: usize) -> (usize, usize, usize) {
        let i = id % self.nx;
        let j = (id / self.nx) % self.ny;
        let k = id / (self.nx * self.ny);
        (i, j, k)
    }

    /// Neighbour table entry for a site, ordered (-x, +x, -y, +y, -z, +z).
    #[inline]
    pub fn neighbours(&self, id: usize) -> &[Option<usize>; 6] {
        &self.neighbours[id]
    }

    /// Site coordinates (cell centres, origin at the first site's corner).
    pub fn position(&self, id: usize) -> [f64; 3] {
        let (i, j, k) = self.ijk(id);
        [
            (i as f64 + 0.5) * self.dx,
            (j as f64 + 0.5) * self.dy,
            (k as f64 + 0.5) * self.dz,
        ]
    }

    fn compute_neighbours(&self, id: usize) -> [Option<usize>; 6] {
        let (i, j, k) = self.ijk(id);
        let (nx, ny, nz) = (self.nx, self.ny, self.nz);

        let step = |pos: usize, len: usize, up: bool, periodic: bool| -> Option<usize> {
            if up {
                if pos + 1 < len {
                    Some(pos + 1)
                } else if periodic {
                    Some(0)
                } else {
                    None
                }
            } else if pos > 0 {
                Some(pos - 1)
            } else if periodic {
                Some(len - 1)
            } else {
                None
            }
        };

        [
            step(i, nx, false, self.periodic_x).map(|ii| self.idx(ii, j, k)),
            step(i, nx, true, self.periodic_x).map(|ii| self.idx(ii, j, k)),
            step(j, ny, false, self.periodic_y).map(|jj| self.idx(i, jj, k)),
            step(j, ny, true, self.periodic_y).map(|jj| self.idx(i, jj, k)),
            step(k, nz, false, false).map(|kk| self.idx(i, j, kk)),
            step(k, nz, true, false).map(|kk| self.idx(i, j, kk)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_indexing_is_consistent() {
        let m = CuboidMesh::new(4, 3, 2, 1.0, 1.0, 1.0).unwrap();
        assert_eq!(m.idx(0, 0, 0), 0);
        assert_eq!(m.idx(1, 0, 0), 1);
        assert_eq!(m.idx(0, 1, 0), 4);
        assert_eq!(m.idx(3, 2, 1), 23);
        assert_eq!(m.n_sites(), 24);
        for id in 0..m.n_sites() {
            let (i, j, k) = m.ijk(id);
            assert_eq!(m.idx(i, j, k), id);
        }
    }

    #[test]
    fn open_chain_has_no_neighbours_past_the_ends() {
        let m = CuboidMesh::new(5, 1, 1, 1.0, 1.0, 1.0).unwrap();
        assert_eq!(m.neighbours(0)[0], None);
        assert_eq!(m.neighbours(0)[1], Some(1));
        assert_eq!(m.neighbours(4)[1], None);
        assert_eq!(m.neighbours(2)[2..], [None::<usize>; 4]);
    }

    #[test]
    fn periodic_x_wraps_around() {
        let m = CuboidMesh::with_periodicity(5, 2, 1, 1.0, 1.0, 1.0, true, false).unwrap();
        assert_eq!(m.neighbours(0)[0], Some(4));
        assert_eq!(m.neighbours(4)[1], Some(0));
        // y stays open
        assert_eq!(m.neighbours(0)[2], None);
        assert_eq!(m.neighbours(0)[3], Some(5));
    }

    #[test]
    fn empty_mesh_is_rejected() {
        assert_eq!(
            CuboidMesh::new(0, 1, 1, 1.0, 1.0, 1.0).unwrap_err(),
            MinimizeError::EmptyMesh
        );
    }
}
