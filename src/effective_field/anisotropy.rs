// src/effective_field/anisotropy.rs

use super::EnergyTerm;
use crate::vec3::{dot, normalize};

/// Uniaxial anisotropy with easy axis u.
///
/// For E = -K Σ_i (S_i·u)^2 we get:
///   H_i = 2 K (S_i·u) u
#[derive(Debug, Clone)]
pub struct UniaxialAnisotropy {
    k: f64,
    axis: [f64; 3],
}

impl UniaxialAnisotropy {
    pub fn new(k: f64, axis: [f64; 3]) -> Self {
        Self {
            k,
            axis: normalize(axis),
        }
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn axis(&self) -> [f64; 3] {
        self.axis
    }
}

impl EnergyTerm for UniaxialAnisotropy {
    fn name(&self) -> &str {
        "anisotropy"
    }

    fn compute_field(&self, _t: f64, spin: &[[f64; 3]]) -> Vec<[f64; 3]> {
        let u = self.axis;
        let coeff = 2.0 * self.k;
        spin.iter()
            .map(|s| {
                let sdotu = dot(*s, u);
                [coeff * sdotu * u[0], coeff * sdotu * u[1], coeff * sdotu * u[2]]
            })
            .collect()
    }

    fn energy(&self, spin: &[[f64; 3]]) -> f64 {
        let u = self.axis;
        -self.k * spin.iter().map(|s| dot(*s, u).powi(2)).sum::<f64>()
    }
}
