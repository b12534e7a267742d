// src/effective_field/zeeman.rs

use super::EnergyTerm;

/// Uniform applied field h (energy units per unit spin).
///
/// E = -Σ_i μ_i S_i·h, with μ_i = 1 unless moments are supplied.
#[derive(Debug, Clone)]
pub struct Zeeman {
    h: [f64; 3],
    mu_s: Option<Vec<f64>>,
}

impl Zeeman {
    pub fn new(h: [f64; 3]) -> Self {
        Self { h, mu_s: None }
    }

    /// Scale the energy by per-site moments; vacancies (μ = 0) feel no field.
    pub fn with_moments(h: [f64; 3], mu_s: Vec<f64>) -> Self {
        Self {
            h,
            mu_s: Some(mu_s),
        }
    }

    pub fn h(&self) -> [f64; 3] {
        self.h
    }
}

impl EnergyTerm for Zeeman {
    fn name(&self) -> &str {
        "zeeman"
    }

    fn compute_field(&self, _t: f64, spin: &[[f64; 3]]) -> Vec<[f64; 3]> {
        match &self.mu_s {
            None => vec![self.h; spin.len()],
            Some(mu) => mu
                .iter()
                .map(|&m| if m > 0.0 { self.h } else { [0.0; 3] })
                .collect(),
        }
    }

    fn energy(&self, spin: &[[f64; 3]]) -> f64 {
        let h = self.h;
        spin.iter()
            .enumerate()
            .map(|(id, s)| {
                let mu = self.mu_s.as_ref().map_or(1.0, |m| m[id]);
                -mu * (s[0] * h[0] + s[1] * h[1] + s[2] * h[2])
            })
            .sum()
    }

    fn n_sites(&self) -> Option<usize> {
        self.mu_s.as_ref().map(Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_uniform_and_energy_is_minus_m_dot_h() {
        let z = Zeeman::new([0.0, 0.0, 2.0]);
        let spin = vec![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
        assert_eq!(z.compute_field(0.0, &spin), vec![[0.0, 0.0, 2.0]; 2]);
        assert_eq!(z.energy(&spin), -2.0);
    }

    #[test]
    fn vacancies_feel_no_field() {
        let z = Zeeman::with_moments([1.0, 0.0, 0.0], vec![2.0, 0.0]);
        let spin = vec![[1.0, 0.0, 0.0], [0.0; 3]];
        assert_eq!(z.compute_field(0.0, &spin)[1], [0.0; 3]);
        assert_eq!(z.energy(&spin), -2.0);
        assert_eq!(z.n_sites(), Some(2));
    }
}
