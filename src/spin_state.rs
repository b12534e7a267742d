// src/spin_state.rs

use rayon::prelude::*;

use crate::error::{MinimizeError, Result};
use crate::vec3::{is_zero, normalize};

/// Classical spin configuration: one direction per site, a moment magnitude and a pin flag.
///
/// Sites with `mu_s == 0` are vacancies and always hold the zero vector.
#[derive(Debug, Clone)]
pub struct SpinState {
    pub spin: Vec<[f64; 3]>,
    mu_s: Vec<f64>,
    pins: Vec<bool>,
}

impl SpinState {
    /// Create `n` unpinned sites with unit moment, initialised along +x.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(MinimizeError::EmptyMesh);
        }
        Ok(Self {
            spin: vec![[1.0, 0.0, 0.0]; n],
            mu_s: vec![1.0; n],
            pins: vec![false; n],
        })
    }

    /// Build from explicit arrays. Spins are normalised and vacancies zeroed.
    pub fn from_parts(spin: Vec<[f64; 3]>, mu_s: Vec<f64>, pins: Vec<bool>) -> Result<Self> {
        let n = spin.len();
        if n == 0 {
            return Err(MinimizeError::EmptyMesh);
        }
        check_len("moment magnitudes", n, mu_s.len())?;
        check_len("pin mask", n, pins.len())?;
        if let Some(bad) = mu_s.iter().find(|&&m| !(m >= 0.0) || !m.is_finite()) {
            return Err(MinimizeError::InvalidSettings(format!(
                "moment magnitude must be finite and non-negative, got {bad}"
            )));
        }
        let mut state = Self { spin, mu_s, pins };
        for (s, &mu) in state.spin.iter_mut().zip(state.mu_s.iter()) {
            *s = if mu > 0.0 { normalize(*s) } else { [0.0; 3] };
        }
        Ok(state)
    }

    pub fn n_sites(&self) -> usize {
        self.spin.len()
    }

    pub fn mu_s(&self) -> &[f64] {
        &self.mu_s
    }

    pub fn pins(&self) -> &[bool] {
        &self.pins
    }

    /// Set every site with a positive moment to the same (normalised) direction.
    /// Pinned sites are overwritten too: pins only freeze spins during minimisation.
    pub fn set_uniform(&mut self, mx: f64, my: f64, mz: f64) {
        let v = normalize([mx, my, mz]);
        for (s, &mu) in self.spin.iter_mut().zip(self.mu_s.iter()) {
            *s = if mu > 0.0 { v } else { [0.0; 3] };
        }
    }

    /// Set each site from a function of its flat index.
    pub fn set_with<F>(&mut self, f: F)
    where
        F: Fn(usize) -> [f64; 3],
    {
        for (id, (s, &mu)) in self.spin.iter_mut().zip(self.mu_s.iter()).enumerate() {
            *s = if mu > 0.0 { normalize(f(id)) } else { [0.0; 3] };
        }
    }

    /// Replace the moment magnitudes. Sites that become vacancies are zeroed.
    pub fn set_mu_s(&mut self, mu_s: Vec<f64>) -> Result<()> {
        check_len("moment magnitudes", self.n_sites(), mu_s.len())?;
        if let Some(bad) = mu_s.iter().find(|&&m| !(m >= 0.0) || !m.is_finite()) {
            return Err(MinimizeError::InvalidSettings(format!(
                "moment magnitude must be finite and non-negative, got {bad}"
            )));
        }
        self.mu_s = mu_s;
        for (s, &mu) in self.spin.iter_mut().zip(self.mu_s.iter()) {
            if mu == 0.0 {
                *s = [0.0; 3];
            }
        }
        Ok(())
    }

    pub fn set_pins(&mut self, pins: Vec<bool>) -> Result<()> {
        check_len("pin mask", self.n_sites(), pins.len())?;
        self.pins = pins;
        Ok(())
    }

    /// Pin a single site.
    pub fn pin(&mut self, id: usize) {
        self.pins[id] = true;
    }

    /// Number of non-vacancy sites.
    pub fn n_nonzero(&self) -> usize {
        self.mu_s.iter().filter(|&&m| m > 0.0).count()
    }

    /// Average spin over non-vacancy sites.
    pub fn average(&self) -> [f64; 3] {
        let n = self.n_nonzero();
        if n == 0 {
            return [0.0; 3];
        }
        let mut sum = [0.0; 3];
        for s in &self.spin {
            sum[0] += s[0];
            sum[1] += s[1];
            sum[2] += s[2];
        }
        let inv = 1.0 / n as f64;
        [sum[0] * inv, sum[1] * inv, sum[2] * inv]
    }

    /// Bring the stored spins back onto the unit sphere with the default normaliser.
    pub fn normalise(&mut self) {
        UnitNormalizer.normalise(&mut self.spin, &self.pins, &self.mu_s, false);
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(MinimizeError::ArrayLengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

/// Per-site rescale applied after every rotation update.
///
/// Contract: vacancies end up at zero, pinned sites are otherwise untouched,
/// every other site ends up with unit norm. `parallel` selects the Rayon path,
/// which must give the same result as the serial one.
pub trait Normalizer: Sync {
    fn normalise(&self, spin: &mut [[f64; 3]], pins: &[bool], mu_s: &[f64], parallel: bool);
}

/// Plain unit rescale.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitNormalizer;

impl UnitNormalizer {
    #[inline]
    pub fn normalise_site(s: [f64; 3], pinned: bool, mu_s: f64) -> [f64; 3] {
        if mu_s == 0.0 {
            [0.0; 3]
        } else if pinned {
            s
        } else if is_zero(s) {
            [0.0; 3]
        } else {
            normalize(s)
        }
    }
}

impl Normalizer for UnitNormalizer {
    fn normalise(&self, spin: &mut [[f64; 3]], pins: &[bool], mu_s: &[f64], parallel: bool) {
        debug_assert_eq!(spin.len(), pins.len());
        debug_assert_eq!(spin.len(), mu_s.len());

        let kernel = |(i, s): (usize, &mut [f64; 3])| {
            *s = Self::normalise_site(*s, pins[i], mu_s[i]);
        };

        if parallel {
            spin.par_iter_mut().enumerate().for_each(kernel);
        } else {
            spin.iter_mut().enumerate().for_each(kernel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::norm2;

    #[test]
    fn from_parts_zeroes_vacancies_and_normalises() {
        let s = SpinState::from_parts(
            vec![[2.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 0.0, 3.0]],
            vec![1.0, 0.0, 2.5],
            vec![false; 3],
        )
        .unwrap();
        assert_eq!(s.spin[0], [1.0, 0.0, 0.0]);
        assert_eq!(s.spin[1], [0.0; 3]);
        assert_eq!(s.spin[2], [0.0, 0.0, 1.0]);
        assert_eq!(s.n_nonzero(), 2);
    }

    #[test]
    fn from_parts_rejects_short_arrays() {
        let err = SpinState::from_parts(vec![[1.0, 0.0, 0.0]; 3], vec![1.0; 2], vec![false; 3])
            .unwrap_err();
        assert_eq!(
            err,
            MinimizeError::ArrayLengthMismatch {
                what: "moment magnitudes",
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn average_skips_vacancies() {
        let mut s = SpinState::new(4).unwrap();
        s.set_uniform(0.0, 0.0, 1.0);
        s.set_mu_s(vec![1.0, 1.0, 0.0, 0.0]).unwrap();
        let avg = s.average();
        assert!((avg[2] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn normaliser_respects_pins_and_vacancies() {
        let mut spin = vec![[2.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.5, 0.5, 0.0]];
        let pins = vec![false, true, false];
        let mu_s = vec![1.0, 1.0, 0.0];
        UnitNormalizer.normalise(&mut spin, &pins, &mu_s, false);
        assert!((norm2(spin[0]) - 1.0).abs() < 1e-15);
        assert_eq!(spin[1], [0.0, 3.0, 0.0]);
        assert_eq!(spin[2], [0.0; 3]);
    }

    #[test]
    fn pinned_vacancy_is_still_zeroed() {
        let mut spin = vec![[0.3, 0.0, 0.4], [0.0, 0.0, 2.0]];
        UnitNormalizer.normalise(&mut spin, &[true, true], &[0.0, 1.0], false);
        assert_eq!(spin[0], [0.0; 3]);
        assert_eq!(spin[1], [0.0, 0.0, 2.0]);
    }

    #[test]
    fn parallel_normaliser_matches_serial() {
        let raw: Vec<[f64; 3]> = (0..200)
            .map(|i| {
                let a = i as f64 * 0.37;
                [2.0 * a.cos(), a.sin(), 0.5 + 0.01 * i as f64]
            })
            .collect();
        let pins: Vec<bool> = (0..200).map(|i| i % 17 == 0).collect();
        let mu_s: Vec<f64> = (0..200).map(|i| if i % 23 == 5 { 0.0 } else { 1.0 }).collect();

        let mut serial = raw.clone();
        let mut par = raw.clone();
        UnitNormalizer.normalise(&mut serial, &pins, &mu_s, false);
        UnitNormalizer.normalise(&mut par, &pins, &mu_s, true);
        assert_eq!(serial, par);
        assert_eq!(serial[0], raw[0]);
        assert_eq!(serial[5], [0.0; 3]);
    }
}
