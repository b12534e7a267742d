// src/minimize/convergence.rs

use rayon::prelude::*;

use crate::vec3::{norm2, sub};

/// max_i |m_i - m_prev_i|², the squared per-site displacement maximised over sites.
pub fn max_dm(spin: &[[f64; 3]], spin_prev: &[[f64; 3]], parallel: bool) -> f64 {
    debug_assert_eq!(spin.len(), spin_prev.len());
    if parallel {
        spin.par_iter()
            .zip(spin_prev.par_iter())
            .map(|(a, b)| norm2(sub(*a, *b)))
            .reduce(|| 0.0, f64::max)
    } else {
        spin.iter()
            .zip(spin_prev.iter())
            .map(|(a, b)| norm2(sub(*a, *b)))
            .fold(0.0, f64::max)
    }
}

/// The first step (counter 0) never counts, so a zero displacement there cannot end the run.
#[inline]
pub fn is_converged(max_dm: f64, stopping_dm: f64, counter: usize) -> bool {
    counter > 0 && max_dm < stopping_dm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_dm_is_squared_and_maximised() {
        let a = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let b = vec![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        assert_eq!(max_dm(&a, &b, false), 2.0);
        assert_eq!(max_dm(&a, &b, true), 2.0);
        assert_eq!(max_dm(&a, &a, false), 0.0);
    }

    #[test]
    fn first_step_never_converges() {
        assert!(!is_converged(0.0, 1e-2, 0));
        assert!(is_converged(0.0, 1e-2, 1));
        assert!(!is_converged(1e-2, 1e-2, 3));
    }
}
