// src/effective_field/mod.rs
//
// Effective field H_eff = Σ_terms H_term(m), one 3-vector per site.
// Terms are opaque to the minimiser: it only sees the `EnergyTerm` trait and
// sums their contributions in registration order.

pub mod anisotropy;
pub mod dmi;
pub mod exchange;
pub mod zeeman;

use crate::error::{MinimizeError, Result};

pub use anisotropy::UniaxialAnisotropy;
pub use dmi::BulkDmi;
pub use exchange::Exchange;
pub use zeeman::Zeeman;

/// One contribution to the effective field.
pub trait EnergyTerm: Send + Sync {
    /// Short label used in errors, logs and energy breakdowns.
    fn name(&self) -> &str;

    /// Field contribution at time `t` for the spin snapshot `spin`.
    /// Must return exactly `spin.len()` vectors.
    fn compute_field(&self, t: f64, spin: &[[f64; 3]]) -> Vec<[f64; 3]>;

    /// Energy of this term for the given configuration.
    fn energy(&self, spin: &[[f64; 3]]) -> f64;

    /// Site count the term was built for, if it is bound to a mesh.
    fn n_sites(&self) -> Option<usize> {
        None
    }
}

/// Ordered collection of energy terms for a fixed number of sites.
pub struct FieldAggregator {
    n: usize,
    terms: Vec<Box<dyn EnergyTerm>>,
}

impl FieldAggregator {
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(MinimizeError::EmptyMesh);
        }
        Ok(Self {
            n,
            terms: Vec::new(),
        })
    }

    pub fn n_sites(&self) -> usize {
        self.n
    }

    /// Register a term. Mesh-bound terms must agree on the site count.
    pub fn add(&mut self, term: Box<dyn EnergyTerm>) -> Result<()> {
        if let Some(n_term) = term.n_sites() {
            if n_term != self.n {
                return Err(MinimizeError::SiteCountMismatch {
                    expected: self.n,
                    got: n_term,
                });
            }
        }
        self.terms.push(term);
        Ok(())
    }

    /// Builder-style variant of [`FieldAggregator::add`].
    pub fn with<T: EnergyTerm + 'static>(mut self, term: T) -> Result<Self> {
        self.add(Box::new(term))?;
        Ok(self)
    }

    pub fn terms(&self) -> &[Box<dyn EnergyTerm>] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Sum every term's field into `h_eff`, overwriting it.
    ///
    /// All contributions are computed and checked before `h_eff` is touched,
    /// so on error the output buffer still holds its previous contents.
    pub fn compute(&self, t: f64, spin: &[[f64; 3]], h_eff: &mut [[f64; 3]]) -> Result<()> {
        if spin.len() != self.n {
            return Err(MinimizeError::SiteCountMismatch {
                expected: self.n,
                got: spin.len(),
            });
        }
        if h_eff.len() != self.n {
            return Err(MinimizeError::ArrayLengthMismatch {
                what: "effective field buffer",
                expected: self.n,
                got: h_eff.len(),
            });
        }

        let mut contributions = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            let field = term.compute_field(t, spin);
            if field.len() != self.n {
                return Err(MinimizeError::FieldLengthMismatch {
                    term: term.name().to_string(),
                    expected: self.n,
                    got: field.len(),
                });
            }
            contributions.push(field);
        }

        h_eff.fill([0.0; 3]);
        for field in &contributions {
            for (h, f) in h_eff.iter_mut().zip(field.iter()) {
                h[0] += f[0];
                h[1] += f[1];
                h[2] += f[2];
            }
        }
        Ok(())
    }
}
