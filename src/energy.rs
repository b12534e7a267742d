// src/energy.rs

use crate::effective_field::FieldAggregator;

/// Per-term energies of a configuration, in registration order.
#[derive(Debug, Clone, Default)]
pub struct EnergyBreakdown {
    pub terms: Vec<(String, f64)>,
    pub total: f64,
}

impl EnergyBreakdown {
    /// Energy of a named term, if it is registered.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.terms.iter().find(|(n, _)| n == name).map(|(_, e)| *e)
    }
}

/// Evaluate every registered term's energy for `spin`.
pub fn compute_energy(fields: &FieldAggregator, spin: &[[f64; 3]]) -> EnergyBreakdown {
    let terms: Vec<(String, f64)> = fields
        .terms()
        .iter()
        .map(|t| (t.name().to_string(), t.energy(spin)))
        .collect();
    let total = terms.iter().map(|(_, e)| e).sum();
    EnergyBreakdown { terms, total }
}

/// Total energy only.
pub fn compute_total_energy(fields: &FieldAggregator, spin: &[[f64; 3]]) -> f64 {
    compute_energy(fields, spin).total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effective_field::{UniaxialAnisotropy, Zeeman};

    #[test]
    fn breakdown_lists_terms_in_order() {
        let fields = FieldAggregator::new(1)
            .unwrap()
            .with(Zeeman::new([0.0, 0.0, 1.0]))
            .unwrap()
            .with(UniaxialAnisotropy::new(2.0, [0.0, 0.0, 1.0]))
            .unwrap();
        let e = compute_energy(&fields, &[[0.0, 0.0, 1.0]]);
        assert_eq!(e.terms[0].0, "zeeman");
        assert_eq!(e.get("anisotropy"), Some(-2.0));
        assert_eq!(e.total, -3.0);
    }

    #[test]
    fn no_terms_means_zero_energy() {
        let fields = FieldAggregator::new(2).unwrap();
        assert_eq!(compute_total_energy(&fields, &[[1.0, 0.0, 0.0]; 2]), 0.0);
    }
}
