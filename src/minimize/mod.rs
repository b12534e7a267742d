// src/minimize/mod.rs
//
// Steepest-descent minimiser for classical spin lattices.
// One effective-field build per iteration.
//
// Update: Cayley-type rotation of m about m × H with a per-site
// Barzilai–Borwein step tau, followed by renormalisation.
//
// Stop: max_i |Δm_i|² < stopping_dm (never on the first iteration), or the iteration cap.

pub mod convergence;
pub mod progress;
pub mod rotation;
pub mod run;
pub mod step_size;
pub mod torque;

use serde::{Deserialize, Serialize};

use crate::effective_field::FieldAggregator;
use crate::error::{MinimizeError, Result};
use crate::spin_state::{Normalizer, SpinState, UnitNormalizer};

pub use progress::{IterationProgress, LogObserver, ProgressHistory, ProgressObserver};
pub use run::MinimizerRun;
pub use step_size::TAU_FALLBACK;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimizeSettings {
    /// Converged once max_i |Δm_i|² drops below this.
    pub stopping_dm: f64,
    pub max_iterations: usize,

    /// Step used where the secant denominator is zero.
    pub tau_fallback: f64,

    /// Enable Rayon parallelism for the per-site passes.
    /// Results match the serial path exactly.
    pub parallel: bool,

    // Log every N iterations at debug level (0 disables)
    pub log_every: usize,
}

impl Default for MinimizeSettings {
    fn default() -> Self {
        Self {
            stopping_dm: 1e-2,
            max_iterations: 2000,
            tau_fallback: TAU_FALLBACK,
            parallel: false,
            log_every: 1,
        }
    }
}

impl MinimizeSettings {
    pub fn validate(&self) -> Result<()> {
        check_stopping_dm(self.stopping_dm)?;
        check_tau_fallback(self.tau_fallback)
    }
}

fn check_tau_fallback(tau_fallback: f64) -> Result<()> {
    if !tau_fallback.is_finite() {
        return Err(MinimizeError::InvalidSettings(format!(
            "tau_fallback must be finite, got {tau_fallback}"
        )));
    }
    Ok(())
}

fn check_stopping_dm(stopping_dm: f64) -> Result<()> {
    if stopping_dm.is_nan() {
        return Err(MinimizeError::InvalidSettings(
            "stopping_dm must not be NaN".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MinimizeState {
    /// History seeded, no iteration yet.
    Init,
    Iterating,
    /// max dm fell below the threshold after at least one real update.
    Converged,
    /// Iteration cap hit first. Not an error.
    MaxIterationsReached,
}

impl MinimizeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Converged | Self::MaxIterationsReached)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinimizeReport {
    pub state: MinimizeState,
    pub iterations: usize,
    /// INFINITY if no iteration ran.
    pub final_max_dm: f64,
    pub final_max_tau: f64,
}

impl MinimizeReport {
    pub fn converged(&self) -> bool {
        self.state == MinimizeState::Converged
    }
}

/// Minimiser over a fixed, ordered set of energy terms.
pub struct SteepestDescent {
    fields: FieldAggregator,
    normalizer: Box<dyn Normalizer>,
    settings: MinimizeSettings,
}

impl SteepestDescent {
    pub fn new(fields: FieldAggregator) -> Self {
        Self {
            fields,
            normalizer: Box::new(UnitNormalizer),
            settings: MinimizeSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: MinimizeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Swap in a different normaliser implementation.
    pub fn with_normalizer<N: Normalizer + 'static>(mut self, normalizer: N) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn fields(&self) -> &FieldAggregator {
        &self.fields
    }

    pub fn settings(&self) -> &MinimizeSettings {
        &self.settings
    }

    pub fn normalizer(&self) -> &dyn Normalizer {
        self.normalizer.as_ref()
    }

    /// Seed a run without iterating (state `Init`).
    ///
    /// The stopping threshold is passed per call, so only the stored step fallback is checked here.
    pub fn start(&self, spin: &SpinState) -> Result<MinimizerRun> {
        check_tau_fallback(self.settings.tau_fallback)?;
        MinimizerRun::start(spin, self)
    }

    /// Minimise with the thresholds from the stored settings.
    pub fn run(&self, spin: &mut SpinState) -> Result<MinimizeReport> {
        self.minimize(spin, self.settings.stopping_dm, self.settings.max_iterations)
    }

    /// Minimise in place, logging progress through `tracing`.
    pub fn minimize(
        &self,
        spin: &mut SpinState,
        stopping_dm: f64,
        max_iterations: usize,
    ) -> Result<MinimizeReport> {
        let mut log = LogObserver::new(self.settings.log_every);
        self.minimize_with_observer(spin, stopping_dm, max_iterations, &mut log)
    }

    /// Minimise in place, reporting every iteration to `observer`.
    pub fn minimize_with_observer(
        &self,
        spin: &mut SpinState,
        stopping_dm: f64,
        max_iterations: usize,
        observer: &mut dyn ProgressObserver,
    ) -> Result<MinimizeReport> {
        check_stopping_dm(stopping_dm)?;
        let mut run = self.start(spin)?;

        tracing::info!(
            n_sites = spin.n_sites(),
            n_terms = self.fields.terms().len(),
            stopping_dm,
            max_iterations,
            "starting steepest descent"
        );

        while !run.state().is_terminal() {
            if run.counter() >= max_iterations {
                run.mark_cap_reached();
                break;
            }
            let progress = run.step(spin, self, stopping_dm)?;
            observer.on_iteration(&progress);
        }

        let report = run.report();
        match report.state {
            MinimizeState::Converged => tracing::info!(
                iterations = report.iterations,
                max_dm = report.final_max_dm,
                "converged"
            ),
            _ => tracing::warn!(
                iterations = report.iterations,
                max_dm = report.final_max_dm,
                stopping_dm,
                "iteration cap reached before convergence"
            ),
        }
        Ok(report)
    }
}
