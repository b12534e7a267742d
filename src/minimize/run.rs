// src/minimize/run.rs
//
// Explicit state of one minimisation run.
//
// Everything that survives between iterations lives here (counter, tau, previous
// spin, torque history, scratch buffers), so single iterations can be driven and
// inspected directly and a fresh run always starts from a clean slate.
//
// Per iteration:
//   H      <- Σ terms(m)                    (fallible; checked before anything mutates)
//   mxmxH_prev <- mxmxH
//   mxH, mxmxH <- m × H, m × (m × H)
//   tau    <- BB step (parity of counter)
//   m_new  <- Cayley update, then normalise (pins / vacancies untouched)
//   m_prev <- m, m <- m_new
//   max_dm <- max_i |m - m_prev|²

use super::convergence::{is_converged, max_dm};
use super::progress::IterationProgress;
use super::rotation::rotation_update;
use super::step_size::{estimate_step_sizes, max_abs_step};
use super::torque::compute_torques;
use super::{MinimizeReport, MinimizeState, SteepestDescent};
use crate::error::{MinimizeError, Result};
use crate::spin_state::SpinState;

#[derive(Debug, Clone)]
pub struct MinimizerRun {
    state: MinimizeState,
    counter: usize,
    spin_prev: Vec<[f64; 3]>,
    field: Vec<[f64; 3]>,
    mxh: Vec<[f64; 3]>,
    mxmxh: Vec<[f64; 3]>,
    mxmxh_prev: Vec<[f64; 3]>,
    tau: Vec<f64>,
    new_spin: Vec<[f64; 3]>,
    last: Option<IterationProgress>,
}

impl MinimizerRun {
    /// Init state: seed the history from the current spin and evaluate the first field.
    pub fn start(spin: &SpinState, driver: &SteepestDescent) -> Result<Self> {
        let fields = driver.fields();
        let n = fields.n_sites();
        check_spin_arrays(spin, n)?;
        let parallel = driver.settings().parallel;

        let mut field = vec![[0.0; 3]; n];
        fields.compute(0.0, &spin.spin, &mut field)?;

        let mut mxh = vec![[0.0; 3]; n];
        let mut mxmxh = vec![[0.0; 3]; n];
        compute_torques(&spin.spin, &field, &mut mxh, &mut mxmxh, parallel);

        Ok(Self {
            state: MinimizeState::Init,
            counter: 0,
            spin_prev: spin.spin.clone(),
            field,
            mxh,
            mxmxh,
            mxmxh_prev: vec![[0.0; 3]; n],
            tau: vec![driver.settings().tau_fallback; n],
            new_spin: vec![[0.0; 3]; n],
            last: None,
        })
    }

    /// Run one iteration and update the state machine.
    ///
    /// A run that has converged or hit its cap is finished; stepping it again is
    /// an error. On error nothing in `spin` has been written.
    pub fn step(
        &mut self,
        spin: &mut SpinState,
        driver: &SteepestDescent,
        stopping_dm: f64,
    ) -> Result<IterationProgress> {
        if self.state.is_terminal() {
            return Err(MinimizeError::RunFinished);
        }
        check_spin_arrays(spin, self.spin_prev.len())?;
        let settings = driver.settings();
        let parallel = settings.parallel;

        driver.fields().compute(0.0, &spin.spin, &mut self.field)?;

        std::mem::swap(&mut self.mxmxh_prev, &mut self.mxmxh);
        compute_torques(
            &spin.spin,
            &self.field,
            &mut self.mxh,
            &mut self.mxmxh,
            parallel,
        );

        estimate_step_sizes(
            &spin.spin,
            &self.spin_prev,
            &self.mxmxh,
            &self.mxmxh_prev,
            self.counter,
            settings.tau_fallback,
            &mut self.tau,
            parallel,
        );

        rotation_update(
            &spin.spin,
            &self.mxh,
            &self.mxmxh,
            &self.tau,
            spin.pins(),
            spin.mu_s(),
            &mut self.new_spin,
            parallel,
        );
        driver
            .normalizer()
            .normalise(&mut self.new_spin, spin.pins(), spin.mu_s(), parallel);

        // spin_prev <- old spin, spin <- new spin
        std::mem::swap(&mut self.spin_prev, &mut spin.spin);
        spin.spin.copy_from_slice(&self.new_spin);

        let progress = IterationProgress {
            iteration: self.counter,
            max_tau: max_abs_step(&self.tau, parallel),
            max_dm: max_dm(&spin.spin, &self.spin_prev, parallel),
        };
        self.last = Some(progress);

        if is_converged(progress.max_dm, stopping_dm, self.counter) {
            self.state = MinimizeState::Converged;
        } else {
            self.state = MinimizeState::Iterating;
            self.counter += 1;
        }
        Ok(progress)
    }

    pub(super) fn mark_cap_reached(&mut self) {
        self.state = MinimizeState::MaxIterationsReached;
    }

    pub fn state(&self) -> MinimizeState {
        self.state
    }

    /// Current iteration counter. Stays put on the converging iteration.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Iterations performed so far.
    pub fn iterations(&self) -> usize {
        match self.state {
            MinimizeState::Converged => self.counter + 1,
            _ => self.counter,
        }
    }

    pub fn tau(&self) -> &[f64] {
        &self.tau
    }

    pub fn spin_prev(&self) -> &[[f64; 3]] {
        &self.spin_prev
    }

    pub fn field(&self) -> &[[f64; 3]] {
        &self.field
    }

    pub fn mxh(&self) -> &[[f64; 3]] {
        &self.mxh
    }

    pub fn mxmxh(&self) -> &[[f64; 3]] {
        &self.mxmxh
    }

    pub fn last_progress(&self) -> Option<IterationProgress> {
        self.last
    }

    pub fn report(&self) -> MinimizeReport {
        MinimizeReport {
            state: self.state,
            iterations: self.iterations(),
            final_max_dm: self.last.map_or(f64::INFINITY, |p| p.max_dm),
            final_max_tau: self.last.map_or(0.0, |p| p.max_tau),
        }
    }
}

/// The spin buffer and its per-site arrays must all match the run's site count.
fn check_spin_arrays(spin: &SpinState, n: usize) -> Result<()> {
    if spin.spin.len() != n {
        return Err(MinimizeError::SiteCountMismatch {
            expected: n,
            got: spin.spin.len(),
        });
    }
    if spin.mu_s().len() != n {
        return Err(MinimizeError::ArrayLengthMismatch {
            what: "moment magnitudes",
            expected: n,
            got: spin.mu_s().len(),
        });
    }
    if spin.pins().len() != n {
        return Err(MinimizeError::ArrayLengthMismatch {
            what: "pin mask",
            expected: n,
            got: spin.pins().len(),
        });
    }
    Ok(())
}
