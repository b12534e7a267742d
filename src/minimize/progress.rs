// src/minimize/progress.rs
//
// Per-iteration progress reporting. Observers only read; they never feed back
// into the numerical state.

use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationProgress {
    /// Iteration counter (starts at 0 each run).
    pub iteration: usize,
    /// max_i |tau_i|
    pub max_tau: f64,
    /// max_i |m_i - m_prev_i|²
    pub max_dm: f64,
}

pub trait ProgressObserver {
    fn on_iteration(&mut self, progress: &IterationProgress);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&IterationProgress),
{
    fn on_iteration(&mut self, progress: &IterationProgress) {
        self(progress)
    }
}

/// Emits a `tracing` debug event every `every` iterations (0 disables).
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    every: usize,
}

impl LogObserver {
    pub fn new(every: usize) -> Self {
        Self { every }
    }
}

impl ProgressObserver for LogObserver {
    fn on_iteration(&mut self, p: &IterationProgress) {
        if self.every > 0 && p.iteration % self.every == 0 {
            tracing::debug!(
                iteration = p.iteration,
                max_tau = p.max_tau,
                max_dm = p.max_dm,
                "descent step"
            );
        }
    }
}

/// Records every iteration, e.g. for a CSV table or a convergence plot.
/// Also forwards to a `LogObserver` so recording does not silence the log.
#[derive(Debug, Clone)]
pub struct ProgressHistory {
    pub records: Vec<IterationProgress>,
    log: LogObserver,
}

impl ProgressHistory {
    pub fn new(log_every: usize) -> Self {
        Self {
            records: Vec::new(),
            log: LogObserver::new(log_every),
        }
    }

    /// Write `iteration,max_tau,max_dm` rows.
    pub fn write_csv(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        let mut w = BufWriter::new(File::create(path)?);
        writeln!(w, "iteration,max_tau,max_dm")?;
        for r in &self.records {
            writeln!(w, "{},{:.16e},{:.16e}", r.iteration, r.max_tau, r.max_dm)?;
        }
        w.flush()
    }
}

impl Default for ProgressHistory {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ProgressObserver for ProgressHistory {
    fn on_iteration(&mut self, p: &IterationProgress) {
        self.records.push(*p);
        self.log.on_iteration(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_writes_one_row_per_iteration() {
        let mut h = ProgressHistory::default();
        for i in 0..3 {
            h.on_iteration(&IterationProgress {
                iteration: i,
                max_tau: 1e-4,
                max_dm: 0.5 / (i + 1) as f64,
            });
        }
        let dir = std::env::temp_dir()
            .join(format!("spin_relax_progress_{}", std::process::id()));
        let path = dir.join("progress.csv");
        h.write_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "iteration,max_tau,max_dm");
        assert!(lines[3].starts_with("2,"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        {
            let mut obs = |p: &IterationProgress| seen.push(p.iteration);
            obs.on_iteration(&IterationProgress {
                iteration: 5,
                max_tau: 0.0,
                max_dm: 0.0,
            });
        }
        assert_eq!(seen, vec![5]);
    }
}
