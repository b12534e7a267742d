// src/error.rs
//
// Contract violations raised by the minimiser and its collaborators.
// Numerical degeneracy and non-convergence are not errors and never show up here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MinimizeError {
    /// An energy term returned a field that does not cover every site.
    #[error("energy term `{term}` returned {got} field vectors, expected {expected}")]
    FieldLengthMismatch {
        term: String,
        expected: usize,
        got: usize,
    },

    /// The spin buffer and the field collaborators disagree on the site count.
    #[error("site count mismatch: expected {expected} sites, got {got}")]
    SiteCountMismatch { expected: usize, got: usize },

    /// A per-site array (moments, pins, initial spins) has the wrong length.
    #[error("{what} has {got} entries, expected {expected}")]
    ArrayLengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// `step` was called on a run that already converged or hit its cap.
    #[error("minimisation run has already finished; start a new run")]
    RunFinished,

    #[error("a spin system needs at least one site")]
    EmptyMesh,

    #[error("invalid minimiser settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, MinimizeError>;
