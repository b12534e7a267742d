// src/lib.rs

pub mod config;
pub mod effective_field;
pub mod energy;
pub mod error;
pub mod initial_states;
pub mod mesh;
pub mod minimize;
pub mod spin_state;
pub mod vec3;
pub mod visualisation;

pub use error::{MinimizeError, Result};
pub use minimize::{MinimizeReport, MinimizeSettings, MinimizeState, SteepestDescent};
pub use spin_state::SpinState;
