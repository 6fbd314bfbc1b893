//! TUI module for the interactive curriculum viewer.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: session model and per-table state machines
//! - `update`: action handling
//! - `view` / `theme`: pure rendering
//! - `run`: effects (terminal lifecycle, event loop)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

pub use run::run;
pub use state::App;
