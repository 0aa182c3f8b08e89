//! Scenario exploration over SIR rate parameters.
//!
//! Responsibilities:
//!
//! - build β / γ grids
//! - integrate each scenario (parallel)
//! - summarise and rank scenarios by epidemic peak

pub mod runner;

pub use runner::*;
