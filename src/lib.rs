//! `sir-curves` library crate.
//!
//! The binary (`sir`) is a thin wrapper around this library so that:
//!
//! - the estimator and the integrator are testable without spawning processes
//! - modules are reusable from other tools or notebooks
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod sweep;
