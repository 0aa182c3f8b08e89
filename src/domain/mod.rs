//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the columnar `Table` the estimator reads and writes
//! - run configuration structs (`EstimatorConfig`, `SimulateConfig`, ...)
//! - SIR parameters, states and trajectories

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
