//! Numeric helpers: window primitives for the estimator and grids for the
//! integrator/sweep.

pub mod grid;
pub mod window;

pub use grid::*;
pub use window::*;
