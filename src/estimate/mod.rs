//! Empirical SIR estimates from reported case counts.

pub mod cumulative;

pub use cumulative::*;
