//! Compartmental model implementations.
//!
//! Models are small, pure functions so the sweep and the CLI can stay generic.

pub mod sir;

pub use sir::*;
