//! SIR compartmental model and its explicit Euler integrator.
//!
//! ```text
//! dS/dt = -β·I·S/N
//! dI/dt =  β·I·S/N - γ·I
//! dR/dt =  γ·I
//! ```
//!
//! The integrator steps along a caller-supplied time grid, using the local
//! spacing `t[n+1] - t[n]` as the step size, so non-uniform grids work.
//!
//! Forward Euler is first order. Large steps or stiff parameters can drive
//! compartments negative or make them blow up. The three derivatives sum to
//! zero, so S+I+R keeps its initial total up to rounding. The output is
//! returned as computed: no clipping and no renormalisation.

use crate::domain::{SirParams, SirState, SirTrajectory};
use crate::error::{SirError, SirResult};

/// Right-hand side of the SIR system at `state`.
///
/// Returns `(dS/dt, dI/dt, dR/dt)`.
pub fn derivatives(params: SirParams, state: SirState, population: f64) -> (f64, f64, f64) {
    let infection = params.beta * state.i * state.s / population;
    let recovery = params.gamma * state.i;
    (-infection, infection - recovery, recovery)
}

/// Integrate the SIR system with forward Euler over the time grid `t`.
///
/// The returned trajectory has the same length as `t` and starts at `initial`.
///
/// # Errors
/// `InvalidInput` when `t` is empty or `population` is zero or non-finite.
pub fn euler_sir(params: SirParams, initial: SirState, t: &[f64], population: f64) -> SirResult<SirTrajectory> {
    if t.is_empty() {
        return Err(SirError::invalid_input("Time grid must contain at least one point."));
    }
    if population == 0.0 {
        return Err(SirError::invalid_input("Population N must be non-zero."));
    }
    if !population.is_finite() {
        return Err(SirError::invalid_input(format!(
            "Population N must be finite (got {population})."
        )));
    }

    let len = t.len();
    let mut s = Vec::with_capacity(len);
    let mut i = Vec::with_capacity(len);
    let mut r = Vec::with_capacity(len);
    s.push(initial.s);
    i.push(initial.i);
    r.push(initial.r);

    for n in 0..len - 1 {
        let dt = t[n + 1] - t[n];
        let state = SirState { s: s[n], i: i[n], r: r[n] };
        let (ds, di, dr) = derivatives(params, state, population);

        s.push(state.s + ds * dt);
        i.push(state.i + di * dt);
        r.push(state.r + dr * dt);
    }

    Ok(SirTrajectory {
        t: t.to_vec(),
        s,
        i,
        r,
    })
}
