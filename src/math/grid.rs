//! Time and parameter grids.
//!
//! The integrator accepts any time grid; these helpers build the common
//! uniform ones. The sweep uses `linspace` for β and γ axes.

use crate::error::{SirError, SirResult};

/// Generate `steps` evenly spaced points between `start` and `end` (inclusive).
///
/// `steps == 1` yields `[start]`.
pub fn linspace(start: f64, end: f64, steps: usize) -> SirResult<Vec<f64>> {
    if !(start.is_finite() && end.is_finite()) {
        return Err(SirError::invalid_input(format!(
            "Invalid range: start={start}, end={end} (must be finite)."
        )));
    }
    if steps == 0 {
        return Err(SirError::invalid_input("Grid steps must be >= 1."));
    }
    if steps == 1 {
        return Ok(vec![start]);
    }

    let step = (end - start) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push(start + step * i as f64);
    }
    // Pin the last point so the endpoint is exact.
    if let Some(last) = out.last_mut() {
        *last = end;
    }
    Ok(out)
}

/// Uniform time grid `0, dt, 2dt, ...` covering `[0, t_end]`.
///
/// The grid always starts at 0. If `t_end` is not a multiple of `dt` the last
/// point is the largest multiple of `dt` not exceeding `t_end` (within a small
/// tolerance).
pub fn time_grid(t_end: f64, dt: f64) -> SirResult<Vec<f64>> {
    if !(t_end.is_finite() && t_end >= 0.0) {
        return Err(SirError::invalid_input(format!(
            "Invalid end time {t_end} (must be finite and >= 0)."
        )));
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SirError::invalid_input(format!(
            "Invalid step size {dt} (must be finite and > 0)."
        )));
    }

    let n_steps = (t_end / dt + 1e-9).floor() as usize;
    Ok((0..=n_steps).map(|k| k as f64 * dt).collect())
}
