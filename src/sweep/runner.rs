//! Parallel β × γ scenario sweep.
//!
//! Every grid point is an independent Euler integration, so the grid is
//! evaluated with rayon. Results come back in grid order (β-major, γ-minor)
//! regardless of scheduling.

use rayon::prelude::*;
use tracing::info;

use crate::domain::{SirParams, SirState, SweepConfig};
use crate::error::{SirError, SirResult};
use crate::math::{linspace, time_grid};
use crate::models::euler_sir;

/// Summary of one simulated scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub params: SirParams,
    pub r0: Option<f64>,
    pub peak_infected: f64,
    pub peak_time: f64,
    pub final_susceptible: f64,
    pub final_recovered: f64,
}

/// Evaluate every `(β, γ)` pair.
pub fn sweep(
    betas: &[f64],
    gammas: &[f64],
    initial: SirState,
    t: &[f64],
    population: f64,
) -> SirResult<Vec<SweepPoint>> {
    let grid: Vec<SirParams> = betas
        .iter()
        .flat_map(|&beta| gammas.iter().map(move |&gamma| SirParams { beta, gamma }))
        .collect();

    let points = grid
        .par_iter()
        .map(|&params| evaluate(params, initial, t, population))
        .collect::<SirResult<Vec<SweepPoint>>>()?;

    info!(scenarios = points.len(), steps = t.len(), "sweep complete");
    Ok(points)
}

/// Build the grids from a [`SweepConfig`] and run the sweep.
pub fn run_sweep(config: &SweepConfig) -> SirResult<Vec<SweepPoint>> {
    let betas = linspace(config.beta_min, config.beta_max, config.beta_steps)?;
    let gammas = linspace(config.gamma_min, config.gamma_max, config.gamma_steps)?;
    let t = time_grid(config.t_end, config.dt)?;
    sweep(&betas, &gammas, config.initial, &t, config.population)
}

fn evaluate(params: SirParams, initial: SirState, t: &[f64], population: f64) -> SirResult<SweepPoint> {
    let trajectory = euler_sir(params, initial, t, population)?;
    let (peak_idx, peak_infected) = trajectory
        .peak_infected()
        .ok_or_else(|| SirError::invalid_input("Empty trajectory."))?;
    let last = trajectory.len() - 1;

    Ok(SweepPoint {
        params,
        r0: params.r0(),
        peak_infected,
        peak_time: trajectory.t[peak_idx],
        final_susceptible: trajectory.s[last],
        final_recovered: trajectory.r[last],
    })
}

/// Sort scenarios by peak infected (largest first) and keep the top `n`
/// (`n == 0` keeps all).
pub fn rank_by_peak(points: &[SweepPoint], n: usize) -> Vec<SweepPoint> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| b.peak_infected.total_cmp(&a.peak_infected));
    if n > 0 {
        sorted.truncate(n);
    }
    sorted
}
