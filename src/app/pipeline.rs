//! Shared run logic for the `estimate` and `simulate` commands.
//!
//! Each function does the computation only and returns everything the caller
//! needs for printing or exporting:
//! CSV load -> sort + derive columns -> summary
//! initial state (explicit or from a case CSV) -> time grid -> Euler run -> summary

use tracing::info;

use crate::domain::{EstimateConfig, InitialSource, SimulateConfig, SirState, SirTrajectory};
use crate::error::AppError;
use crate::estimate::Estimate;
use crate::io::ingest::IngestedTable;
use crate::report::{EstimateSummary, TrajectorySummary};

/// All computed outputs of a single `sir estimate` run.
#[derive(Debug, Clone)]
pub struct EstimateOutput {
    pub ingest: IngestedTable,
    pub estimate: Estimate,
    pub summary: EstimateSummary,
}

/// All computed outputs of a single `sir simulate` run.
#[derive(Debug, Clone)]
pub struct SimulateOutput {
    pub initial: SirState,
    pub trajectory: SirTrajectory,
    pub summary: TrajectorySummary,
}

/// Load the case CSV and run the estimator on it.
pub fn run_estimate(config: &EstimateConfig) -> Result<EstimateOutput, AppError> {
    let ingest = crate::io::ingest::load_table(&config.csv_path)?;
    if ingest.table.n_rows() == 0 {
        return Err(AppError::new(3, "No data rows found in the case CSV."));
    }

    let estimate = crate::estimate::estimate(&ingest.table, &config.estimator)?;
    let summary =
        crate::report::summarize_estimate(&estimate.table, &estimate.derived, &config.estimator.date_col)
            .ok_or_else(|| AppError::new(3, "Estimator produced no rows."))?;

    info!(
        rows = summary.rows,
        peak_infected = summary.peak_infected,
        "estimated SIR columns"
    );

    Ok(EstimateOutput {
        ingest,
        estimate,
        summary,
    })
}

/// Resolve the initial state and integrate.
pub fn run_simulate(config: &SimulateConfig) -> Result<SimulateOutput, AppError> {
    let initial = resolve_initial(&config.initial, config.population)?;
    let t = crate::math::time_grid(config.t_end, config.dt)?;
    let trajectory = crate::models::euler_sir(config.params, initial, &t, config.population)?;

    let summary = crate::report::summarize_trajectory(config.params, config.population, &trajectory)
        .ok_or_else(|| AppError::new(4, "Integration produced an empty trajectory."))?;

    info!(
        beta = config.params.beta,
        gamma = config.params.gamma,
        steps = summary.steps,
        peak_infected = summary.peak_infected,
        "integrated SIR model"
    );

    Ok(SimulateOutput {
        initial,
        trajectory,
        summary,
    })
}

/// Initial state for the integrator.
///
/// For [`InitialSource::Estimated`] the case CSV goes through the estimator
/// and the requested row (default: last) becomes `S0, I0, R0`.
pub fn resolve_initial(source: &InitialSource, population: f64) -> Result<SirState, AppError> {
    match source {
        InitialSource::Explicit(state) => Ok(*state),
        InitialSource::Estimated {
            csv_path,
            estimator,
            row,
        } => {
            let ingest = crate::io::ingest::load_table(csv_path)?;
            if ingest.table.n_rows() == 0 {
                return Err(AppError::new(3, "No data rows found in the case CSV."));
            }
            let mut estimator = estimator.clone();
            estimator.population.get_or_insert(population);
            let est = crate::estimate::estimate(&ingest.table, &estimator)?;

            let row = row.unwrap_or(est.derived.len() - 1);
            let state = est.derived.initial_conditions(row, population)?;
            info!(row, s = state.s, i = state.i, r = state.r, "initial state from case data");
            Ok(state)
        }
    }
}
