//! Reporting utilities: run summaries and formatted terminal output.

pub mod format;

pub use format::*;

use chrono::NaiveDateTime;

use crate::domain::{Column, SirParams, SirTrajectory, Table};
use crate::estimate::DerivedColumns;

/// Headline numbers of one integration run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySummary {
    pub params: SirParams,
    pub population: f64,
    pub steps: usize,
    pub t_start: f64,
    pub t_end: f64,
    pub peak_infected: f64,
    pub peak_time: f64,
    pub final_s: f64,
    pub final_i: f64,
    pub final_r: f64,
    /// Largest `|S+I+R - N|` over the run.
    pub max_drift: f64,
    /// Whether any compartment went negative (Euler overshoot).
    pub went_negative: bool,
}

/// Summarise a trajectory. `None` for an empty trajectory.
pub fn summarize_trajectory(
    params: SirParams,
    population: f64,
    trajectory: &SirTrajectory,
) -> Option<TrajectorySummary> {
    let (peak_idx, peak_infected) = trajectory.peak_infected()?;
    let last = trajectory.len() - 1;

    let mut max_drift = 0.0_f64;
    let mut went_negative = false;
    for n in 0..trajectory.len() {
        let state = trajectory.state(n)?;
        max_drift = max_drift.max((state.total() - population).abs());
        went_negative |= state.s < 0.0 || state.i < 0.0 || state.r < 0.0;
    }

    Some(TrajectorySummary {
        params,
        population,
        steps: trajectory.len(),
        t_start: trajectory.t[0],
        t_end: trajectory.t[last],
        peak_infected,
        peak_time: trajectory.t[peak_idx],
        final_s: trajectory.s[last],
        final_i: trajectory.i[last],
        final_r: trajectory.r[last],
        max_drift,
        went_negative,
    })
}

/// Headline numbers of one estimator run.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateSummary {
    pub rows: usize,
    pub first_date: Option<NaiveDateTime>,
    pub last_date: Option<NaiveDateTime>,
    pub total_new_cases: f64,
    pub peak_infected: f64,
    /// Row of the peak infected estimate (first on ties).
    pub peak_row: usize,
    pub final_recovered: f64,
    pub final_susceptible: Option<f64>,
}

/// Summarise estimator output. `date_col` is read from the output table when
/// it holds parsed dates.
pub fn summarize_estimate(table: &Table, derived: &DerivedColumns, date_col: &str) -> Option<EstimateSummary> {
    let last = derived.len().checked_sub(1)?;

    let (first_date, last_date) = match table.column(date_col) {
        Some(Column::Date(dates)) => (
            dates.iter().flatten().min().copied(),
            dates.iter().flatten().max().copied(),
        ),
        _ => (None, None),
    };

    let mut peak_row = 0;
    for (row, &v) in derived.infected.iter().enumerate() {
        if v > derived.infected[peak_row] {
            peak_row = row;
        }
    }

    Some(EstimateSummary {
        rows: derived.len(),
        first_date,
        last_date,
        total_new_cases: derived.new_cases.iter().sum(),
        peak_infected: derived.infected[peak_row],
        peak_row,
        final_recovered: derived.recovered[last],
        final_susceptible: derived.susceptible[last],
    })
}
