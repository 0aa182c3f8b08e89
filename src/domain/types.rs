//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - used in-memory by the estimator and integrator
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column names and parameters for the cumulative → SIR estimator.
///
/// Defaults:
///
/// | field               | default              |
/// |---------------------|----------------------|
/// | `date_col`          | `"date"`             |
/// | `cumulative_col`    | `"cumulative_cases"` |
/// | `population`        | `None`               |
/// | `infectious_period` | `8`                  |
/// | `recovered_col`     | `None`               |
/// | `new_case_col`      | `"new_cases"`        |
/// | `infected_col`      | `"I_est"`            |
/// | `recovered_out_col` | `"R_est"`            |
/// | `susceptible_col`   | `"S_est"`            |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub date_col: String,
    pub cumulative_col: String,
    /// Total population. Without it the susceptible estimate is undefined.
    pub population: Option<f64>,
    /// Rolling-window length for I and lag for R, in rows of the date grid.
    pub infectious_period: usize,
    /// Observed recovered counts, used instead of the lagged proxy when the
    /// column exists.
    pub recovered_col: Option<String>,
    pub new_case_col: String,
    pub infected_col: String,
    pub recovered_out_col: String,
    pub susceptible_col: String,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            date_col: "date".to_string(),
            cumulative_col: "cumulative_cases".to_string(),
            population: None,
            infectious_period: 8,
            recovered_col: None,
            new_case_col: "new_cases".to_string(),
            infected_col: "I_est".to_string(),
            recovered_out_col: "R_est".to_string(),
            susceptible_col: "S_est".to_string(),
        }
    }
}

/// SIR rate parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SirParams {
    /// Infection rate β.
    pub beta: f64,
    /// Recovery rate γ.
    pub gamma: f64,
}

impl SirParams {
    /// Basic reproduction number `β/γ`. `None` when γ is zero.
    pub fn r0(&self) -> Option<f64> {
        if self.gamma == 0.0 {
            None
        } else {
            Some(self.beta / self.gamma)
        }
    }
}

/// One SIR state (compartment sizes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SirState {
    pub s: f64,
    pub i: f64,
    pub r: f64,
}

impl SirState {
    pub fn total(&self) -> f64 {
        self.s + self.i + self.r
    }
}

/// S, I, R sampled on a time grid. All four vectors have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SirTrajectory {
    pub t: Vec<f64>,
    pub s: Vec<f64>,
    pub i: Vec<f64>,
    pub r: Vec<f64>,
}

impl SirTrajectory {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn state(&self, n: usize) -> Option<SirState> {
        Some(SirState {
            s: *self.s.get(n)?,
            i: *self.i.get(n)?,
            r: *self.r.get(n)?,
        })
    }

    /// Index and value of the largest infected count (first one on ties).
    pub fn peak_infected(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, &v) in self.i.iter().enumerate() {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((idx, v)),
            }
        }
        best
    }
}

/// A saved trajectory file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryFile {
    pub tool: String,
    pub method: String,
    pub params: SirParams,
    pub population: f64,
    pub initial: SirState,
    pub trajectory: SirTrajectory,
}

/// Where `simulate` takes its initial state from.
#[derive(Debug, Clone, PartialEq)]
pub enum InitialSource {
    /// Explicit `S0, I0, R0`.
    Explicit(SirState),
    /// A row of the estimator output for a case CSV (last row when `None`).
    Estimated {
        csv_path: PathBuf,
        estimator: EstimatorConfig,
        row: Option<usize>,
    },
}

/// A full `simulate` run configuration (derived from CLI flags).
#[derive(Debug, Clone, PartialEq)]
pub struct SimulateConfig {
    pub params: SirParams,
    pub population: f64,
    pub initial: InitialSource,
    pub t_end: f64,
    pub dt: f64,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_trajectory: Option<PathBuf>,
}

/// A full `estimate` run configuration (derived from CLI flags).
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateConfig {
    pub csv_path: PathBuf,
    pub estimator: EstimatorConfig,
    pub preview_rows: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_results: Option<PathBuf>,
}

/// β × γ sweep configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub beta_min: f64,
    pub beta_max: f64,
    pub beta_steps: usize,
    pub gamma_min: f64,
    pub gamma_max: f64,
    pub gamma_steps: usize,
    pub population: f64,
    pub initial: SirState,
    pub t_end: f64,
    pub dt: f64,
    /// Print only the top-N scenarios by peak infected (0 = all).
    pub top_n: usize,
    pub export_results: Option<PathBuf>,
}

/// Synthetic case-series configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub params: SirParams,
    pub population: f64,
    pub initial_infected: f64,
    pub days: usize,
    pub start_date: NaiveDate,
    pub seed: u64,
    /// Disable Poisson noise (incidence taken straight from the trajectory).
    pub noiseless: bool,
    pub date_col: String,
    pub cumulative_col: String,
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimator_defaults() {
        let c = EstimatorConfig::default();
        assert_eq!(c.date_col, "date");
        assert_eq!(c.cumulative_col, "cumulative_cases");
        assert_eq!(c.infectious_period, 8);
        assert!(c.population.is_none());
        assert_eq!(
            [
                c.new_case_col.as_str(),
                c.infected_col.as_str(),
                c.recovered_out_col.as_str(),
                c.susceptible_col.as_str(),
            ],
            ["new_cases", "I_est", "R_est", "S_est"]
        );
    }

    #[test]
    fn r0_undefined_without_recovery() {
        assert_eq!(SirParams { beta: 0.3, gamma: 0.1 }.r0().map(|v| (v * 10.0).round()), Some(30.0));
        assert!(SirParams { beta: 0.3, gamma: 0.0 }.r0().is_none());
    }

    #[test]
    fn peak_infected_first_on_ties() {
        let tr = SirTrajectory {
            t: vec![0.0, 1.0, 2.0, 3.0],
            s: vec![0.0; 4],
            i: vec![1.0, 3.0, 3.0, 2.0],
            r: vec![0.0; 4],
        };
        assert_eq!(tr.peak_infected(), Some((1, 3.0)));
        assert_eq!(tr.state(3).map(|s| s.i), Some(2.0));
        assert!(tr.state(4).is_none());
    }
}
