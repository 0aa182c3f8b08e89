//! Command-line parsing for the SIR toolkit.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the numerical code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sir", version, about = "Cumulative-case SIR estimates and Euler SIR integration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the headers and row count of CSV files.
    ///
    /// Without arguments, inspects `UpdatedMetaData.csv` and `UpdatedLuminex.csv`
    /// in the current directory.
    Inspect(InspectArgs),
    /// Derive new cases and S/I/R estimates from a cumulative case CSV.
    Estimate(EstimateArgs),
    /// Integrate the SIR equations with Euler's method.
    Simulate(SimulateArgs),
    /// Integrate a grid of (beta, gamma) scenarios in parallel.
    Sweep(SweepArgs),
    /// Generate a synthetic cumulative case CSV from an SIR run.
    Sample(SampleArgs),
    /// Plot a previously exported trajectory JSON.
    Plot(PlotArgs),
}

#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// CSV files to inspect.
    #[arg(value_name = "CSV")]
    pub files: Vec<PathBuf>,
}

/// Column names and window for the estimator.
#[derive(Debug, Args, Clone)]
pub struct EstimatorArgs {
    /// Date column (rows are sorted by it when present).
    #[arg(long, default_value = "date")]
    pub date_col: String,

    /// Cumulative case count column.
    #[arg(long, default_value = "cumulative_cases")]
    pub cumulative_col: String,

    /// Infectious period in rows (rolling window for I, lag for R).
    #[arg(short = 'w', long, default_value_t = 8)]
    pub infectious_period: usize,

    /// Observed recovered column (used instead of the lagged proxy if present).
    #[arg(long)]
    pub recovered_col: Option<String>,

    /// Output column for daily new cases.
    #[arg(long, default_value = "new_cases")]
    pub new_case_col: String,

    /// Output column for the infected estimate.
    #[arg(long, default_value = "I_est")]
    pub infected_col: String,

    /// Output column for the recovered estimate.
    #[arg(long, default_value = "R_est")]
    pub recovered_out_col: String,

    /// Output column for the susceptible estimate.
    #[arg(long, default_value = "S_est")]
    pub susceptible_col: String,
}

#[derive(Debug, Parser)]
pub struct EstimateArgs {
    /// Case CSV with a date column and a cumulative case column.
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Total population (enables the susceptible estimate).
    #[arg(short = 'N', long)]
    pub population: Option<f64>,

    #[command(flatten)]
    pub estimator: EstimatorArgs,

    /// Rows shown at the head and tail of the preview.
    #[arg(long, default_value_t = 5)]
    pub preview: usize,

    /// Render an ASCII plot of I_est / R_est.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the augmented table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct SimulateArgs {
    /// Infection rate beta.
    #[arg(short = 'b', long)]
    pub beta: f64,

    /// Recovery rate gamma.
    #[arg(short = 'g', long)]
    pub gamma: f64,

    /// Total population N.
    #[arg(short = 'N', long, default_value_t = 1000.0)]
    pub population: f64,

    /// Initial susceptible (default: N - I0 - R0).
    #[arg(long)]
    pub s0: Option<f64>,

    /// Initial infected.
    #[arg(long, default_value_t = 1.0)]
    pub i0: f64,

    /// Initial recovered.
    #[arg(long, default_value_t = 0.0)]
    pub r0: f64,

    /// Take the initial state from the estimator output of this case CSV.
    #[arg(long, value_name = "CSV", conflicts_with_all = ["s0"])]
    pub from_csv: Option<PathBuf>,

    /// Row of the estimator output to start from (default: last row).
    #[arg(long, requires = "from_csv")]
    pub from_row: Option<usize>,

    #[command(flatten)]
    pub estimator: EstimatorArgs,

    /// End time of the grid (same unit as the rates).
    #[arg(long, default_value_t = 160.0)]
    pub t_end: f64,

    /// Step size.
    #[arg(long, default_value_t = 1.0)]
    pub dt: f64,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the trajectory to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct SweepArgs {
    #[arg(long, default_value_t = 0.1)]
    pub beta_min: f64,

    #[arg(long, default_value_t = 0.5)]
    pub beta_max: f64,

    #[arg(long, default_value_t = 5)]
    pub beta_steps: usize,

    #[arg(long, default_value_t = 0.05)]
    pub gamma_min: f64,

    #[arg(long, default_value_t = 0.2)]
    pub gamma_max: f64,

    #[arg(long, default_value_t = 4)]
    pub gamma_steps: usize,

    /// Total population N.
    #[arg(short = 'N', long, default_value_t = 1000.0)]
    pub population: f64,

    /// Initial infected (S0 = N - I0 - R0).
    #[arg(long, default_value_t = 1.0)]
    pub i0: f64,

    /// Initial recovered.
    #[arg(long, default_value_t = 0.0)]
    pub r0: f64,

    #[arg(long, default_value_t = 160.0)]
    pub t_end: f64,

    #[arg(long, default_value_t = 1.0)]
    pub dt: f64,

    /// Show only the top-N scenarios by peak infected (0 = all, grid order).
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    /// Export all scenarios to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct SampleArgs {
    #[arg(short = 'b', long, default_value_t = 0.3)]
    pub beta: f64,

    #[arg(short = 'g', long, default_value_t = 0.1)]
    pub gamma: f64,

    #[arg(short = 'N', long, default_value_t = 100_000.0)]
    pub population: f64,

    /// Cases reported on day 0.
    #[arg(long, default_value_t = 10.0)]
    pub i0: f64,

    #[arg(long, default_value_t = 120)]
    pub days: usize,

    /// First date of the series (YYYY-MM-DD).
    #[arg(long, default_value = "2014-04-01")]
    pub start: NaiveDate,

    /// Random seed for the Poisson noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Use the expected incidence without noise.
    #[arg(long)]
    pub noiseless: bool,

    #[arg(long, default_value = "date")]
    pub date_col: String,

    #[arg(long, default_value = "cumulative_cases")]
    pub cumulative_col: String,

    /// Output CSV.
    #[arg(short = 'o', long, default_value = "cases.csv")]
    pub output: PathBuf,
}

/// Options for plotting a saved trajectory.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Trajectory JSON file produced by `sir simulate --export`.
    #[arg(long, value_name = "JSON")]
    pub trajectory: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
