//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - inspects CSV files
//! - runs the estimator / integrator / sweep
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::debug;

use crate::cli::{
    Command, EstimateArgs, EstimatorArgs, InspectArgs, PlotArgs, SampleArgs, SimulateArgs, SweepArgs,
};
use crate::domain::{
    EstimateConfig, EstimatorConfig, InitialSource, SampleConfig, SimulateConfig, SirParams, SirState,
    SweepConfig,
};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sir` binary.
pub fn run() -> Result<(), AppError> {
    // A bare `sir` (or `sir a.csv b.csv`) behaves like `sir inspect ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Inspect(args) => handle_inspect(args),
        Command::Estimate(args) => handle_estimate(args),
        Command::Simulate(args) => handle_simulate(args),
        Command::Sweep(args) => handle_sweep(args),
        Command::Sample(args) => handle_sample(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_inspect(args: InspectArgs) -> Result<(), AppError> {
    let targets = if args.files.is_empty() {
        crate::io::inspect::default_targets()
    } else {
        args.files
            .into_iter()
            .map(crate::io::inspect::InspectTarget::for_path)
            .collect()
    };

    for target in targets {
        let summary = crate::io::inspect::inspect_csv(&target.path)?;
        print!("{}", crate::io::inspect::format_inspection(&target.label, &summary));
    }
    Ok(())
}

fn handle_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let config = estimate_config_from_args(&args);
    let run = pipeline::run_estimate(&config)?;

    println!(
        "{}",
        crate::report::format_estimate_summary(&run.ingest, &run.summary, &config.estimator)
    );
    println!(
        "{}",
        crate::report::format_table_preview(&run.estimate.table, config.preview_rows)
    );

    if config.plot {
        let rows: Vec<f64> = (0..run.estimate.derived.len()).map(|r| r as f64).collect();
        let series = [
            crate::plot::Series::new('I', &rows, &run.estimate.derived.infected),
            crate::plot::Series::new('R', &rows, &run.estimate.derived.recovered),
        ];
        let plot = crate::plot::render_plot(&series, &[], config.plot_width, config.plot_height);
        println!("{plot}");
    }

    if let Some(path) = &config.export_results {
        crate::io::export::write_table_csv(path, &run.estimate.table)?;
        debug!(path = %path.display(), "exported estimator table");
    }

    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let config = simulate_config_from_args(&args);
    let run = pipeline::run_simulate(&config)?;

    println!("{}", crate::report::format_trajectory_summary(&run.summary));

    if config.plot {
        let plot = crate::plot::render_trajectory_plot(
            &run.trajectory,
            config.plot_width,
            config.plot_height,
            None,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.export_trajectory {
        let file =
            crate::io::trajectory::trajectory_file(config.params, config.population, run.initial, &run.trajectory);
        crate::io::trajectory::write_trajectory_json(path, &file)?;
        debug!(path = %path.display(), "exported trajectory");
    }

    Ok(())
}

fn handle_sweep(args: SweepArgs) -> Result<(), AppError> {
    let config = sweep_config_from_args(&args);
    let points = crate::sweep::run_sweep(&config)?;

    let shown = if config.top_n > 0 {
        crate::sweep::rank_by_peak(&points, config.top_n)
    } else {
        points.clone()
    };
    println!("{}", crate::report::format_sweep_table(&shown));

    if let Some(path) = &config.export_results {
        crate::io::export::write_sweep_csv(path, &points)?;
        debug!(path = %path.display(), "exported sweep results");
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args);
    let sample = crate::data::generate_case_series(&config)?;
    crate::io::export::write_table_csv(&config.output, &sample.table)?;

    println!(
        "Wrote {} days of cumulative cases to {}",
        sample.table.n_rows(),
        config.output.display()
    );
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::trajectory::read_trajectory_json(&args.trajectory)?;
    let plot = crate::plot::render_trajectory_plot(&file.trajectory, args.width, args.height, None);

    println!("{plot}");
    Ok(())
}

pub fn estimator_config_from_args(args: &EstimatorArgs, population: Option<f64>) -> EstimatorConfig {
    EstimatorConfig {
        date_col: args.date_col.clone(),
        cumulative_col: args.cumulative_col.clone(),
        population,
        infectious_period: args.infectious_period,
        recovered_col: args.recovered_col.clone(),
        new_case_col: args.new_case_col.clone(),
        infected_col: args.infected_col.clone(),
        recovered_out_col: args.recovered_out_col.clone(),
        susceptible_col: args.susceptible_col.clone(),
    }
}

pub fn estimate_config_from_args(args: &EstimateArgs) -> EstimateConfig {
    EstimateConfig {
        csv_path: args.csv.clone(),
        estimator: estimator_config_from_args(&args.estimator, args.population),
        preview_rows: args.preview,
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
    }
}

pub fn simulate_config_from_args(args: &SimulateArgs) -> SimulateConfig {
    let initial = match &args.from_csv {
        Some(path) => InitialSource::Estimated {
            csv_path: path.clone(),
            estimator: estimator_config_from_args(&args.estimator, Some(args.population)),
            row: args.from_row,
        },
        None => InitialSource::Explicit(SirState {
            s: args.s0.unwrap_or(args.population - args.i0 - args.r0),
            i: args.i0,
            r: args.r0,
        }),
    };

    SimulateConfig {
        params: SirParams {
            beta: args.beta,
            gamma: args.gamma,
        },
        population: args.population,
        initial,
        t_end: args.t_end,
        dt: args.dt,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_trajectory: args.export.clone(),
    }
}

pub fn sweep_config_from_args(args: &SweepArgs) -> SweepConfig {
    SweepConfig {
        beta_min: args.beta_min,
        beta_max: args.beta_max,
        beta_steps: args.beta_steps,
        gamma_min: args.gamma_min,
        gamma_max: args.gamma_max,
        gamma_steps: args.gamma_steps,
        population: args.population,
        initial: SirState {
            s: args.population - args.i0 - args.r0,
            i: args.i0,
            r: args.r0,
        },
        t_end: args.t_end,
        dt: args.dt,
        top_n: args.top,
        export_results: args.export.clone(),
    }
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        params: SirParams {
            beta: args.beta,
            gamma: args.gamma,
        },
        population: args.population,
        initial_infected: args.i0,
        days: args.days,
        start_date: args.start,
        seed: args.seed,
        noiseless: args.noiseless,
        date_col: args.date_col.clone(),
        cumulative_col: args.cumulative_col.clone(),
        output: args.output.clone(),
    }
}

/// Rewrite argv so `sir` defaults to `sir inspect`.
///
/// Rules:
/// - `sir`                      -> `sir inspect`
/// - `sir a.csv b.csv`          -> `sir inspect a.csv b.csv`
/// - `sir --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("inspect".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "inspect" | "estimate" | "simulate" | "sweep" | "sample" | "plot"
    );
    if is_subcommand || arg1.starts_with('-') {
        return argv;
    }

    // A bare path: treat it as a file to inspect.
    argv.insert(1, "inspect".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_inspects() {
        assert_eq!(rewrite_args(argv(&["sir"])), argv(&["sir", "inspect"]));
        assert_eq!(
            rewrite_args(argv(&["sir", "a.csv"])),
            argv(&["sir", "inspect", "a.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_untouched() {
        for args in [&["sir", "--help"][..], &["sir", "simulate", "-b", "0.3"][..], &["sir", "-V"][..]] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn simulate_defaults_s0_from_population() {
        let cli = crate::cli::Cli::parse_from(["sir", "simulate", "-b", "0.3", "-g", "0.1", "-N", "500", "--i0", "5"]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        let config = simulate_config_from_args(&args);
        assert_eq!(
            config.initial,
            InitialSource::Explicit(SirState { s: 495.0, i: 5.0, r: 0.0 })
        );
        assert!(config.plot);
    }

    #[test]
    fn from_csv_carries_population_into_estimator() {
        let cli = crate::cli::Cli::parse_from([
            "sir", "simulate", "-b", "0.3", "-g", "0.1", "-N", "500", "--from-csv", "cases.csv", "--no-plot",
        ]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        let config = simulate_config_from_args(&args);
        let InitialSource::Estimated { estimator, row, .. } = config.initial else {
            panic!("expected estimated initial state");
        };
        assert_eq!(estimator.population, Some(500.0));
        assert_eq!(row, None);
        assert!(!config.plot);
    }
}
