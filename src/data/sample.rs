//! Synthetic cumulative-case series generated from an SIR trajectory.
//!
//! Daily incidence is the drop in S between consecutive days of a unit-step
//! Euler run; day 0 reports the initial infected. Each day's count is then
//! drawn from a Poisson distribution with that mean (unless noiseless), and
//! the counts are accumulated into a cumulative column.

use chrono::Duration;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Poisson};
use tracing::debug;

use crate::domain::{Column, SampleConfig, SirState, SirTrajectory, Table};
use crate::error::AppError;
use crate::math::time_grid;
use crate::models::euler_sir;

#[derive(Debug, Clone)]
pub struct SampleData {
    /// `date` + `cumulative_cases` columns (names from the config).
    pub table: Table,
    /// Noise-free daily incidence the counts were drawn around.
    pub expected_incidence: Vec<f64>,
    pub trajectory: SirTrajectory,
}

pub fn generate_case_series(config: &SampleConfig) -> Result<SampleData, AppError> {
    if config.days == 0 {
        return Err(AppError::new(2, "Sample days must be > 0."));
    }
    if !(config.population.is_finite() && config.population > 0.0) {
        return Err(AppError::new(2, "Population must be finite and > 0."));
    }
    if !(config.initial_infected.is_finite()
        && config.initial_infected >= 0.0
        && config.initial_infected <= config.population)
    {
        return Err(AppError::new(2, "Initial infected must be within [0, population]."));
    }
    if !(config.params.beta.is_finite()
        && config.params.gamma.is_finite()
        && config.params.beta >= 0.0
        && config.params.gamma >= 0.0)
    {
        return Err(AppError::new(2, "Invalid rate settings (beta/gamma must be finite and >= 0)."));
    }

    let initial = SirState {
        s: config.population - config.initial_infected,
        i: config.initial_infected,
        r: 0.0,
    };
    let t = time_grid((config.days - 1) as f64, 1.0)?;
    let trajectory = euler_sir(config.params, initial, &t, config.population)?;

    let mut expected_incidence = Vec::with_capacity(config.days);
    expected_incidence.push(config.initial_infected);
    for n in 1..trajectory.len() {
        expected_incidence.push((trajectory.s[n - 1] - trajectory.s[n]).max(0.0));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut cumulative = Vec::with_capacity(config.days);
    let mut total = 0.0;
    for &mean in &expected_incidence {
        let count = if config.noiseless {
            mean
        } else {
            draw_poisson(&mut rng, mean)?
        };
        total += count;
        cumulative.push(Some(total));
    }

    let dates = (0..config.days)
        .map(|d| {
            config
                .start_date
                .checked_add_signed(Duration::days(d as i64))
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
        .collect();

    let table = Table::new()
        .with_column(config.date_col.clone(), Column::Date(dates))?
        .with_column(config.cumulative_col.clone(), Column::Number(cumulative))?;

    debug!(days = config.days, seed = config.seed, final_cumulative = total, "generated case series");

    Ok(SampleData {
        table,
        expected_incidence,
        trajectory,
    })
}

fn draw_poisson(rng: &mut StdRng, mean: f64) -> Result<f64, AppError> {
    if mean <= 0.0 {
        return Ok(0.0);
    }
    let dist = Poisson::new(mean)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;
    Ok(dist.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SirParams;
    use chrono::NaiveDate;

    fn config(seed: u64, noiseless: bool) -> SampleConfig {
        SampleConfig {
            params: SirParams { beta: 0.4, gamma: 0.1 },
            population: 10_000.0,
            initial_infected: 5.0,
            days: 60,
            start_date: NaiveDate::from_ymd_opt(2014, 4, 1).unwrap(),
            seed,
            noiseless,
            date_col: "date".to_string(),
            cumulative_col: "cumulative_cases".to_string(),
            output: std::path::PathBuf::from("unused.csv"),
        }
    }

    fn cumulative(data: &SampleData) -> Vec<f64> {
        data.table
            .numbers("cumulative_cases")
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn same_seed_same_series() {
        let a = generate_case_series(&config(7, false)).unwrap();
        let b = generate_case_series(&config(7, false)).unwrap();
        assert_eq!(a.table, b.table);
    }

    #[test]
    fn cumulative_is_non_decreasing_integer_counts() {
        let data = generate_case_series(&config(11, false)).unwrap();
        let cum = cumulative(&data);
        assert_eq!(cum.len(), 60);
        assert!(cum.windows(2).all(|w| w[1] >= w[0]));
        assert!(cum.iter().all(|v| v.fract() == 0.0));
    }

    #[test]
    fn noiseless_series_tracks_susceptible_depletion() {
        let data = generate_case_series(&config(0, true)).unwrap();
        let cum = cumulative(&data);
        let tr = &data.trajectory;
        let expected = 5.0 + (tr.s[0] - tr.s[tr.len() - 1]);
        assert!((cum[59] - expected).abs() < 1e-6);
        assert_eq!(cum[0], 5.0);
    }

    #[test]
    fn dates_are_consecutive_days() {
        let data = generate_case_series(&config(1, true)).unwrap();
        let dates = data.table.column("date").unwrap();
        assert_eq!(dates.cell_text(0), "2014-04-01");
        assert_eq!(dates.cell_text(30), "2014-05-01");
    }

    #[test]
    fn rejects_bad_settings() {
        let mut c = config(1, true);
        c.days = 0;
        assert!(generate_case_series(&c).is_err());

        let mut c = config(1, true);
        c.initial_infected = 20_000.0;
        assert!(generate_case_series(&c).is_err());
    }
}
