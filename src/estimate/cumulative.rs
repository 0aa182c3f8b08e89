//! Cumulative reported cases → S, I, R estimates.
//!
//! Given a table with a date column and a cumulative case column:
//!
//! - `new_cases[i] = cum[i] - cum[i-1]` (`new_cases[0] = cum[0]`), clipped at 0
//! - `I_est[i]` = rolling sum of `new_cases` over `infectious_period` rows
//!   (the window shrinks near the start)
//! - `R_est[i] = cum[i - infectious_period]` (0 before that), or the observed
//!   recovered column when one is configured and present
//! - `S_est[i] = max(0, N - I_est[i] - R_est[i])` when the population `N` is
//!   known, otherwise missing
//!
//! The input table is never modified. Rows are returned sorted by date.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{Column, EstimatorConfig, SirState, Table, parse_timestamp};
use crate::error::{SirError, SirResult};
use crate::math::{clip_lower, clipped_diff, lag, rolling_sum};

/// The four derived series, aligned with the (sorted) table rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedColumns {
    pub new_cases: Vec<f64>,
    pub infected: Vec<f64>,
    pub recovered: Vec<f64>,
    /// `None` everywhere when no population was supplied.
    pub susceptible: Vec<Option<f64>>,
}

impl DerivedColumns {
    pub fn len(&self) -> usize {
        self.new_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.new_cases.is_empty()
    }

    /// SIR state at `row`, for seeding the integrator.
    ///
    /// Uses the susceptible estimate when it is defined; otherwise derives it
    /// from `population` the same way the estimator does.
    pub fn initial_conditions(&self, row: usize, population: f64) -> SirResult<SirState> {
        if row >= self.len() {
            return Err(SirError::invalid_input(format!(
                "Row {row} is out of range (series has {} rows).",
                self.len()
            )));
        }
        let i = self.infected[row];
        let r = self.recovered[row];
        let s = match self.susceptible[row] {
            Some(s) => s,
            None => (population - i - r).max(0.0),
        };
        Ok(SirState { s, i, r })
    }
}

/// Estimator output: the augmented table plus typed access to the new columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub table: Table,
    pub derived: DerivedColumns,
}

/// Add `new_cases`, `I_est`, `R_est` and `S_est` columns (names from `config`)
/// to a copy of `table`.
///
/// # Errors
/// `InvalidInput` when the cumulative column is missing or has missing /
/// non-numeric cells, the table is empty, the date column cannot be parsed,
/// `infectious_period` is 0, the population is not finite, or the recovered
/// column is not numeric.
pub fn convert_cumulative_to_sir(table: &Table, config: &EstimatorConfig) -> SirResult<Table> {
    estimate(table, config).map(|e| e.table)
}

/// Same as [`convert_cumulative_to_sir`], also returning the derived columns.
pub fn estimate(table: &Table, config: &EstimatorConfig) -> SirResult<Estimate> {
    let mut out = match table.column(&config.date_col) {
        Some(dates) => {
            let (order, parsed) = sort_order(&config.date_col, dates)?;
            let mut sorted = table.take_rows(&order);
            sorted.set_column(config.date_col.clone(), parsed.take(&order))?;
            sorted
        }
        None => table.clone(),
    };

    if !out.contains(&config.cumulative_col) {
        return Err(SirError::invalid_input(format!(
            "Column '{}' not found in table.",
            config.cumulative_col
        )));
    }
    if out.n_rows() == 0 {
        return Err(SirError::invalid_input("Table has no rows."));
    }

    let cumulative = out
        .numbers(&config.cumulative_col)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                SirError::invalid_input(format!(
                    "Column '{}' has a missing value at row {row}.",
                    config.cumulative_col
                ))
            })
        })
        .collect::<SirResult<Vec<f64>>>()?;

    let recovered = match &config.recovered_col {
        Some(name) if out.contains(name) => Some(out.numbers(name)?),
        _ => None,
    };

    let derived = derive_sir_columns(
        &cumulative,
        recovered.as_deref(),
        config.population,
        config.infectious_period,
    )?;

    debug!(
        rows = derived.len(),
        window = config.infectious_period,
        observed_recovered = recovered.is_some(),
        "derived SIR columns"
    );

    out.set_column(config.new_case_col.clone(), to_number_column(&derived.new_cases))?;
    out.set_column(config.infected_col.clone(), to_number_column(&derived.infected))?;
    out.set_column(config.recovered_out_col.clone(), to_number_column(&derived.recovered))?;
    out.set_column(
        config.susceptible_col.clone(),
        Column::Number(derived.susceptible.clone()),
    )?;

    Ok(Estimate { table: out, derived })
}

/// The numerical core of the estimator, on plain sequences.
///
/// `recovered` (observed counts, missing → 0) replaces the lagged proxy when
/// given.
pub fn derive_sir_columns(
    cumulative: &[f64],
    recovered: Option<&[Option<f64>]>,
    population: Option<f64>,
    infectious_period: usize,
) -> SirResult<DerivedColumns> {
    let mut new_cases = clipped_diff(cumulative);

    if infectious_period == 0 {
        return Err(SirError::invalid_input("infectious_period must be a positive integer."));
    }
    if let Some(p) = population {
        if !p.is_finite() {
            return Err(SirError::invalid_input(format!("Population must be finite (got {p}).")));
        }
    }

    let mut infected = rolling_sum(&new_cases, infectious_period);

    let mut recovered = match recovered {
        Some(observed) => observed.iter().map(|v| v.unwrap_or(0.0)).collect(),
        None => lag(cumulative, infectious_period, 0.0),
    };

    // S is taken before the final clamp on R, so a negative R raises S.
    let susceptible = match population {
        Some(p) => infected
            .iter()
            .zip(&recovered)
            .map(|(i, r)| Some((p - i - r).max(0.0)))
            .collect(),
        None => vec![None; cumulative.len()],
    };

    clip_lower(&mut new_cases, 0.0);
    clip_lower(&mut infected, 0.0);
    clip_lower(&mut recovered, 0.0);

    Ok(DerivedColumns {
        new_cases,
        infected,
        recovered,
        susceptible,
    })
}

fn to_number_column(values: &[f64]) -> Column {
    Column::Number(values.iter().copied().map(Some).collect())
}

/// Stable ascending order of the rows by the date column, missing last.
///
/// Returns the permutation and the parsed column (text dates become
/// timestamps; numeric columns are ordered by value and kept numeric).
fn sort_order(name: &str, column: &Column) -> SirResult<(Vec<usize>, Column)> {
    let mut order: Vec<usize> = (0..column.len()).collect();

    let parsed = match column {
        Column::Number(values) => {
            order.sort_by(|&a, &b| cmp_missing_last(values[a], values[b], f64::total_cmp));
            column.clone()
        }
        Column::Date(values) => {
            order.sort_by(|&a, &b| cmp_missing_last(values[a], values[b], NaiveDateTime::cmp));
            column.clone()
        }
        Column::Text(cells) => {
            let values = cells
                .iter()
                .enumerate()
                .map(|(row, cell)| match cell {
                    None => Ok(None),
                    Some(s) => parse_timestamp(s).map(Some).ok_or_else(|| {
                        SirError::invalid_input(format!(
                            "Column '{name}': cannot parse '{s}' at row {row} as a date."
                        ))
                    }),
                })
                .collect::<SirResult<Vec<Option<NaiveDateTime>>>>()?;
            order.sort_by(|&a, &b| cmp_missing_last(values[a], values[b], NaiveDateTime::cmp));
            Column::Date(values)
        }
    };

    Ok((order, parsed))
}

fn cmp_missing_last<T: Copy>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(cells: &[&str]) -> Column {
        Column::Text(
            cells
                .iter()
                .map(|s| if s.is_empty() { None } else { Some(s.to_string()) })
                .collect(),
        )
    }

    fn numbers(values: &[f64]) -> Column {
        Column::Number(values.iter().copied().map(Some).collect())
    }

    fn case_table(dates: &[&str], cumulative: &[f64]) -> Table {
        Table::new()
            .with_column("date", text(dates))
            .unwrap()
            .with_column("cumulative_cases", numbers(cumulative))
            .unwrap()
    }

    fn column_values(table: &Table, name: &str) -> Vec<f64> {
        table
            .numbers(name)
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn non_monotonic_cumulative_is_clipped() {
        let d = derive_sir_columns(&[10.0, 15.0, 13.0, 20.0], None, None, 2).unwrap();
        assert_eq!(d.new_cases, vec![10.0, 5.0, 0.0, 7.0]);
        assert_eq!(d.infected, vec![10.0, 15.0, 5.0, 7.0]);
        assert_eq!(d.recovered, vec![0.0, 0.0, 10.0, 15.0]);
        assert_eq!(d.susceptible, vec![None; 4]);
    }

    #[test]
    fn susceptible_with_population() {
        let d = derive_sir_columns(&[10.0, 15.0, 13.0, 20.0], None, Some(100.0), 2).unwrap();
        assert_eq!(
            d.susceptible,
            vec![Some(90.0), Some(85.0), Some(85.0), Some(78.0)]
        );

        let tiny = derive_sir_columns(&[10.0, 15.0], None, Some(12.0), 2).unwrap();
        assert_eq!(tiny.susceptible, vec![Some(2.0), Some(0.0)]);
    }

    #[test]
    fn observed_recovered_replaces_lag_proxy() {
        let observed = [Some(1.0), None, Some(4.0), Some(-3.0)];
        let d = derive_sir_columns(&[10.0, 15.0, 13.0, 20.0], Some(&observed), Some(100.0), 2).unwrap();
        assert_eq!(d.recovered, vec![1.0, 0.0, 4.0, 0.0]);
        // S uses R before the final clamp: 100 - 7 - (-3) = 96.
        assert_eq!(d.susceptible[3], Some(96.0));
    }

    #[test]
    fn derived_values_are_non_negative() {
        let cumulative = [5.0, 3.0, 9.0, 9.0, 2.0, 30.0, 31.0, 12.0, 40.0];
        for w in 1..6 {
            let d = derive_sir_columns(&cumulative, None, Some(20.0), w).unwrap();
            for i in 0..cumulative.len() {
                assert!(d.new_cases[i] >= 0.0);
                assert!(d.infected[i] >= 0.0);
                assert!(d.recovered[i] >= 0.0);
                assert!(d.susceptible[i].unwrap() >= 0.0);
            }
        }
    }

    #[test]
    fn zero_window_is_invalid() {
        let err = derive_sir_columns(&[1.0, 2.0], None, None, 0).unwrap_err();
        assert!(matches!(err, SirError::InvalidInput(_)));
    }

    #[test]
    fn table_rows_are_sorted_by_date() {
        let table = case_table(&["2014-05-03", "2014-05-01", "2014-05-02"], &[20.0, 10.0, 15.0]);
        let config = EstimatorConfig {
            infectious_period: 2,
            ..EstimatorConfig::default()
        };
        let out = convert_cumulative_to_sir(&table, &config).unwrap();

        assert_eq!(out.column("date").map(Column::kind), Some("date"));
        assert_eq!(out.column("date").unwrap().cell_text(0), "2014-05-01");
        assert_eq!(column_values(&out, "cumulative_cases"), vec![10.0, 15.0, 20.0]);
        assert_eq!(column_values(&out, "new_cases"), vec![10.0, 5.0, 5.0]);
        assert_eq!(column_values(&out, "I_est"), vec![10.0, 15.0, 10.0]);
        assert_eq!(column_values(&out, "R_est"), vec![0.0, 0.0, 10.0]);
        assert_eq!(out.numbers("S_est").unwrap(), vec![None, None, None]);

        // Input untouched.
        assert_eq!(table.n_cols(), 2);
        assert_eq!(table.column("date").map(Column::kind), Some("text"));
    }

    #[test]
    fn missing_dates_sort_last_and_ties_keep_input_order() {
        let table = case_table(&["", "2014-05-02", "2014-05-01", "2014-05-01"], &[1.0, 2.0, 3.0, 4.0]);
        let out = convert_cumulative_to_sir(&table, &EstimatorConfig::default()).unwrap();
        assert_eq!(column_values(&out, "cumulative_cases"), vec![3.0, 4.0, 2.0, 1.0]);
        assert_eq!(out.column("date").unwrap().cell_text(3), "");
    }

    #[test]
    fn without_date_column_input_order_is_kept() {
        let table = Table::new()
            .with_column("cumulative_cases", numbers(&[10.0, 15.0, 13.0, 20.0]))
            .unwrap();
        let config = EstimatorConfig {
            infectious_period: 2,
            ..EstimatorConfig::default()
        };
        let out = convert_cumulative_to_sir(&table, &config).unwrap();
        assert_eq!(column_values(&out, "new_cases"), vec![10.0, 5.0, 0.0, 7.0]);
        assert_eq!(column_values(&out, "I_est"), vec![10.0, 15.0, 5.0, 7.0]);
    }

    #[test]
    fn custom_column_names_and_recovered_column() {
        let table = Table::new()
            .with_column("day", numbers(&[2.0, 1.0]))
            .unwrap()
            .with_column("cases", numbers(&[7.0, 4.0]))
            .unwrap()
            .with_column("recovered", Column::Number(vec![Some(1.0), None]))
            .unwrap();
        let config = EstimatorConfig {
            date_col: "day".to_string(),
            cumulative_col: "cases".to_string(),
            population: Some(50.0),
            infectious_period: 3,
            recovered_col: Some("recovered".to_string()),
            new_case_col: "new".to_string(),
            infected_col: "i".to_string(),
            recovered_out_col: "r".to_string(),
            susceptible_col: "s".to_string(),
        };
        let out = convert_cumulative_to_sir(&table, &config).unwrap();

        assert_eq!(out.column("day").map(Column::kind), Some("number"));
        assert_eq!(column_values(&out, "cases"), vec![4.0, 7.0]);
        assert_eq!(column_values(&out, "new"), vec![4.0, 3.0]);
        assert_eq!(column_values(&out, "i"), vec![4.0, 7.0]);
        // Sorted: day 1 has no recovered value, day 2 has 1.
        assert_eq!(column_values(&out, "r"), vec![0.0, 1.0]);
        assert_eq!(column_values(&out, "s"), vec![46.0, 42.0]);
    }

    #[test]
    fn absent_recovered_column_falls_back_to_lag() {
        let table = case_table(&["2014-05-01", "2014-05-02", "2014-05-03"], &[1.0, 2.0, 4.0]);
        let config = EstimatorConfig {
            infectious_period: 1,
            recovered_col: Some("not_there".to_string()),
            ..EstimatorConfig::default()
        };
        let out = convert_cumulative_to_sir(&table, &config).unwrap();
        assert_eq!(column_values(&out, "R_est"), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn running_twice_reproduces_derived_columns() {
        let table = case_table(
            &["2014-05-04", "2014-05-01", "2014-05-03", "2014-05-02", "2014-05-05"],
            &[30.0, 2.0, 25.0, 9.0, 28.0],
        );
        let config = EstimatorConfig {
            population: Some(1000.0),
            infectious_period: 3,
            ..EstimatorConfig::default()
        };
        let once = estimate(&table, &config).unwrap();
        let twice = estimate(&once.table, &config).unwrap();
        assert_eq!(once.derived, twice.derived);
        assert_eq!(once.table, twice.table);
    }

    #[test]
    fn invalid_inputs() {
        let table = case_table(&["2014-05-01"], &[1.0]);

        let missing = EstimatorConfig {
            cumulative_col: "nope".to_string(),
            ..EstimatorConfig::default()
        };
        let err = convert_cumulative_to_sir(&table, &missing).unwrap_err();
        assert!(err.to_string().contains("'nope' not found"));

        let zero = EstimatorConfig {
            infectious_period: 0,
            ..EstimatorConfig::default()
        };
        assert!(convert_cumulative_to_sir(&table, &zero).is_err());

        let bad_date = case_table(&["someday"], &[1.0]);
        assert!(convert_cumulative_to_sir(&bad_date, &EstimatorConfig::default()).is_err());

        let empty = case_table(&[], &[]);
        assert!(convert_cumulative_to_sir(&empty, &EstimatorConfig::default()).is_err());

        let gap = Table::new()
            .with_column("cumulative_cases", Column::Number(vec![Some(1.0), None]))
            .unwrap();
        assert!(convert_cumulative_to_sir(&gap, &EstimatorConfig::default()).is_err());
    }

    #[test]
    fn initial_conditions_from_row() {
        let d = derive_sir_columns(&[10.0, 15.0, 13.0, 20.0], None, None, 2).unwrap();
        let s = d.initial_conditions(3, 100.0).unwrap();
        assert_eq!(s, SirState { s: 78.0, i: 7.0, r: 15.0 });
        assert!(d.initial_conditions(4, 100.0).is_err());

        let with_pop = derive_sir_columns(&[10.0, 15.0], None, Some(12.0), 2).unwrap();
        assert_eq!(with_pop.initial_conditions(1, 1e6).unwrap().s, 0.0);
    }
}
