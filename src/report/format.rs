//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the numerical code stays clean and testable
//! - output changes are localized

use crate::domain::{EstimatorConfig, Table, format_timestamp};
use crate::io::ingest::IngestedTable;
use crate::report::{EstimateSummary, TrajectorySummary};
use crate::sweep::SweepPoint;

/// Format the estimator run summary (dataset + derived headline numbers).
pub fn format_estimate_summary(
    ingest: &IngestedTable,
    summary: &EstimateSummary,
    config: &EstimatorConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== sir - cumulative cases -> SIR estimates ===\n");
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));
    for e in ingest.row_errors.iter().take(5) {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        out.push_str(&format!(
            "Dates: {} .. {}\n",
            format_timestamp(first),
            format_timestamp(last)
        ));
    }
    out.push_str(&format!(
        "Window: infectious_period={} | population={}\n",
        config.infectious_period,
        config
            .population
            .map(|p| format!("{p:.0}"))
            .unwrap_or_else(|| "unknown".to_string())
    ));
    out.push_str(&format!("Total new cases: {:.0}\n", summary.total_new_cases));
    out.push_str(&format!(
        "Peak I_est: {:.1} (row {})\n",
        summary.peak_infected, summary.peak_row
    ));
    out.push_str(&format!("Final R_est: {:.1}\n", summary.final_recovered));
    match summary.final_susceptible {
        Some(s) => out.push_str(&format!("Final S_est: {s:.1}\n")),
        None => out.push_str("Final S_est: undefined (no population)\n"),
    }

    out
}

/// Fixed-width preview of the first and last `n` rows of a table.
pub fn format_table_preview(table: &Table, n: usize) -> String {
    let rows = table.n_rows();
    let names = table.names();

    // Column width: max of header and rendered cells in the preview.
    let shown: Vec<usize> = if rows <= 2 * n {
        (0..rows).collect()
    } else {
        (0..n).chain(rows - n..rows).collect()
    };
    let cells: Vec<Vec<String>> = shown.iter().map(|&r| table.row_cells(r)).collect();
    let widths: Vec<usize> = names
        .iter()
        .enumerate()
        .map(|(c, name)| {
            cells
                .iter()
                .map(|row| row[c].len())
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format_row(names, &widths));
    for (pos, row_cells) in cells.iter().enumerate() {
        if pos == n && rows > 2 * n {
            out.push_str(&format!("... ({} rows omitted)\n", rows - 2 * n));
        }
        out.push_str(&format_row(row_cells, &widths));
    }
    out
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, &w)| format!("{c:>w$}"))
        .collect();
    let mut line = padded.join("  ");
    line.push('\n');
    line
}

/// Format a trajectory summary.
pub fn format_trajectory_summary(summary: &TrajectorySummary) -> String {
    let mut out = String::new();

    out.push_str("=== sir - Euler SIR integration ===\n");
    out.push_str(&format!(
        "beta={:.4} gamma={:.4} R0={} N={:.0}\n",
        summary.params.beta,
        summary.params.gamma,
        summary
            .params
            .r0()
            .map(|v| format!("{v:.3}"))
            .unwrap_or_else(|| "undefined".to_string()),
        summary.population
    ));
    out.push_str(&format!(
        "Grid: {} points | t=[{:.3}, {:.3}]\n",
        summary.steps, summary.t_start, summary.t_end
    ));
    out.push_str(&format!(
        "Peak I: {:.2} at t={:.3}\n",
        summary.peak_infected, summary.peak_time
    ));
    out.push_str(&format!(
        "Final: S={:.2} I={:.2} R={:.2}\n",
        summary.final_s, summary.final_i, summary.final_r
    ));
    out.push_str(&format!("Max |S+I+R-N|: {:.3e}\n", summary.max_drift));
    if summary.went_negative {
        out.push_str("warning: a compartment went negative; the step size is too large for these rates.\n");
    }

    out
}

/// Format sweep results as a table.
pub fn format_sweep_table(points: &[SweepPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>8} {:>8} {:>8} {:>14} {:>10} {:>14}\n",
        "beta", "gamma", "R0", "peak_I", "peak_t", "final_R"
    ));
    for p in points {
        let r0 = p.r0.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>8.4} {:>8.4} {:>8} {:>14.2} {:>10.2} {:>14.2}\n",
            p.params.beta, p.params.gamma, r0, p.peak_infected, p.peak_time, p.final_recovered
        ));
    }
    out
}
