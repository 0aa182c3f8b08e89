//! CSV exports: estimator tables, sweep results, synthetic case series.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts. Missing cells are written as empty fields.

use std::fs::File;
use std::path::Path;

use crate::domain::Table;
use crate::error::AppError;
use crate::sweep::SweepPoint;

/// Write a table (header + one line per row) to a CSV file.
pub fn write_table_csv(path: &Path, table: &Table) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_table(file, table)
}

/// Write a table as CSV to any writer.
pub fn write_table<W: std::io::Write>(sink: W, table: &Table) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);

    writer
        .write_record(table.names())
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;
    for row in 0..table.n_rows() {
        writer
            .write_record(table.row_cells(row))
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write sweep results to a CSV file.
pub fn write_sweep_csv(path: &Path, points: &[SweepPoint]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record([
            "beta",
            "gamma",
            "r0",
            "peak_infected",
            "peak_time",
            "final_susceptible",
            "final_recovered",
        ])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in points {
        writer
            .write_record([
                p.params.beta.to_string(),
                p.params.gamma.to_string(),
                p.r0.map(|v| format!("{v:.6}")).unwrap_or_default(),
                format!("{:.6}", p.peak_infected),
                format!("{:.6}", p.peak_time),
                format!("{:.6}", p.final_susceptible),
                format!("{:.6}", p.final_recovered),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
