//! CSV ingest into a [`Table`].
//!
//! This is the table-loading collaborator of the estimator: it turns a case
//! CSV (any delimiter-free schema with a header row) into named columns.
//!
//! - **Header hygiene**: names are trimmed and a UTF-8 BOM is stripped;
//!   duplicate names are rejected (exit code 2)
//! - **Row-level validation**: unreadable records are skipped and reported
//! - **Type inference**: a column whose present cells all parse as finite
//!   numbers becomes numeric; everything else stays text (dates are parsed by
//!   the estimator, not here)

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::{Column, Table};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the table plus what happened along the way.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: Table,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a CSV file into a table.
pub fn load_table(path: &Path) -> Result<IngestedTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = read_table(file)?;

    debug!(
        path = %path.display(),
        rows_read = ingested.rows_read,
        rows_used = ingested.rows_used,
        columns = ingested.table.n_cols(),
        "loaded table"
    );
    if !ingested.row_errors.is_empty() {
        warn!(
            path = %path.display(),
            skipped = ingested.row_errors.len(),
            "skipped unreadable CSV rows"
        );
    }

    Ok(ingested)
}

/// Read a table from any CSV source.
pub fn read_table<R: std::io::Read>(source: R) -> Result<IngestedTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(normalize_header_name)
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(AppError::new(2, "CSV has no header row."));
    }
    let mut seen = HashSet::new();
    for name in &headers {
        if !seen.insert(name.as_str()) {
            return Err(AppError::new(2, format!("Duplicate CSV column: `{name}`")));
        }
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header line, CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        if record.len() > headers.len() {
            row_errors.push(RowError {
                line,
                message: format!(
                    "Row has {} fields, header has {}.",
                    record.len(),
                    headers.len()
                ),
            });
            continue;
        }

        // Short rows are padded with missing cells.
        for (col, column_cells) in cells.iter_mut().enumerate() {
            let value = record
                .get(col)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            column_cells.push(value);
        }
    }

    let rows_used = cells.first().map_or(0, Vec::len);

    let mut table = Table::new();
    for (name, column_cells) in headers.into_iter().zip(cells) {
        table.set_column(name, Column::infer(column_cells))?;
    }

    Ok(IngestedTable {
        table,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. Without stripping it, column lookups by name would fail.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_infers_columns() {
        let csv = "\u{feff}date,cumulative_cases,region\n\
                   2014-05-01,10,Riyadh\n\
                   2014-05-02,,Jeddah\n\
                   2014-05-03,15\n";
        let ingested = read_table(csv.as_bytes()).unwrap();
        let t = &ingested.table;

        assert_eq!(t.names(), &["date", "cumulative_cases", "region"]);
        assert_eq!(ingested.rows_read, 3);
        assert_eq!(ingested.rows_used, 3);
        assert_eq!(t.column("date").map(Column::kind), Some("text"));
        assert_eq!(
            t.column("cumulative_cases"),
            Some(&Column::Number(vec![Some(10.0), None, Some(15.0)]))
        );
        assert_eq!(t.column("region").unwrap().cell_text(2), "");
    }

    #[test]
    fn overlong_rows_are_reported_and_skipped() {
        let csv = "a,b\n1,2\n3,4,5\n6,7\n";
        let ingested = read_table(csv.as_bytes()).unwrap();
        assert_eq!(ingested.rows_read, 3);
        assert_eq!(ingested.rows_used, 2);
        assert_eq!(ingested.row_errors.len(), 1);
        assert_eq!(ingested.row_errors[0].line, 3);
        assert_eq!(
            ingested.table.numbers("a").unwrap(),
            vec![Some(1.0), Some(6.0)]
        );
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let err = read_table("a,a\n1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = read_table("".as_bytes()).unwrap_err();
        assert!(err.message().contains("no header"));
    }

    #[test]
    fn missing_file_is_exit_code_2() {
        let err = load_table(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
