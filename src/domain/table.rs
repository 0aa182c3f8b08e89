//! A small columnar table.
//!
//! The estimator works on "a table with a date column and a cumulative column";
//! this is the minimal structure that supports that:
//!
//! - named columns of equal length
//! - three cell kinds (text, number, timestamp), every cell optional
//! - assignment by name replaces an existing column, otherwise appends
//! - row reordering by an index permutation
//!
//! `None` is a missing cell. The estimator also uses it as the "undefined"
//! marker for the susceptible estimate when no population is given.

use chrono::NaiveDateTime;

use crate::error::{SirError, SirResult};

/// One column of cells.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<Option<String>>),
    Number(Vec<Option<f64>>),
    Date(Vec<Option<NaiveDateTime>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Number(v) => v.len(),
            Column::Date(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Column::Text(_) => "text",
            Column::Number(_) => "number",
            Column::Date(_) => "date",
        }
    }

    /// Build a column from raw text cells, promoting it to `Number` when every
    /// present cell parses as a finite float.
    ///
    /// A column with no present cells stays `Text`.
    pub fn infer(cells: Vec<Option<String>>) -> Column {
        let mut any = false;
        let mut parsed = Vec::with_capacity(cells.len());
        for cell in &cells {
            match cell {
                None => parsed.push(None),
                Some(s) => match parse_number(s) {
                    Some(v) => {
                        any = true;
                        parsed.push(Some(v));
                    }
                    None => return Column::Text(cells),
                },
            }
        }
        if any { Column::Number(parsed) } else { Column::Text(cells) }
    }

    /// Numeric view of the column.
    ///
    /// Text cells are parsed on the fly; the error names the first offending
    /// row (0-based) and value.
    pub fn to_numbers(&self) -> Result<Vec<Option<f64>>, String> {
        match self {
            Column::Number(v) => Ok(v.clone()),
            Column::Text(v) => v
                .iter()
                .enumerate()
                .map(|(row, cell)| match cell {
                    None => Ok(None),
                    Some(s) => parse_number(s)
                        .map(Some)
                        .ok_or_else(|| format!("row {row}: '{s}' is not a number")),
                })
                .collect(),
            Column::Date(_) => Err("date column cannot be used as numbers".to_string()),
        }
    }

    /// Reorder (or subset) cells by row index.
    ///
    /// # Panics
    /// Panics if an index in `order` is out of bounds. Callers build `order`
    /// as a permutation of `0..len()`.
    pub fn take(&self, order: &[usize]) -> Column {
        match self {
            Column::Text(v) => Column::Text(order.iter().map(|&i| v[i].clone()).collect()),
            Column::Number(v) => Column::Number(order.iter().map(|&i| v[i]).collect()),
            Column::Date(v) => Column::Date(order.iter().map(|&i| v[i]).collect()),
        }
    }

    /// Render one cell for CSV output / previews. Missing cells render empty.
    pub fn cell_text(&self, row: usize) -> String {
        match self {
            Column::Text(v) => v.get(row).cloned().flatten().unwrap_or_default(),
            Column::Number(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|x| x.to_string())
                .unwrap_or_default(),
            Column::Date(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(format_timestamp)
                .unwrap_or_default(),
        }
    }
}

/// A table of equally sized, uniquely named columns (in insertion order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(&self.columns[idx])
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Assign a column by name: replaces an existing column of that name,
    /// otherwise appends.
    ///
    /// The column must have as many rows as the table (unless it is the only
    /// column).
    pub fn set_column(&mut self, name: impl Into<String>, column: Column) -> SirResult<()> {
        let name = name.into();
        let position = self.names.iter().position(|n| *n == name);
        let sole_column = self.n_cols() == 0 || (self.n_cols() == 1 && position.is_some());
        if !sole_column && column.len() != self.n_rows() {
            return Err(SirError::invalid_input(format!(
                "Column '{name}' has {} rows, table has {}.",
                column.len(),
                self.n_rows()
            )));
        }

        match position {
            Some(idx) => self.columns[idx] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
        Ok(())
    }

    /// Builder-style variant of [`Table::set_column`].
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> SirResult<Self> {
        self.set_column(name, column)?;
        Ok(self)
    }

    /// Numeric view of a named column.
    pub fn numbers(&self, name: &str) -> SirResult<Vec<Option<f64>>> {
        let column = self
            .column(name)
            .ok_or_else(|| SirError::invalid_input(format!("Column '{name}' not found in table.")))?;
        column
            .to_numbers()
            .map_err(|e| SirError::invalid_input(format!("Column '{name}': {e}")))
    }

    /// New table with rows taken in `order`.
    pub fn take_rows(&self, order: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(order)).collect(),
        }
    }

    /// All cells of one row, rendered as text.
    pub fn row_cells(&self, row: usize) -> Vec<String> {
        self.columns.iter().map(|c| c.cell_text(row)).collect()
    }
}

/// Format a timestamp as `YYYY-MM-DD` when it falls on midnight, otherwise
/// with the time of day.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    if ts.time() == chrono::NaiveTime::MIN {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Parse a date or date-time cell.
///
/// Accepted: ISO date-times (`YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM:SS`)
/// and dates (`YYYY-MM-DD`, `MM/DD/YYYY`, `DD/MM/YYYY`, `YYYY/MM/DD`,
/// `DD-MM-YYYY`). Slash dates are read month-first and fall back to day-first
/// only when the month-first reading is impossible (e.g. `25/03/2014`).
/// Dates map to midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const DATETIME_FMTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    const DATE_FMTS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

    let s = s.trim();
    for fmt in DATETIME_FMTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(chrono::NaiveTime::MIN));
        }
    }
    None
}

fn parse_number(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|s| if s.is_empty() { None } else { Some(s.to_string()) })
            .collect()
    }

    #[test]
    fn infer_promotes_numeric_columns() {
        assert_eq!(
            Column::infer(text(&["1", "", "2.5"])),
            Column::Number(vec![Some(1.0), None, Some(2.5)])
        );
        assert_eq!(Column::infer(text(&["1", "x"])).kind(), "text");
        assert_eq!(Column::infer(text(&["", ""])).kind(), "text");
    }

    #[test]
    fn set_column_replaces_by_name() {
        let mut t = Table::new()
            .with_column("a", Column::Number(vec![Some(1.0), Some(2.0)]))
            .unwrap()
            .with_column("b", Column::Number(vec![Some(3.0), Some(4.0)]))
            .unwrap();
        t.set_column("a", Column::Number(vec![Some(9.0), None])).unwrap();

        assert_eq!(t.names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(t.numbers("a").unwrap(), vec![Some(9.0), None]);
    }

    #[test]
    fn set_column_rejects_length_mismatch() {
        let mut t = Table::new()
            .with_column("a", Column::Number(vec![Some(1.0), Some(2.0)]))
            .unwrap();
        let err = t.set_column("b", Column::Number(vec![Some(1.0)])).unwrap_err();
        assert!(matches!(err, SirError::InvalidInput(_)));
    }

    #[test]
    fn take_rows_reorders_every_column() {
        let t = Table::new()
            .with_column("n", Column::Number(vec![Some(1.0), Some(2.0), Some(3.0)]))
            .unwrap()
            .with_column("s", Column::Text(text(&["x", "y", "z"])))
            .unwrap();
        let r = t.take_rows(&[2, 0, 1]);
        assert_eq!(r.numbers("n").unwrap(), vec![Some(3.0), Some(1.0), Some(2.0)]);
        assert_eq!(r.row_cells(0), vec!["3".to_string(), "z".to_string()]);
    }

    #[test]
    fn numbers_reports_bad_text_cell() {
        let t = Table::new()
            .with_column("c", Column::Text(text(&["1", "oops"])))
            .unwrap();
        let err = t.numbers("c").unwrap_err();
        assert!(err.to_string().contains("oops"));
        assert!(t.numbers("missing").is_err());
    }

    #[test]
    fn parse_timestamp_formats() {
        let may1 = NaiveDate::from_ymd_opt(2014, 5, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2014-05-01"), Some(may1));
        assert_eq!(parse_timestamp(" 05/01/2014 "), Some(may1));
        assert_eq!(parse_timestamp("2014/05/01"), Some(may1));
        assert_eq!(
            parse_timestamp("25/03/2014"),
            NaiveDate::from_ymd_opt(2014, 3, 25).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2014-05-01T12:30:00"),
            NaiveDate::from_ymd_opt(2014, 5, 1).and_then(|d| d.and_hms_opt(12, 30, 0))
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn timestamps_render_as_dates_at_midnight() {
        let d = NaiveDate::from_ymd_opt(2014, 5, 1).unwrap();
        assert_eq!(format_timestamp(d.and_hms_opt(0, 0, 0).unwrap()), "2014-05-01");
        assert_eq!(
            format_timestamp(d.and_hms_opt(6, 30, 0).unwrap()),
            "2014-05-01 06:30:00"
        );
    }
}
