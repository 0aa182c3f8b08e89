//! CSV header / row-count inspection.
//!
//! Prints, for each file:
//!
//! ```text
//! The <label> headers are:
//! <header 1>
//! <header 2>
//! ...
//! The totals rows is: <N>
//! ```
//!
//! `N` counts data records only (the header row is excluded).

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AppError;

/// Default demographic metadata file.
pub const METADATA_CSV: &str = "UpdatedMetaData.csv";
/// Default Luminex assay file.
pub const LUMINEX_CSV: &str = "UpdatedLuminex.csv";

/// A file to inspect and the label used in the header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectTarget {
    pub path: PathBuf,
    pub label: String,
}

impl InspectTarget {
    /// Target for an arbitrary path; the two known dataset names keep their
    /// usual labels, anything else is labelled by file stem.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let label = match file_name {
            METADATA_CSV => "demographic".to_string(),
            LUMINEX_CSV => "Luminex".to_string(),
            _ => path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("CSV")
                .to_string(),
        };
        Self { path, label }
    }
}

/// The two datasets inspected when no paths are given.
pub fn default_targets() -> Vec<InspectTarget> {
    vec![
        InspectTarget::for_path(METADATA_CSV),
        InspectTarget::for_path(LUMINEX_CSV),
    ]
}

/// Header tokens and record count of one CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSummary {
    pub headers: Vec<String>,
    pub rows: usize,
}

/// Read a CSV file and summarise it.
pub fn inspect_csv(path: &Path) -> Result<CsvSummary, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let summary = summarize_csv(file)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {}", path.display(), e.message())))?;
    debug!(path = %path.display(), columns = summary.headers.len(), rows = summary.rows, "inspected CSV");
    Ok(summary)
}

/// Summarise CSV content from any reader.
pub fn summarize_csv<R: std::io::Read>(source: R) -> Result<CsvSummary, AppError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(AppError::new(2, "CSV has no header row."));
    }

    let mut rows = 0usize;
    let mut record = csv::ByteRecord::new();
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(true) => rows += 1,
            Ok(false) => break,
            Err(e) => {
                return Err(AppError::new(
                    2,
                    format!("CSV parse error after {rows} rows: {e}"),
                ));
            }
        }
    }

    Ok(CsvSummary { headers, rows })
}

/// Render the inspection report for one file.
pub fn format_inspection(label: &str, summary: &CsvSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("The {label} headers are:\n"));
    for h in &summary.headers {
        out.push_str(h);
        out.push('\n');
    }
    out.push_str(&format!("The totals rows is: {}\n", summary.rows));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_excludes_header_row() {
        let csv = "id,age,sex\n1,40,F\n2,51,M\n3,33,F\n";
        let s = summarize_csv(csv.as_bytes()).unwrap();
        assert_eq!(s.headers, vec!["id", "age", "sex"]);
        assert_eq!(s.rows, 3);
    }

    #[test]
    fn header_only_file_has_zero_rows() {
        let s = summarize_csv("a;b\n".as_bytes()).unwrap();
        assert_eq!(s.headers, vec!["a;b"]);
        assert_eq!(s.rows, 0);
    }

    #[test]
    fn empty_file_is_an_error() {
        assert!(summarize_csv("".as_bytes()).is_err());
    }

    #[test]
    fn report_format() {
        let s = CsvSummary {
            headers: vec!["Sample".to_string(), "IL-6".to_string()],
            rows: 12,
        };
        assert_eq!(
            format_inspection("Luminex", &s),
            "The Luminex headers are:\nSample\nIL-6\nThe totals rows is: 12\n"
        );
    }

    #[test]
    fn labels_for_known_and_other_files() {
        let targets = default_targets();
        assert_eq!(targets[0].label, "demographic");
        assert_eq!(targets[1].label, "Luminex");
        assert_eq!(InspectTarget::for_path("data/cases.csv").label, "cases");
        assert_eq!(
            InspectTarget::for_path("nested/UpdatedLuminex.csv").label,
            "Luminex"
        );
    }

    #[test]
    fn inspects_file_on_disk() {
        let path = std::env::temp_dir().join(format!("sir_inspect_{}.csv", std::process::id()));
        std::fs::write(&path, "x,y\n1,2\n").unwrap();
        let s = inspect_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(s, CsvSummary { headers: vec!["x".into(), "y".into()], rows: 1 });

        assert_eq!(inspect_csv(Path::new("/no/such/file.csv")).unwrap_err().exit_code(), 2);
    }
}
