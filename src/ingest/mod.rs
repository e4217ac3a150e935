//! Spreadsheet ingestion.
//!
//! Reads a workbook or CSV file into a raw table of cells, then resolves the
//! age, gender and caste columns into [`Record`]s.

mod delimited;
mod workbook;

use crate::locale;
use crate::models::Record;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while reading a spreadsheet.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported file type '{extension}' (expected xlsx, xlsm, xls, xlsb, ods or csv)")]
    UnsupportedFormat { extension: String },

    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("workbook {0} has no worksheets")]
    NoWorksheets(PathBuf),

    #[error("worksheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("failed to read CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{column}' is missing (found: {})", found.join(", "))]
    MissingColumn { column: String, found: Vec<String> },
}

/// A single spreadsheet cell, reduced to what the dashboard needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Numeric value, parsing text written with ASCII or Devanagari digits.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => locale::parse_localized_number(s),
        }
    }

    /// Trimmed text value. Whole numbers print without a fractional part.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Header row plus data rows, as read from the file.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Worksheet the table came from, for workbook inputs.
    pub sheet: Option<String>,
}

impl RawTable {
    /// Index of a column by trimmed header name.
    fn column_index(&self, name: &str) -> Result<usize, IngestError> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim() == wanted)
            .ok_or_else(|| IngestError::MissingColumn {
                column: wanted.to_string(),
                found: self.headers.clone(),
            })
    }
}

/// Names of the columns holding each field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub age: String,
    pub gender: String,
    pub caste: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            age: locale::AGE_COLUMN.to_string(),
            gender: locale::GENDER_COLUMN.to_string(),
            caste: locale::CASTE_COLUMN.to_string(),
        }
    }
}

impl From<&crate::config::ColumnsConfig> for ColumnNames {
    fn from(config: &crate::config::ColumnsConfig) -> Self {
        Self {
            age: config.age.clone(),
            gender: config.gender.clone(),
            caste: config.caste.clone(),
        }
    }
}

/// Options for reading a spreadsheet.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub columns: ColumnNames,
    /// Worksheet name or 0-based index. First sheet when unset.
    pub sheet: Option<String>,
}

/// Supported input formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Workbook,
    Csv,
}

fn detect_format(path: &Path) -> Result<InputFormat, IngestError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(InputFormat::Workbook),
        "csv" => Ok(InputFormat::Csv),
        _ => Err(IngestError::UnsupportedFormat { extension }),
    }
}

/// Read the raw table from a spreadsheet file.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<RawTable, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    match detect_format(path)? {
        InputFormat::Workbook => workbook::read_workbook(path, sheet),
        InputFormat::Csv => {
            if sheet.is_some() {
                warn!("Ignoring sheet selection for CSV input {}", path.display());
            }
            delimited::read_csv(path)
        }
    }
}

/// Convert a raw table into records using the configured column names.
pub fn records_from_table(
    table: &RawTable,
    columns: &ColumnNames,
) -> Result<Vec<Record>, IngestError> {
    let age_idx = table.column_index(&columns.age)?;
    let gender_idx = table.column_index(&columns.gender)?;
    let caste_idx = table.column_index(&columns.caste)?;

    let mut unknown_ages = 0usize;
    let records: Vec<Record> = table
        .rows
        .iter()
        .map(|row| {
            let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY_CELL);

            let age = cell(age_idx).as_number().unwrap_or_else(|| {
                unknown_ages += 1;
                f64::NAN
            });
            let gender = cell(gender_idx).as_text();
            let caste = cell(caste_idx).as_text().unwrap_or_default();

            Record::new(age, gender.as_deref(), &caste)
        })
        .collect();

    if unknown_ages > 0 {
        warn!(
            "{} rows have no numeric '{}' value and fall in the oldest age group",
            unknown_ages, columns.age
        );
    }
    debug!("Converted {} rows into records", records.len());

    Ok(records)
}

/// Read a spreadsheet and return its records and the sheet they came from.
pub fn load_records(
    path: &Path,
    options: &IngestOptions,
) -> Result<(Vec<Record>, Option<String>), IngestError> {
    info!("Reading spreadsheet: {}", path.display());
    let table = read_table(path, options.sheet.as_deref())?;
    debug!(
        "Read {} rows with headers {:?}",
        table.rows.len(),
        table.headers
    );

    let records = records_from_table(&table, &options.columns)?;
    Ok((records, table.sheet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sample_table() -> RawTable {
        RawTable {
            headers: vec![
                "क्र.सं.".to_string(),
                "उमेर".to_string(),
                " लिङ्ग ".to_string(),
                "जाति".to_string(),
            ],
            rows: vec![
                vec![Cell::Number(1.0), Cell::Number(19.0), text("पुरुष"), text("गुरुङ्ग")],
                vec![Cell::Number(2.0), text("४५"), text("महिला"), text(" मगर ")],
                vec![Cell::Number(3.0), text("n/a"), Cell::Empty, Cell::Empty],
                vec![Cell::Number(4.0), Cell::Number(33.0)],
            ],
            sheet: None,
        }
    }

    #[test]
    fn test_cell_conversions() {
        assert_eq!(Cell::Number(42.0).as_text().as_deref(), Some("42"));
        assert_eq!(Cell::Number(4.5).as_text().as_deref(), Some("4.5"));
        assert_eq!(text("  ").as_text(), None);
        assert_eq!(Cell::Empty.as_number(), None);
        assert_eq!(text("३०").as_number(), Some(30.0));
    }

    #[test]
    fn test_records_from_table() {
        let records = records_from_table(&sample_table(), &ColumnNames::default()).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].age, 19.0);
        assert_eq!(records[0].caste, "गुरुङ");
        assert_eq!(records[1].age, 45.0);
        assert_eq!(records[1].caste, "मगर");
        assert!(records[2].age.is_nan());
        assert_eq!(records[2].gender, None);
        assert_eq!(records[2].caste, locale::UNKNOWN_CASTE);
        // Short rows read as empty cells.
        assert_eq!(records[3].gender, None);
    }

    #[test]
    fn test_missing_column() {
        let columns = ColumnNames {
            caste: "Caste".to_string(),
            ..ColumnNames::default()
        };

        let err = records_from_table(&sample_table(), &columns).unwrap_err();

        match err {
            IngestError::MissingColumn { column, found } => {
                assert_eq!(column, "Caste");
                assert_eq!(found.len(), 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("a.XLSX")).unwrap(), InputFormat::Workbook);
        assert_eq!(detect_format(Path::new("a.csv")).unwrap(), InputFormat::Csv);
        assert!(matches!(
            detect_format(Path::new("a.txt")),
            Err(IngestError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_read_table_not_found() {
        let err = read_table(Path::new("/definitely/missing.xlsx"), None).unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }

    #[test]
    fn test_load_records_from_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "उमेर,लिङ्ग,जाति").unwrap();
        writeln!(file, "19,पुरुष,गुरूङ").unwrap();
        writeln!(file, "30,महिला,मगर").unwrap();
        writeln!(file, "61,महिला,गुरुङ").unwrap();
        file.flush().unwrap();

        let (records, sheet) = load_records(file.path(), &IngestOptions::default()).unwrap();

        assert_eq!(sheet, None);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].caste, "गुरुङ");
        assert_eq!(records[2].age, 61.0);
    }

    #[test]
    fn test_load_records_from_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ward.xlsx");
        workbook::tests::write_ward_workbook(&path);
        let options = IngestOptions {
            sheet: Some("वडा १".to_string()),
            ..IngestOptions::default()
        };

        let (records, sheet) = load_records(&path, &options).unwrap();

        assert_eq!(sheet.as_deref(), Some("वडा १"));
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].age, 19.0);
        assert_eq!(records[0].caste, "गुरुङ");
        assert_eq!(records[1].gender.as_deref(), Some("महिला"));
        assert_eq!(records[2].age, 58.0);
        assert_eq!(records[2].gender, None);
        assert_eq!(records[2].caste, "गुरुङ");
        assert_eq!(records[3].caste, locale::UNKNOWN_CASTE);

        let err = load_records(&path, &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { .. }));
    }

    #[test]
    fn test_load_records_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/ward_sample.csv");
        let (records, _) = load_records(&path, &IngestOptions::default()).unwrap();

        assert_eq!(records.len(), 20);
        assert!(records.iter().all(|r| r.caste != "गुरुङ्ग" && r.caste != "गुरूङ"));
    }
}
