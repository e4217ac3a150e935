//! Excel and OpenDocument workbook input.

use super::{Cell, IngestError, RawTable};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::debug;

fn workbook_error(path: &Path, err: impl std::fmt::Display) -> IngestError {
    IngestError::Workbook {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

/// Read one worksheet. `sheet` selects by name, or by 0-based index when it
/// parses as a number and no sheet carries that name. The first sheet is used
/// when no selection is given.
pub fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawTable, IngestError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(path, e))?;
    let sheet_names = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(IngestError::NoWorksheets(path.to_path_buf()));
    }

    let name = match sheet {
        None => sheet_names[0].clone(),
        Some(sel) if sheet_names.iter().any(|n| n == sel) => sel.to_string(),
        Some(sel) => sel
            .parse::<usize>()
            .ok()
            .and_then(|idx| sheet_names.get(idx).cloned())
            .ok_or_else(|| IngestError::SheetNotFound {
                sheet: sel.to_string(),
                available: sheet_names.clone(),
            })?,
    };
    debug!("Using worksheet '{}' of {:?}", name, sheet_names);

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| workbook_error(path, e))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| to_cell(c).as_text().unwrap_or_default())
            .collect(),
        None => Vec::new(),
    };
    let rows = rows
        .map(|row| row.iter().map(to_cell).collect())
        .collect();

    Ok(RawTable {
        headers,
        rows,
        sheet: Some(name),
    })
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    /// Write a workbook with a notes sheet first and the ward register second.
    pub(in crate::ingest) fn write_ward_workbook(path: &Path) {
        let mut workbook = Workbook::new();

        let notes = workbook.add_worksheet();
        notes.set_name("सारांश").unwrap();
        notes.write_string(0, 0, "टिप्पणी").unwrap();

        let ward = workbook.add_worksheet();
        ward.set_name("वडा १").unwrap();
        for (col, header) in ["उमेर", "लिङ्ग", "जाति"].iter().enumerate() {
            ward.write_string(0, col as u16, *header).unwrap();
        }
        ward.write_number(1, 0, 19).unwrap();
        ward.write_string(1, 1, "पुरुष").unwrap();
        ward.write_string(1, 2, "गुरुङ्ग").unwrap();
        ward.write_number(2, 0, 45).unwrap();
        ward.write_string(2, 1, "महिला").unwrap();
        ward.write_string(2, 2, "मगर").unwrap();
        ward.write_string(3, 0, "५८").unwrap();
        ward.write_string(3, 2, "गुरूङ").unwrap();
        ward.write_number(4, 0, 30).unwrap();
        ward.write_string(4, 1, "महिला").unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_to_cell() {
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
        assert_eq!(to_cell(&Data::Int(30)), Cell::Number(30.0));
        assert_eq!(to_cell(&Data::Float(42.0)), Cell::Number(42.0));
        assert_eq!(
            to_cell(&Data::String("महिला".to_string())),
            Cell::Text("महिला".to_string())
        );
        assert_eq!(to_cell(&Data::Bool(true)), Cell::Text("true".to_string()));
    }

    #[test]
    fn test_read_workbook_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ward.xlsx");
        write_ward_workbook(&path);

        let table = read_workbook(&path, Some("वडा १")).unwrap();

        assert_eq!(table.sheet.as_deref(), Some("वडा १"));
        assert_eq!(table.headers, vec!["उमेर", "लिङ्ग", "जाति"]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0][0], Cell::Number(19.0));
        assert_eq!(table.rows[0][2], Cell::Text("गुरुङ्ग".to_string()));
        assert_eq!(table.rows[2][0], Cell::Text("५८".to_string()));
        assert_eq!(table.rows[2][1], Cell::Empty);
        assert_eq!(table.rows[3][2], Cell::Empty);
    }

    #[test]
    fn test_read_workbook_by_index_and_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ward.xlsx");
        write_ward_workbook(&path);

        let by_index = read_workbook(&path, Some("1")).unwrap();
        assert_eq!(by_index.sheet.as_deref(), Some("वडा १"));
        assert_eq!(by_index.rows.len(), 4);

        let first = read_workbook(&path, None).unwrap();
        assert_eq!(first.sheet.as_deref(), Some("सारांश"));
        assert_eq!(first.headers, vec!["टिप्पणी"]);
        assert!(first.rows.is_empty());
    }

    #[test]
    fn test_read_workbook_sheet_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ward.xlsx");
        write_ward_workbook(&path);

        for selection in ["वडा २", "2"] {
            match read_workbook(&path, Some(selection)).unwrap_err() {
                IngestError::SheetNotFound { sheet, available } => {
                    assert_eq!(sheet, selection);
                    assert_eq!(available, vec!["सारांश", "वडा १"]);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_read_workbook_rejects_non_workbook() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        std::fs::write(file.path(), b"not a zip archive").unwrap();

        let err = read_workbook(file.path(), None).unwrap_err();
        assert!(matches!(err, IngestError::Workbook { .. }));
    }
}
