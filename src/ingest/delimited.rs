//! CSV input.

use super::{Cell, IngestError, RawTable};
use std::path::Path;

/// Read a CSV file with a header row. Every field is kept as text; numeric
/// interpretation happens when records are built.
pub fn read_csv(path: &Path) -> Result<RawTable, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(RawTable {
        headers,
        rows,
        sheet: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_csv_with_bom_and_short_rows() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "\u{feff}उमेर,लिङ्ग,जाति\n25, पुरुष ,मगर\n40,,\n33\n").unwrap();
        file.flush().unwrap();

        let table = read_csv(file.path()).unwrap();

        assert_eq!(table.headers, vec!["उमेर", "लिङ्ग", "जाति"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][1], Cell::Text("पुरुष".to_string()));
        assert_eq!(table.rows[1][1], Cell::Empty);
        assert_eq!(table.rows[2].len(), 1);
    }
}
