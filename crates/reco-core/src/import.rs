//! Ingestion of Airtable and ERP exports
//!
//! CSV exports arrive in whatever shape the exporting tool chose: UTF-8 with
//! or without BOM, Windows-1252 from older Excel versions, semicolon- or
//! tab-separated. Everything is turned into [`RawRow`]s keyed by trimmed
//! header names. Workbooks (`.xlsx`, `.xls`, `.ods`) go through calamine when
//! the `xlsx` feature is enabled.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use tracing::debug;

use crate::columns::has_any_column;
use crate::error::{Error, Result};
use crate::models::RawRow;

/// Convert one CSV record into a row, filling short records with "".
fn record_to_row(headers: &StringRecord, record: &StringRecord) -> RawRow {
    let mut row = RawRow::new();
    for (i, header) in headers.iter().enumerate() {
        let cell = record.get(i).unwrap_or("");
        row.insert(header.to_string(), Value::String(cell.to_string()));
    }
    row
}

/// Parse a CSV export from raw bytes.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let decoded = decode(bytes);
    let content = decoded.strip_prefix('\u{feff}').unwrap_or(&decoded);
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let delimiter = sniff_delimiter(content);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::Import("CSV file has no header row".to_string()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(record_to_row(&headers, &record));
    }

    debug!(
        "Parsed {} CSV rows with {} columns (delimiter {:?})",
        rows.len(),
        headers.len(),
        delimiter as char
    );
    Ok(rows)
}

/// Read an export from disk, dispatching on the file extension.
pub fn read_file(path: &Path) -> Result<Vec<RawRow>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(path),
        _ => {
            let bytes = fs::read(path)?;
            read_rows(&bytes)
        }
    }
}

/// Fail when a non-empty export carries none of the expected columns.
///
/// The engine itself would silently treat every row as project-less; this
/// check runs at the ingestion boundary instead.
pub fn check_required_columns(dataset: &str, rows: &[RawRow], aliases: &[String]) -> Result<()> {
    if rows.is_empty() || rows.iter().any(|row| has_any_column(row, aliases)) {
        return Ok(());
    }
    Err(Error::MissingColumns {
        dataset: dataset.to_string(),
        expected: aliases.to_vec(),
    })
}

/// Decode as UTF-8, falling back to Windows-1252 (Excel's legacy default).
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            debug!("Input is not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Pick the delimiter that splits the first lines most consistently.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(10)
        .collect();

    let mut best = b',';
    let mut best_score = 0usize;

    for &delimiter in candidates {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| {
                ReaderBuilder::new()
                    .delimiter(delimiter)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let Some(&target) = counts.first() else {
            continue;
        };
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count();
        let score = consistent * target;
        if score > best_score {
            best_score = score;
            best = delimiter;
        }
    }

    best
}

#[cfg(feature = "xlsx")]
fn read_workbook(path: &Path) -> Result<Vec<RawRow>> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::Xlsx(format!("Failed to open {}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Xlsx(format!("{} contains no worksheets", path.display())))?
        .map_err(|e| Error::Xlsx(e.to_string()))?;

    let mut iter = range.rows();
    let Some(header_row) = iter.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for cells in iter {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = match cells.get(i) {
                None | Some(Data::Empty) => Value::Null,
                Some(Data::Int(n)) => Value::from(*n),
                Some(Data::Float(f)) => serde_json::Number::from_f64(*f)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                Some(Data::Bool(b)) => Value::Bool(*b),
                Some(Data::String(s)) => Value::String(s.clone()),
                Some(other) => Value::String(other.to_string()),
            };
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }

    debug!("Parsed {} workbook rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(not(feature = "xlsx"))]
fn read_workbook(path: &Path) -> Result<Vec<RawRow>> {
    Err(Error::Xlsx(format!(
        "{}: workbook support requires the `xlsx` feature",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3\n"), b';');
        assert_eq!(sniff_delimiter("a\tb\n1\t2\n"), b'\t');
        assert_eq!(sniff_delimiter("a,b\n1,2\n"), b',');
        assert_eq!(sniff_delimiter("single\nvalue\n"), b',');
    }

    #[test]
    fn test_read_rows_semicolon_german() {
        let csv = "Projektnummer;Agenturleistung (netto)\nP-1;\"1.234,56\"\nP-2;10,00\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Projektnummer"], "P-1");
        assert_eq!(rows[0]["Agenturleistung (netto)"], "1.234,56");
    }

    #[test]
    fn test_read_rows_strips_bom_and_trims_headers() {
        let csv = "\u{feff} Projektnummer ,Titel\nP-1,Relaunch\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert!(rows[0].contains_key("Projektnummer"));
        assert_eq!(rows[0]["Titel"], "Relaunch");
    }

    #[test]
    fn test_read_rows_windows_1252() {
        // "Geschäft" in Windows-1252
        let mut bytes = b"Titel,Betrag\nGesch".to_vec();
        bytes.push(0xE4);
        bytes.extend_from_slice(b"ft,5\n");
        let rows = read_rows(&bytes).unwrap();
        assert_eq!(rows[0]["Titel"], "Geschäft");
    }

    #[test]
    fn test_read_rows_short_records_and_blank_lines() {
        let csv = "A,B,C\n1,2\n\n,,\n4,5,6\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["C"], "");
        assert_eq!(rows[1]["C"], "6");
    }

    #[test]
    fn test_read_rows_preserves_column_order() {
        let csv = "Z,A,M\n1,2,3\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        let keys: Vec<&str> = rows[0].keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_check_required_columns() {
        let rows = read_rows(b"Projektnummer,Titel\n,x\n").unwrap();
        let aliases = vec!["Projektnummer".to_string()];
        assert!(check_required_columns("Airtable", &rows, &aliases).is_ok());
        assert!(check_required_columns("Airtable", &[], &aliases).is_ok());

        let other = read_rows(b"Nummer,Titel\n1,x\n").unwrap();
        let err = check_required_columns("Airtable", &other, &aliases).unwrap_err();
        assert!(matches!(err, Error::MissingColumns { .. }));
        assert!(err.to_string().contains("Projektnummer"));
    }

    #[test]
    fn test_read_rows_empty_input() {
        assert!(read_rows(b"").unwrap().is_empty());
        assert!(read_rows("\u{feff}\n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_read_file_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("erp.csv");
        fs::write(&path, "Projekt Projektnummer;Summe Netto\nP-1;100\n").unwrap();
        let rows = read_file(&path).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
