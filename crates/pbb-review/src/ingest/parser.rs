use std::io::Read;

use tracing::{debug, warn};

use super::normalizer::normalize_cell;
use super::SheetKind;
use crate::review::domain::{Record, Scalar};

/// How many leading rows are scanned for a plausible header row before the
/// loader gives up and treats the first row as headers.
const HEADER_SCAN_ROWS: usize = 10;

/// Reads one logical sheet: best-effort header detection over the leading
/// rows, then one `Record` per data row. Rows without a single non-empty
/// cell are skipped; cells past the header width get positional `Col_{n}`
/// labels.
pub(crate) fn parse_sheet<R: Read>(kind: SheetKind, reader: R) -> Result<Vec<Record>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        rows.push(row.iter().map(normalize_cell).collect());
    }

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let header_index = detect_header_row(kind, &rows).unwrap_or_else(|| {
        warn!(
            sheet = kind.sheet_name(),
            "no header row matched; treating the first row as headers"
        );
        0
    });
    let headers = rows[header_index].clone();

    let mut records = Vec::new();
    for row in rows.iter().skip(header_index + 1) {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let mut record = Record::new();
        for (column, cell) in row.iter().enumerate() {
            match headers.get(column).filter(|label| !label.is_empty()) {
                Some(label) => record.push(label.clone(), Scalar::from_cell(cell)),
                None if !cell.is_empty() => {
                    record.push(format!("Col_{column}"), Scalar::from_cell(cell));
                }
                None => {}
            }
        }
        records.push(record);
    }

    debug!(
        sheet = kind.sheet_name(),
        header_row = header_index,
        rows = records.len(),
        "parsed sheet"
    );

    Ok(records)
}

/// A header row is the first content-bearing row whose joined lowercase text
/// contains any of the sheet's keyword set.
fn detect_header_row(kind: SheetKind, rows: &[Vec<String>]) -> Option<usize> {
    rows.iter()
        .take(HEADER_SCAN_ROWS)
        .position(|row| {
            if row.iter().all(|cell| cell.is_empty()) {
                return false;
            }
            let joined = row.join(" ").to_lowercase();
            kind.header_keywords()
                .iter()
                .any(|keyword| joined.contains(keyword))
        })
}
