mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::review::domain::{BudgetDataset, Record};

/// The five logical sheets a budget workbook export carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SheetKind {
    RequestSummary,
    Personnel,
    NonPersonnel,
    RequestQa,
    BudgetSummary,
}

impl SheetKind {
    pub const fn sheet_name(self) -> &'static str {
        match self {
            SheetKind::RequestSummary => "Request Summary",
            SheetKind::Personnel => "Personnel",
            SheetKind::NonPersonnel => "NonPersonnel",
            SheetKind::RequestQa => "Request Q&A",
            SheetKind::BudgetSummary => "Budget Summary",
        }
    }

    /// Keyword set a candidate header row must hit for this sheet.
    pub(crate) fn header_keywords(self) -> &'static [&'static str] {
        match self {
            SheetKind::RequestSummary => &["request", "description", "status"],
            SheetKind::Personnel | SheetKind::NonPersonnel => {
                &["request", "department", "program", "position", "account"]
            }
            SheetKind::RequestQa => &["question", "answer"],
            SheetKind::BudgetSummary => &["item", "budget", "fund"],
        }
    }

    pub const fn ordered() -> [SheetKind; 5] {
        [
            SheetKind::RequestSummary,
            SheetKind::Personnel,
            SheetKind::NonPersonnel,
            SheetKind::RequestQa,
            SheetKind::BudgetSummary,
        ]
    }
}

/// Import failures are the one place the pipeline surfaces real errors;
/// everything past the loader degrades to sentinel values instead.
#[derive(Debug, thiserror::Error)]
pub enum WorkbookImportError {
    #[error("failed to read workbook export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid workbook CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Assembles a `BudgetDataset` from per-sheet CSV exports.
pub struct WorkbookImporter;

impl WorkbookImporter {
    /// Reads `<dir>/<Sheet Name>.csv` for each logical sheet. A missing
    /// sheet file yields an empty table, not an error; downstream
    /// aggregation treats empty tables as zero totals.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<BudgetDataset, WorkbookImportError> {
        let dir = dir.as_ref();
        let mut dataset = BudgetDataset::default();

        for kind in SheetKind::ordered() {
            let path = dir.join(format!("{}.csv", kind.sheet_name()));
            if !path.exists() {
                debug!(sheet = kind.sheet_name(), "sheet file missing; using empty table");
                continue;
            }
            let file = std::fs::File::open(&path)?;
            let records = Self::read_sheet(kind, file)?;
            dataset_table(&mut dataset, kind).extend(records);
        }

        Ok(dataset)
    }

    /// Parses one sheet from any reader.
    pub fn read_sheet<R: Read>(
        kind: SheetKind,
        reader: R,
    ) -> Result<Vec<Record>, WorkbookImportError> {
        parser::parse_sheet(kind, reader).map_err(WorkbookImportError::from)
    }
}

fn dataset_table(dataset: &mut BudgetDataset, kind: SheetKind) -> &mut Vec<Record> {
    match kind {
        SheetKind::RequestSummary => &mut dataset.request_summary,
        SheetKind::Personnel => &mut dataset.personnel,
        SheetKind::NonPersonnel => &mut dataset.non_personnel,
        SheetKind::RequestQa => &mut dataset.request_qa,
        SheetKind::BudgetSummary => &mut dataset.budget_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_sheet_produces_records() {
        let csv = "Request ID,Description,Status\nR1,Roof repairs,Submitted\n";
        let records =
            WorkbookImporter::read_sheet(SheetKind::RequestSummary, Cursor::new(csv))
                .expect("sheet parses");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn from_dir_tolerates_missing_sheets() {
        let dir = std::env::temp_dir().join("pbb-review-empty-workbook");
        std::fs::create_dir_all(&dir).expect("temp dir creates");
        let dataset = WorkbookImporter::from_dir(&dir).expect("import succeeds");
        assert!(dataset.request_summary.is_empty());
        assert!(dataset.personnel.is_empty());
        assert!(dataset.budget_summary.is_empty());
    }

    #[test]
    fn malformed_sheet_data_surfaces_as_csv_error() {
        let result = WorkbookImporter::read_sheet(
            SheetKind::RequestSummary,
            Cursor::new(&b"Request ID,Description\n\xff\xfe,broken\n"[..]),
        );
        assert!(matches!(result, Err(WorkbookImportError::Csv(_))));
    }
}
