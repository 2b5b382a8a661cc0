//! Spreadsheet export over declared column descriptors.
//!
//! Each exportable entity declares an ordered list of `Column`s (header label
//! plus accessor). The accessors are plain fn pointers, so a descriptor can
//! only reference fields that exist on the row type.

use chrono::{DateTime, FixedOffset};
use rust_xlsxwriter::Workbook;

use crate::errors::ServiceError;

/// Fixed textual timestamp format used in exported sheets.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format used in download filenames.
const FILENAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// A single cell produced by a column accessor.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Timestamp(DateTime<FixedOffset>),
    /// Rendered as a genuinely empty cell, never a placeholder string.
    Empty,
}

impl CellValue {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s),
            Self::Timestamp(ts) => Some(ts.format(TIMESTAMP_FORMAT).to_string()),
            Self::Empty => None,
        }
    }
}

/// One spreadsheet column: header label plus accessor into the row type.
pub struct Column<T> {
    pub header: &'static str,
    pub value: fn(&T) -> CellValue,
}

/// Render `rows` into a single-sheet workbook.
///
/// Row 0 holds the headers in descriptor order; row `i` holds `rows[i-1]`
/// with cell `j` produced by `columns[j]`. An empty input yields a
/// header-only sheet.
pub fn to_workbook<T>(rows: &[T], columns: &[Column<T>]) -> Result<Vec<u8>, ServiceError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, spec) in columns.iter().enumerate() {
        sheet
            .write_string(0, col as u16, spec.header)
            .map_err(|e| ServiceError::Export(e.to_string()))?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, spec) in columns.iter().enumerate() {
            if let Some(text) = (spec.value)(row).into_text() {
                sheet
                    .write_string(row_num, col as u16, text)
                    .map_err(|e| ServiceError::Export(e.to_string()))?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServiceError::Export(e.to_string()))
}

/// Download filename for an export: `<resource>_<timestamp>.xlsx`.
pub fn export_filename(resource: &str, at: DateTime<chrono::Utc>) -> String {
    format!("{}_{}.xlsx", resource, at.format(FILENAME_TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    struct Row {
        name: String,
        note: Option<String>,
        at: DateTime<FixedOffset>,
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column { header: "Name", value: |r| CellValue::Text(r.name.clone()) },
            Column {
                header: "Note",
                value: |r| r.note.clone().map_or(CellValue::Empty, CellValue::Text),
            },
            Column { header: "Created At", value: |r| CellValue::Timestamp(r.at) },
        ]
    }

    fn sample(name: &str, note: Option<&str>) -> Row {
        Row {
            name: name.into(),
            note: note.map(Into::into),
            at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap().fixed_offset(),
        }
    }

    #[test]
    fn timestamp_renders_in_fixed_format() {
        let cell = CellValue::Timestamp(sample("x", None).at);
        assert_eq!(cell.into_text().as_deref(), Some("2024-06-01 10:30:00"));
    }

    #[test]
    fn absent_values_render_empty() {
        assert_eq!(CellValue::Empty.into_text(), None);
    }

    #[test]
    fn workbook_bytes_are_a_zip_container() {
        let rows = vec![sample("RPG", Some("ok")), sample("Strategy", None)];
        let bytes = to_workbook(&rows, &columns()).unwrap();
        // xlsx is a zip archive; PK magic is enough to prove we produced one
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn empty_input_still_yields_a_workbook() {
        let bytes = to_workbook::<Row>(&[], &columns()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn filename_carries_resource_and_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap();
        assert_eq!(export_filename("genres", at), "genres_2024-06-01_10:30:00.xlsx");
    }
}
