//! Reading uploaded workbooks into text rows.

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use domain::services::{SheetRow, FIRST_DATA_ROW, IMPORT_COLUMNS};
use std::io::Cursor;

#[derive(Debug, thiserror::Error)]
pub enum SpreadsheetError {
    #[error("The file could not be read as a spreadsheet")]
    Unreadable(#[from] calamine::Error),

    #[error("The workbook has no worksheets")]
    NoWorksheet,
}

/// Reads the first worksheet, skipping the header row.
///
/// Each row carries exactly [`IMPORT_COLUMNS`] trimmed cells; cells past the
/// end of the used range are empty. Fully blank rows are dropped.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<SheetRow>, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)??;

    Ok(data_rows(&range))
}

fn data_rows(range: &Range<Data>) -> Vec<SheetRow> {
    let (Some(_), Some((last_row, _))) = (range.start(), range.end()) else {
        return Vec::new();
    };

    let first_row = (FIRST_DATA_ROW - 1) as u32;
    (first_row..=last_row)
        .filter_map(|row| {
            let cells: Vec<String> = (0..IMPORT_COLUMNS as u32)
                .map(|col| range.get_value((row, col)).map(cell_text).unwrap_or_default())
                .collect();

            if cells.iter().all(String::is_empty) {
                return None;
            }
            Some(SheetRow {
                number: row as usize + 1,
                cells,
            })
        })
        .collect()
}

/// Renders a cell as trimmed text. Whole numbers lose their decimal part so
/// tax ids and phone numbers typed as numbers keep their digits.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        other => other.to_string().trim().to_string(),
    }
}
