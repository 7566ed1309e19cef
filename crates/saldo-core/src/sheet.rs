//! Workbook decoding for uploaded installment statements

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::{Error, Result};

/// Column positions in the statement export. The sheet carries no usable
/// header names, so cells are addressed positionally.
pub const COL_MARKER: usize = 1;
pub const COL_RECEIPT: usize = 3;
pub const COL_INSTALLMENTS: usize = 5;
pub const COL_AMOUNT: usize = 6;

/// One sheet row as loosely-typed cells. Absent and blank cells are `None`.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Vec<Option<String>>,
}

impl Row {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Cell at a fixed column position, `None` when absent or blank.
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).and_then(|c| c.as_deref())
    }
}

/// Decode the first sheet of a workbook buffer into ordered rows.
///
/// Numeric and date cells are coerced to their string rendering; nothing
/// downstream sees native cell types. The first sheet row is the header
/// row and is skipped.
pub fn extract_rows(buffer: &[u8]) -> Result<Vec<Row>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
    let sheet_names = workbook.sheet_names().to_owned();
    let first_sheet = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| Error::InvalidData("Workbook has no sheets".into()))?;

    let range = workbook.worksheet_range(&first_sheet)?;

    Ok(range
        .rows()
        .skip(1)
        .map(|row| Row::new(row.iter().map(cell_to_string).collect()))
        .collect())
}

fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
