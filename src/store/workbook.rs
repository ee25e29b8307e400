//! Excel and OpenDocument workbooks.
//!
//! Reading goes through calamine and takes the first worksheet; writing always
//! produces a single-sheet xlsx file.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;

use super::{Cell, StoreError, Table};

pub fn read(path: &Path) -> Result<Table, StoreError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| StoreError::read(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| StoreError::read(path, "workbook has no worksheets"))?
        .map_err(|e| StoreError::read(path, e))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(first) => first
            .iter()
            .map(|d| to_cell(d).to_text().trim().to_string())
            .collect(),
        None => Vec::new(),
    };
    let rows = rows
        .map(|row| row.iter().map(to_cell).collect())
        .collect();

    Ok(Table::new(headers, rows))
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

pub fn write(table: &Table, path: &Path) -> Result<(), StoreError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in table.headers().iter().enumerate() {
        let col = column_index(path, col)?;
        sheet
            .write_string(0, col, header)
            .map_err(|e| StoreError::write(path, e))?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = u32::try_from(row_idx + 1)
            .map_err(|_| StoreError::write(path, "too many rows for xlsx"))?;
        for (col, cell) in row.iter().enumerate() {
            let col = column_index(path, col)?;
            let written = match cell {
                Cell::Empty => continue,
                Cell::Text(s) if s.is_empty() => continue,
                Cell::Text(s) => sheet.write_string(row_num, col, s),
                Cell::Number(n) => sheet.write_number(row_num, col, *n),
                Cell::Bool(b) => sheet.write_boolean(row_num, col, *b),
            };
            written.map_err(|e| StoreError::write(path, e))?;
        }
    }

    workbook.save(path).map_err(|e| StoreError::write(path, e))?;
    Ok(())
}

fn column_index(path: &Path, col: usize) -> Result<u16, StoreError> {
    u16::try_from(col).map_err(|_| StoreError::write(path, "too many columns for xlsx"))
}
