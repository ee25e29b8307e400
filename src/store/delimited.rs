//! CSV and TSV files. The first record is the header row; ragged records are
//! padded by [`Table::new`].

use std::path::Path;

use super::{Cell, StoreError, Table};

pub fn read(path: &Path, delimiter: u8) -> Result<Table, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| StoreError::read(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| StoreError::read(path, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(Cell::from_field).collect::<Vec<_>>())
                .map_err(|e| StoreError::read(path, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Table::new(headers, rows))
}

pub fn write(table: &Table, path: &Path, delimiter: u8) -> Result<(), StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| StoreError::write(path, e))?;

    writer
        .write_record(table.headers())
        .map_err(|e| StoreError::write(path, e))?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(Cell::to_text))
            .map_err(|e| StoreError::write(path, e))?;
    }
    writer.flush().map_err(|e| StoreError::write(path, e))?;
    Ok(())
}
