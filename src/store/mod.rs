//! In-memory comment table with spreadsheet import and export.
//!
//! A [`Table`] is an ordered list of headers plus rectangular rows of [`Cell`]s.
//! It lives only as long as the process; [`Table::save`] is the only way to
//! persist the derived columns.

mod delimited;
mod workbook;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::*;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Spreadsheet import/export errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("Unsupported spreadsheet format: {0}")]
    UnsupportedFormat(String),

    #[error("Column '{name}' needs {expected} values, got {actual}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

impl StoreError {
    fn read(path: &Path, source: impl Into<BoxError>) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    fn write(path: &Path, source: impl Into<BoxError>) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

/// A single spreadsheet value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Textual form of the value. Integral numbers print without a fraction.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }

    /// Numeric value of the cell, parsing text if needed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Cell for a raw field of a delimited file.
    ///
    /// Fields stay text so values like `007` survive a save and reload;
    /// numbers are read back through [`Cell::as_number`].
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Self::Empty
        } else {
            Self::Text(field.to_string())
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Supported file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Tsv,
    /// Any workbook calamine can open (xlsx, xlsm, xls, ods).
    Workbook,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Workbook),
            "" => Err(StoreError::UnsupportedFormat(format!(
                "{} has no extension",
                path.display()
            ))),
            other => Err(StoreError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

/// Extension appended by [`Table::save`] when the target has none.
pub const DEFAULT_EXTENSION: &str = "xlsx";

/// The loaded comment table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, padding short rows with [`Cell::Empty`].
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Single-column table, mostly for tests and the one-shot CLI.
    pub fn from_column(name: &str, values: Vec<Cell>) -> Self {
        Self::new(
            vec![name.to_string()],
            values.into_iter().map(|v| vec![v]).collect(),
        )
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let table = match Format::from_path(path)? {
            Format::Csv => delimited::read(path, b',')?,
            Format::Tsv => delimited::read(path, b'\t')?,
            Format::Workbook => workbook::read(path)?,
        };
        tracing::info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.headers.len(),
            "Loaded table"
        );
        Ok(table)
    }

    /// Write the table to `path` and return the path actually written.
    ///
    /// A path without extension gets [`DEFAULT_EXTENSION`] appended. Only
    /// csv, tsv and xlsx can be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        let mut path = path.as_ref().to_path_buf();
        if path.extension().is_none() {
            path.set_extension(DEFAULT_EXTENSION);
        }
        match Format::from_path(&path)? {
            Format::Csv => delimited::write(self, &path, b',')?,
            Format::Tsv => delimited::write(self, &path, b'\t')?,
            Format::Workbook => {
                let is_xlsx = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
                if !is_xlsx {
                    return Err(StoreError::UnsupportedFormat(format!(
                        "cannot write {}, use .xlsx",
                        path.display()
                    )));
                }
                workbook::write(self, &path)?
            }
        }
        tracing::info!(path = %path.display(), rows = self.row_count(), "Saved table");
        Ok(path)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Replace the column `name`, or append it if absent.
    ///
    /// `values` must hold exactly one value per row.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) -> Result<(), StoreError> {
        if values.len() != self.rows.len() {
            return Err(StoreError::LengthMismatch {
                name: name.to_string(),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// True once every derived annotation column is present.
    pub fn is_annotated(&self) -> bool {
        DERIVED_COLUMNS.iter().all(|c| self.has_column(c))
    }

    /// Iterate the table as [`CommentRow`]s keyed on `comment_column`.
    ///
    /// Returns `None` when the column is missing. Each call starts again from
    /// the first row.
    pub fn rows(&self, comment_column: &str) -> Option<CommentRows<'_>> {
        let comment = self.column_index(comment_column)?;
        let derived = match DERIVED_COLUMNS.map(|c| self.column_index(c)) {
            [Some(s), Some(a), Some(t)] => Some([s, a, t]),
            _ => None,
        };
        Some(CommentRows {
            rows: self.rows.iter(),
            comment,
            derived,
        })
    }
}

/// Lazy iterator over the rows of a [`Table`].
pub struct CommentRows<'a> {
    rows: std::slice::Iter<'a, Vec<Cell>>,
    comment: usize,
    derived: Option<[usize; 3]>,
}

impl Iterator for CommentRows<'_> {
    type Item = CommentRow;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        let annotation = self.derived.map(|[s, a, t]| Annotation {
            sentiment: SentimentLabel::from_str(&row[s].to_text())
                .unwrap_or(SentimentLabel::Error),
            affinity_percent: row[a].as_number().unwrap_or(0.0),
            tags: row[t].to_text(),
        });
        Some(CommentRow {
            comment: row[self.comment].to_text(),
            annotation,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for CommentRows<'_> {}
