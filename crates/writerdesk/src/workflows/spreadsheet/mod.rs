//! CSV import and export using the column headers staff see on the order screens.

mod export;
mod parser;
mod roster;

pub use export::{format_count, format_money, Column, OrderSheetWriter, INVOICE_COLUMNS};
pub use roster::write_roster;

use crate::workflows::orders::{ImportRow, OrderKind};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum SpreadsheetError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for SpreadsheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpreadsheetError::Io(err) => write!(f, "failed to access spreadsheet: {}", err),
            SpreadsheetError::Csv(err) => write!(f, "invalid spreadsheet data: {}", err),
        }
    }
}

impl std::error::Error for SpreadsheetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpreadsheetError::Io(err) => Some(err),
            SpreadsheetError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SpreadsheetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SpreadsheetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads order rows from an exported or hand-maintained sheet.
pub struct OrderSheetReader;

impl OrderSheetReader {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        default_kind: OrderKind,
    ) -> Result<Vec<ImportRow>, SpreadsheetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, default_kind)
    }

    /// Rows that cannot be turned into a submission are returned with their reason so the
    /// import can report them; only malformed CSV aborts the read.
    pub fn from_reader<R: Read>(
        reader: R,
        default_kind: OrderKind,
    ) -> Result<Vec<ImportRow>, SpreadsheetError> {
        Ok(parser::parse_rows(reader, default_kind)?)
    }
}
