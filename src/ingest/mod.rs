// src/ingest/mod.rs
//! Turns uploaded file bytes into a [`RawTable`]: a header-validated table
//! whose cells are still text.

mod delimited;
mod raw_table;
mod spreadsheet;

pub use delimited::read_delimited;
pub use raw_table::{RawRecord, RawTable};
pub use spreadsheet::read_spreadsheet;

use crate::error::ParseError;
use std::path::Path;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Delimited,
    Spreadsheet,
}

impl FileFormat {
    /// `.csv` and `.txt` uploads are delimited text; everything else is
    /// handed to the spreadsheet reader.
    pub fn from_file_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") | Some("txt") => FileFormat::Delimited,
            _ => FileFormat::Spreadsheet,
        }
    }
}

#[derive(Clone, Debug)]
pub struct IngestOptions {
    pub format: FileFormat,
    pub delimiter: u8,
    /// WHATWG encoding label, e.g. `latin1` or `utf-8`.
    pub encoding: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            format: FileFormat::Delimited,
            delimiter: b';',
            encoding: "latin1".to_string(),
        }
    }
}

/// Parse an uploaded file. Rows whose field count differs from the header are
/// dropped (see [`RawTable::dropped_rows`]); a missing required column fails
/// the whole upload.
#[tracing::instrument(level = "info", skip(bytes, opts), fields(bytes = bytes.len(), format = ?opts.format))]
pub fn load(bytes: &[u8], opts: &IngestOptions) -> Result<RawTable, ParseError> {
    // 1) Bytes -> text cells
    let (headers, rows) = match opts.format {
        FileFormat::Delimited => read_delimited(bytes, opts.delimiter, &opts.encoding)?,
        FileFormat::Spreadsheet => read_spreadsheet(bytes)?,
    };
    // 2) Map headers, drop malformed rows
    let table = RawTable::from_rows(&headers, rows)?;
    info!(
        rows = table.len(),
        dropped = table.dropped_rows,
        "ingested upload"
    );
    Ok(table)
}
