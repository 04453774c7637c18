use thiserror::Error;

/// Reasons an uploaded file could not be turned into a table.
///
/// Cell-level problems (a bad number, an unreadable date) never end up here;
/// the normalizer degrades those to zero or a missing date instead.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unknown text encoding `{0}`")]
    UnknownEncoding(String),

    #[error("file is not valid {encoding} text")]
    Decode { encoding: &'static str },

    #[error("delimited text could not be parsed: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet could not be read: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("spreadsheet contains no worksheets")]
    EmptySheet,

    #[error("file has no header row")]
    MissingHeader,

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}
