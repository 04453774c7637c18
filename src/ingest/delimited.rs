// src/ingest/delimited.rs
use crate::error::ParseError;
use csv::ReaderBuilder;
use encoding_rs::Encoding;
use tracing::debug;

/// Decode `bytes` with the encoding named by `encoding_label` and split them
/// on `delimiter`. Returns the header and every data row as text.
///
/// Labels follow the WHATWG encoding standard, so `latin1` and `iso-8859-1`
/// both resolve to windows-1252. A byte-order mark overrides the label.
pub fn read_delimited(
    bytes: &[u8],
    delimiter: u8,
    encoding_label: &str,
) -> Result<(Vec<String>, Vec<Vec<String>>), ParseError> {
    // 1) Resolve the label and decode to UTF-8
    let encoding = Encoding::for_label(encoding_label.trim().as_bytes())
        .ok_or_else(|| ParseError::UnknownEncoding(encoding_label.to_string()))?;

    let (text, used, malformed) = encoding.decode(bytes);
    if malformed {
        return Err(ParseError::Decode {
            encoding: used.name(),
        });
    }
    debug!(encoding = used.name(), bytes = bytes.len(), "decoded upload");

    // 2) Split into header + rows
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true) // row width is checked against the header later
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok((headers, rows))
}
