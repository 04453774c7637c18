use crate::error::ParseError;
use crate::model::COLUMNS;
use tracing::warn;

/// One row of the uploaded file, reduced to the required columns and still
/// holding the cell text exactly as it was read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub region: String,
    pub state: String,
    pub city: String,
    pub retailer: String,
    pub product: String,
    pub invoice_date: String,
    pub units_sold: String,
    pub total_sales: String,
    pub operating_profit: String,
    pub price_per_unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub records: Vec<RawRecord>,
    /// Rows skipped because their field count did not match the header.
    pub dropped_rows: usize,
}

impl RawTable {
    /// Validate `headers` against the required columns and project every row
    /// onto them. Rows with the wrong number of fields are dropped and counted.
    pub fn from_rows(headers: &[String], rows: Vec<Vec<String>>) -> Result<Self, ParseError> {
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ParseError::MissingHeader);
        }
        let index = HeaderIndex::resolve(headers)?;

        let mut records = Vec::with_capacity(rows.len());
        let mut dropped_rows = 0;
        for (line, row) in rows.into_iter().enumerate() {
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            if row.len() != headers.len() {
                // +2: one for the header, one for 1-based numbering
                warn!(
                    row = line + 2,
                    fields = row.len(),
                    expected = headers.len(),
                    "dropping row with wrong field count"
                );
                dropped_rows += 1;
                continue;
            }
            records.push(index.project(row));
        }

        if dropped_rows > 0 {
            warn!(dropped_rows, kept = records.len(), "malformed rows dropped");
        }
        Ok(Self {
            records,
            dropped_rows,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Position of each required column in the file's header.
struct HeaderIndex {
    positions: [usize; COLUMNS.len()],
}

impl HeaderIndex {
    fn resolve(headers: &[String]) -> Result<Self, ParseError> {
        let canonical: Vec<String> = headers.iter().map(|h| canonical_name(h)).collect();
        let mut positions = [0usize; COLUMNS.len()];
        let mut missing = Vec::new();

        for (slot, column) in COLUMNS.iter().enumerate() {
            let wanted = canonical_name(column);
            match canonical.iter().position(|h| *h == wanted) {
                Some(pos) => positions[slot] = pos,
                None => missing.push(column.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(ParseError::MissingColumns(missing));
        }
        Ok(Self { positions })
    }

    fn project(&self, mut row: Vec<String>) -> RawRecord {
        let mut take = |slot: usize| std::mem::take(&mut row[self.positions[slot]]);
        RawRecord {
            region: take(0),
            state: take(1),
            city: take(2),
            retailer: take(3),
            product: take(4),
            invoice_date: take(5),
            units_sold: take(6),
            total_sales: take(7),
            operating_profit: take(8),
            price_per_unit: take(9),
        }
    }
}

/// `"Invoice Date"`, `"invoicedate"` and `"\u{feff}InvoiceDate"` all map to the same key.
fn canonical_name(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
