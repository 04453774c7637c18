//! Raw text cells → typed [`Record`]s. Never fails: unreadable dates become
//! `None` and unreadable numbers become zero.

mod date_parser;
mod utils;

pub use date_parser::parse_invoice_date;
pub use utils::{clean_str, parse_currency, parse_units};

use crate::ingest::{RawRecord, RawTable};
use crate::model::{Record, Table};
use tracing::{debug, trace};
use utils::{try_parse_currency, try_parse_units};

#[derive(Default)]
struct Coercions {
    dates: usize,
    numbers: usize,
}

impl Coercions {
    fn number<T: Default>(&mut self, raw: &str, parsed: Option<T>) -> T {
        match parsed {
            Some(v) => v,
            None => {
                if !clean_str(raw).is_empty() {
                    trace!(cell = raw, "unreadable number coerced to zero");
                    self.numbers += 1;
                }
                T::default()
            }
        }
    }
}

#[tracing::instrument(level = "debug", skip(raw), fields(rows = raw.len()))]
pub fn normalize(raw: &RawTable) -> Table {
    let mut coerced = Coercions::default();
    let table: Table = raw
        .records
        .iter()
        .map(|r| normalize_record(r, &mut coerced))
        .collect();

    if coerced.dates > 0 || coerced.numbers > 0 {
        debug!(
            bad_dates = coerced.dates,
            bad_numbers = coerced.numbers,
            "coerced unreadable cells"
        );
    }
    table
}

fn normalize_record(raw: &RawRecord, coerced: &mut Coercions) -> Record {
    let invoice_date = parse_invoice_date(&raw.invoice_date);
    if invoice_date.is_none() {
        trace!(cell = %raw.invoice_date, "unreadable invoice date");
        coerced.dates += 1;
    }

    Record {
        region: clean_str(&raw.region).to_string(),
        state: clean_str(&raw.state).to_string(),
        city: clean_str(&raw.city).to_string(),
        retailer: clean_str(&raw.retailer).to_string(),
        product: clean_str(&raw.product).to_string(),
        invoice_date,
        units_sold: coerced.number(&raw.units_sold, try_parse_units(&raw.units_sold)),
        total_sales: coerced.number(&raw.total_sales, try_parse_currency(&raw.total_sales)),
        operating_profit: coerced.number(
            &raw.operating_profit,
            try_parse_currency(&raw.operating_profit),
        ),
        price_per_unit: coerced.number(
            &raw.price_per_unit,
            try_parse_currency(&raw.price_per_unit),
        ),
    }
}
