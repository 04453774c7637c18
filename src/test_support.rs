use crate::model::Record;
use crate::normalize::parse_invoice_date;
use chrono::NaiveDate;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,salesdash=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub fn date(s: &str) -> NaiveDate {
    parse_invoice_date(s).expect("fixture date must parse")
}

/// One unit, profit at a quarter of sales, price equal to sales.
pub fn record(
    region: &str,
    state: &str,
    city: &str,
    retailer: &str,
    invoice_date: &str,
    total_sales: f64,
) -> Record {
    Record {
        region: region.to_string(),
        state: state.to_string(),
        city: city.to_string(),
        retailer: retailer.to_string(),
        product: "Men's Street Footwear".to_string(),
        invoice_date: parse_invoice_date(invoice_date),
        units_sold: 1,
        total_sales,
        operating_profit: total_sales * 0.25,
        price_per_unit: total_sales,
    }
}
