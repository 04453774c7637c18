use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Column names of a sales table, in export order.
pub const COLUMNS: [&str; 10] = [
    "Region",
    "State",
    "City",
    "Retailer",
    "Product",
    "InvoiceDate",
    "UnitsSold",
    "TotalSales",
    "OperatingProfit",
    "PriceperUnit",
];

/// One sales transaction after normalization.
///
/// Field order matches [`COLUMNS`]; the serde names are the column names so
/// CSV and JSON output line up with the uploaded file's header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Retailer")]
    pub retailer: String,
    #[serde(rename = "Product")]
    pub product: String,
    /// `None` when the cell could not be read as a date.
    #[serde(rename = "InvoiceDate")]
    pub invoice_date: Option<NaiveDate>,
    #[serde(rename = "UnitsSold")]
    pub units_sold: i64,
    #[serde(rename = "TotalSales")]
    pub total_sales: f64,
    #[serde(rename = "OperatingProfit")]
    pub operating_profit: f64,
    #[serde(rename = "PriceperUnit")]
    pub price_per_unit: f64,
}

/// Immutable, ordered collection of [`Record`]s.
///
/// Filtering never mutates a table; it builds a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Categorical fields a table can be filtered or grouped by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Region,
    State,
    City,
    Retailer,
    Product,
}

impl Dimension {
    pub fn of<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            Dimension::Region => &record.region,
            Dimension::State => &record.state,
            Dimension::City => &record.city,
            Dimension::Retailer => &record.retailer,
            Dimension::Product => &record.product,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Dimension::Region => "Region",
            Dimension::State => "State",
            Dimension::City => "City",
            Dimension::Retailer => "Retailer",
            Dimension::Product => "Product",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Numeric fields that can be summed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Measure {
    UnitsSold,
    TotalSales,
    OperatingProfit,
    PriceperUnit,
}

impl Measure {
    pub fn of(&self, record: &Record) -> f64 {
        match self {
            Measure::UnitsSold => record.units_sold as f64,
            Measure::TotalSales => record.total_sales,
            Measure::OperatingProfit => record.operating_profit,
            Measure::PriceperUnit => record.price_per_unit,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Measure::UnitsSold => "UnitsSold",
            Measure::TotalSales => "TotalSales",
            Measure::OperatingProfit => "OperatingProfit",
            Measure::PriceperUnit => "PriceperUnit",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
