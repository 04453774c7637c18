pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod present;

#[cfg(test)]
mod test_support;

pub use error::ParseError;
pub use model::{Dimension, Measure, Record, Table};
