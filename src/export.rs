// src/export.rs
//! Re-serialization of a [`Table`] for download.

use crate::model::{Record, Table, COLUMNS};
use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use csv::WriterBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Comma-separated UTF-8 text, header row first, one record per line.
/// Missing dates are written as empty fields.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // written by hand so an empty table still gets a header
    wtr.write_record(COLUMNS)?;
    for record in table {
        wtr.serialize(record)?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV export: {}", e.error()))
}

fn arrow_schema() -> Schema {
    let text = |name: &str| Field::new(name, DataType::Utf8, false);
    Schema::new(vec![
        text(COLUMNS[0]),
        text(COLUMNS[1]),
        text(COLUMNS[2]),
        text(COLUMNS[3]),
        text(COLUMNS[4]),
        Field::new(COLUMNS[5], DataType::Date32, true),
        Field::new(COLUMNS[6], DataType::Int64, false),
        Field::new(COLUMNS[7], DataType::Float64, false),
        Field::new(COLUMNS[8], DataType::Float64, false),
        Field::new(COLUMNS[9], DataType::Float64, false),
    ])
}

pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let records = table.records();
    let text = |f: fn(&Record) -> &str| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(records.iter().map(f)))
    };

    let columns: Vec<ArrayRef> = vec![
        text(|r| r.region.as_str()),
        text(|r| r.state.as_str()),
        text(|r| r.city.as_str()),
        text(|r| r.retailer.as_str()),
        text(|r| r.product.as_str()),
        Arc::new(Date32Array::from_iter(records.iter().map(|r| {
            r.invoice_date
                .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        }))),
        Arc::new(Int64Array::from_iter_values(
            records.iter().map(|r| r.units_sold),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.total_sales),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.operating_profit),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.price_per_unit),
        )),
    ];

    RecordBatch::try_new(Arc::new(arrow_schema()), columns).context("building sales record batch")
}

/// Snappy-compressed Parquet copy of `table`.
#[tracing::instrument(level = "info", skip(table, path), fields(rows = table.len(), path = %path.as_ref().display()))]
pub fn write_parquet<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let batch = to_record_batch(table)?;
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer for export")?;
    writer.write(&batch).context("writing export batch")?;
    writer.close().context("closing export writer")?;
    Ok(())
}
