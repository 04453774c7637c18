// src/dashboard.rs
//! One dashboard session: an uploaded file turned into a [`Table`] once, then
//! filtered, aggregated and drawn again for every change of selection.

use crate::aggregate::{self, Kpis};
use crate::config::DashboardConfig;
use crate::export;
use crate::filter::{self, CategoryFilter, DateRange, FilterCriteria};
use crate::ingest::{self, FileFormat};
use crate::model::{Dimension, Measure, Table};
use crate::normalize;
use crate::present::{format_count, format_money, Presenter, Series};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::{fs, path::Path};
use tracing::info;

/// What the user currently has selected. Dates left unset fall back to the
/// span of the rows that pass the categorical filters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub categories: CategoryFilter,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Values offered in each filter picker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
}

pub struct Dashboard {
    config: DashboardConfig,
    table: Table,
    dropped_rows: usize,
}

impl Dashboard {
    /// Parse and clean an upload. `file_name` decides between delimited text
    /// and spreadsheet input.
    #[tracing::instrument(level = "info", skip(bytes, config), fields(bytes = bytes.len()))]
    pub fn from_upload(file_name: &str, bytes: &[u8], config: DashboardConfig) -> Result<Self> {
        let opts = config.ingest_options(FileFormat::from_file_name(file_name))?;
        let raw = ingest::load(bytes, &opts)
            .with_context(|| format!("could not read uploaded file {file_name}"))?;
        let table = normalize::normalize(&raw);
        info!(rows = table.len(), "table ready");
        Ok(Self {
            config,
            table,
            dropped_rows: raw.dropped_rows,
        })
    }

    pub fn open<P: AsRef<Path>>(path: P, config: DashboardConfig) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("reading {:?}", path))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_upload(&name, &bytes, config)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            regions: filter::distinct_values(&self.table, Dimension::Region),
            states: filter::distinct_values(&self.table, Dimension::State),
            cities: filter::distinct_values(&self.table, Dimension::City),
        }
    }

    /// Criteria for `selection`, or `None` when no date range can be formed
    /// because neither the selection nor the data provides one.
    pub fn criteria(&self, selection: &Selection) -> Option<FilterCriteria> {
        let span = DateRange::spanning(&filter::apply_categories(
            &self.table,
            &selection.categories,
        ));
        let start = selection.start.or(span.map(|r| r.start))?;
        let end = selection.end.or(span.map(|r| r.end))?;
        Some(FilterCriteria::new(
            selection.categories.clone(),
            DateRange::new(start, end),
        ))
    }

    pub fn filtered(&self, selection: &Selection) -> Table {
        match self.criteria(selection) {
            Some(criteria) => filter::apply(&self.table, &criteria),
            // no dated rows: every record would fail the date test anyway
            None => Table::default(),
        }
    }

    /// Run one full cycle for `selection` and return the filtered table.
    #[tracing::instrument(level = "info", skip_all, fields(rows = self.table.len()))]
    pub fn render<P: Presenter>(&self, selection: &Selection, presenter: &mut P) -> Result<Table> {
        let filtered = self.filtered(selection);
        info!(kept = filtered.len(), "filter applied");
        render(&filtered, &self.config, presenter)?;
        Ok(filtered)
    }
}

/// Draw every widget for an already-filtered table.
pub fn render<P: Presenter>(table: &Table, config: &DashboardConfig, out: &mut P) -> Result<()> {
    // 1) Headline numbers
    let kpis = Kpis::from_table(table);
    out.display_metric("Total Sales", &format_money(kpis.total_sales))?;
    out.display_metric("Total Profit", &format_money(kpis.total_profit))?;
    out.display_metric("Units Sold", &format_count(kpis.total_units))?;
    out.display_metric("Total Orders", &kpis.order_count.to_string())?;

    // 2) Charts, one aggregation each
    let by_retailer =
        aggregate::sum_by_field(table, Dimension::Retailer, Measure::TotalSales).sorted_by_key();
    let (names, sales) = split(by_retailer.into_entries());
    out.render_bar_chart("Total Sales by Retailer", &names, &sales)?;

    let (months, sales) = split(aggregate::monthly_sales(table).sorted_by_key().into_entries());
    out.render_line_chart("Total Sales Over Time", &months, &sales)?;

    let tree = aggregate::sum_by_path(table, Dimension::Region, Dimension::City, Measure::TotalSales);
    let (paths, sales): (Vec<Vec<String>>, Vec<f64>) = tree
        .into_entries()
        .into_iter()
        .map(|((region, city), v)| (vec![region, city], v))
        .unzip();
    out.render_treemap("Total Sales by Region and City", &paths, &sales)?;

    let by_state = aggregate::sum_two_measures_by_field(
        table,
        Dimension::State,
        Measure::TotalSales,
        Measure::UnitsSold,
    )
    .sorted_by_key();
    let (states, pairs) = split(by_state.into_entries());
    let (state_sales, state_units): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
    out.render_dual_axis_chart(
        "Total Sales and Units Sold by State",
        &states,
        Series {
            name: "Total Sales",
            values: &state_sales,
        },
        Series {
            name: "Units Sold",
            values: &state_units,
        },
    )?;

    let (labels, sales) = split(
        aggregate::sum_by_field(table, Dimension::Retailer, Measure::TotalSales).into_entries(),
    );
    out.render_pie_chart("Retailer wise Sales", &labels, &sales)?;

    let (labels, sales) = split(
        aggregate::sum_by_field(table, Dimension::Product, Measure::TotalSales).into_entries(),
    );
    out.render_pie_chart("Product wise Sales", &labels, &sales)?;

    // 3) Download of exactly the rows behind the charts
    let csv = export::to_csv_bytes(table)?;
    out.offer_download(&csv, &config.download_file_name, &config.download_mime)?;

    if config.show_table {
        out.render_table(table)?;
    }
    Ok(())
}

fn split<K, V>(entries: Vec<(K, V)>) -> (Vec<K>, Vec<V>) {
    entries.into_iter().unzip()
}
