//! The widget layer the dashboard draws into. The pipeline only ever hands
//! finished numbers to a [`Presenter`]; how they are drawn is up to the
//! implementation.

mod json;
mod text;

pub use json::JsonPresenter;
pub use text::TextPresenter;

use crate::model::Table;
use anyhow::Result;
use num_format::{Locale, ToFormattedString};

/// One named series of a multi-series chart.
#[derive(Clone, Copy, Debug)]
pub struct Series<'a> {
    pub name: &'a str,
    pub values: &'a [f64],
}

pub trait Presenter {
    fn display_metric(&mut self, label: &str, value: &str) -> Result<()>;

    fn render_bar_chart(&mut self, title: &str, categories: &[String], values: &[f64])
        -> Result<()>;

    fn render_line_chart(&mut self, title: &str, x: &[String], y: &[f64]) -> Result<()>;

    /// `path_levels[i]` is the outer-to-inner path of leaf `i`, e.g. `[region, city]`.
    fn render_treemap(
        &mut self,
        title: &str,
        path_levels: &[Vec<String>],
        values: &[f64],
    ) -> Result<()>;

    /// `series_a` is drawn against the left axis, `series_b` against the right.
    fn render_dual_axis_chart(
        &mut self,
        title: &str,
        categories: &[String],
        series_a: Series<'_>,
        series_b: Series<'_>,
    ) -> Result<()>;

    fn render_pie_chart(&mut self, title: &str, labels: &[String], values: &[f64]) -> Result<()>;

    fn render_table(&mut self, table: &Table) -> Result<()>;

    fn offer_download(&mut self, bytes: &[u8], filename: &str, mime_type: &str) -> Result<()>;
}

/// Whole-dollar amount with thousands separators: `1234567.8` → `$1,234,568`.
pub fn format_money(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", (rounded.abs() as u64).to_formatted_string(&Locale::en))
}

/// `1234567` → `1,234,567`.
pub fn format_count(value: i64) -> String {
    value.to_formatted_string(&Locale::en)
}
