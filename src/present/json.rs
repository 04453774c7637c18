use super::{Presenter, Series};
use crate::model::Table;
use anyhow::Result;
use serde_json::{json, Value};
use std::io::Write;

/// Collects every widget into a JSON document, for a front end that does
/// its own drawing.
#[derive(Debug, Default)]
pub struct JsonPresenter {
    title: String,
    widgets: Vec<Value>,
}

impl JsonPresenter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            widgets: Vec::new(),
        }
    }

    pub fn widgets(&self) -> &[Value] {
        &self.widgets
    }

    pub fn into_document(self) -> Value {
        json!({ "title": self.title, "widgets": self.widgets })
    }

    pub fn write_to<W: Write>(self, out: W) -> Result<()> {
        serde_json::to_writer_pretty(out, &self.into_document())?;
        Ok(())
    }
}

impl Presenter for JsonPresenter {
    fn display_metric(&mut self, label: &str, value: &str) -> Result<()> {
        self.widgets
            .push(json!({ "type": "metric", "label": label, "value": value }));
        Ok(())
    }

    fn render_bar_chart(
        &mut self,
        title: &str,
        categories: &[String],
        values: &[f64],
    ) -> Result<()> {
        self.widgets.push(json!({
            "type": "bar",
            "title": title,
            "categories": categories,
            "values": values,
        }));
        Ok(())
    }

    fn render_line_chart(&mut self, title: &str, x: &[String], y: &[f64]) -> Result<()> {
        self.widgets
            .push(json!({ "type": "line", "title": title, "x": x, "y": y }));
        Ok(())
    }

    fn render_treemap(
        &mut self,
        title: &str,
        path_levels: &[Vec<String>],
        values: &[f64],
    ) -> Result<()> {
        self.widgets.push(json!({
            "type": "treemap",
            "title": title,
            "paths": path_levels,
            "values": values,
        }));
        Ok(())
    }

    fn render_dual_axis_chart(
        &mut self,
        title: &str,
        categories: &[String],
        series_a: Series<'_>,
        series_b: Series<'_>,
    ) -> Result<()> {
        self.widgets.push(json!({
            "type": "dual_axis",
            "title": title,
            "categories": categories,
            "left": { "name": series_a.name, "values": series_a.values },
            "right": { "name": series_b.name, "values": series_b.values },
        }));
        Ok(())
    }

    fn render_pie_chart(&mut self, title: &str, labels: &[String], values: &[f64]) -> Result<()> {
        self.widgets.push(json!({
            "type": "pie",
            "title": title,
            "labels": labels,
            "values": values,
        }));
        Ok(())
    }

    fn render_table(&mut self, table: &Table) -> Result<()> {
        self.widgets.push(json!({
            "type": "table",
            "rows": serde_json::to_value(table.records())?,
        }));
        Ok(())
    }

    fn offer_download(&mut self, bytes: &[u8], filename: &str, mime_type: &str) -> Result<()> {
        self.widgets.push(json!({
            "type": "download",
            "filename": filename,
            "mime_type": mime_type,
            "content": String::from_utf8_lossy(bytes),
        }));
        Ok(())
    }
}
