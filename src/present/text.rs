use super::{format_count, format_money, Presenter, Series};
use crate::model::{Table, COLUMNS};
use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

const BAR_WIDTH: usize = 40;

/// Plain-text report for a terminal. Downloads are written into
/// `download_dir` when one is set, otherwise only announced.
pub struct TextPresenter<W: Write> {
    out: W,
    download_dir: Option<PathBuf>,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            download_dir: None,
        }
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&mut self, title: &str) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{}", "─".repeat(title.chars().count()))?;
        Ok(())
    }

    fn bars(&mut self, labels: &[String], values: &[f64]) -> Result<()> {
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = values.iter().cloned().fold(0.0_f64, f64::max);
        for (label, value) in labels.iter().zip(values) {
            writeln!(
                self.out,
                "{label:<label_width$}  {:<width$}  {}",
                bar(*value, max),
                format_money(*value),
                width = BAR_WIDTH
            )?;
        }
        Ok(())
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.max(1))
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn display_metric(&mut self, label: &str, value: &str) -> Result<()> {
        writeln!(self.out, "{label:>14}: {value}")?;
        Ok(())
    }

    fn render_bar_chart(
        &mut self,
        title: &str,
        categories: &[String],
        values: &[f64],
    ) -> Result<()> {
        self.heading(title)?;
        self.bars(categories, values)
    }

    fn render_line_chart(&mut self, title: &str, x: &[String], y: &[f64]) -> Result<()> {
        self.heading(title)?;
        self.bars(x, y)
    }

    fn render_treemap(
        &mut self,
        title: &str,
        path_levels: &[Vec<String>],
        values: &[f64],
    ) -> Result<()> {
        self.heading(title)?;
        let mut current_parent: Option<&str> = None;
        for (path, value) in path_levels.iter().zip(values) {
            let Some((leaf, parents)) = path.split_last() else {
                continue;
            };
            let parent = parents.first().map(String::as_str);
            if parent.is_some() && parent != current_parent {
                // parent total over every leaf sharing this path prefix
                let total: f64 = path_levels
                    .iter()
                    .zip(values)
                    .filter(|(p, _)| p.first().map(String::as_str) == parent)
                    .map(|(_, v)| v)
                    .sum();
                writeln!(
                    self.out,
                    "{} ({})",
                    parent.unwrap_or_default(),
                    format_money(total)
                )?;
                current_parent = parent;
            }
            writeln!(self.out, "  └ {leaf}: {}", format_money(*value))?;
        }
        Ok(())
    }

    fn render_dual_axis_chart(
        &mut self,
        title: &str,
        categories: &[String],
        series_a: Series<'_>,
        series_b: Series<'_>,
    ) -> Result<()> {
        self.heading(title)?;
        let width = categories.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        writeln!(
            self.out,
            "{:<width$}  {:>16}  {:>12}",
            "", series_a.name, series_b.name
        )?;
        for ((category, a), b) in categories.iter().zip(series_a.values).zip(series_b.values) {
            writeln!(
                self.out,
                "{category:<width$}  {:>16}  {:>12}",
                format_money(*a),
                format_count(b.round() as i64)
            )?;
        }
        Ok(())
    }

    fn render_pie_chart(&mut self, title: &str, labels: &[String], values: &[f64]) -> Result<()> {
        self.heading(title)?;
        let total: f64 = values.iter().sum();
        for (label, value) in labels.iter().zip(values) {
            let share = if total != 0.0 { value / total * 100.0 } else { 0.0 };
            writeln!(self.out, "{share:>6.1}%  {label}")?;
        }
        Ok(())
    }

    fn render_table(&mut self, table: &Table) -> Result<()> {
        self.heading(&format!("Filtered Data ({} rows)", table.len()))?;
        writeln!(self.out, "{}", COLUMNS.join(" | "))?;
        for r in table {
            let date = r
                .invoice_date
                .map(|d| d.to_string())
                .unwrap_or_default();
            writeln!(
                self.out,
                "{} | {} | {} | {} | {} | {} | {} | {:.2} | {:.2} | {:.2}",
                r.region,
                r.state,
                r.city,
                r.retailer,
                r.product,
                date,
                r.units_sold,
                r.total_sales,
                r.operating_profit,
                r.price_per_unit
            )?;
        }
        Ok(())
    }

    fn offer_download(&mut self, bytes: &[u8], filename: &str, mime_type: &str) -> Result<()> {
        let Some(dir) = self.download_dir.as_deref() else {
            writeln!(
                self.out,
                "\nDownload available: {filename} ({mime_type}, {} bytes)",
                bytes.len()
            )?;
            return Ok(());
        };
        let path = save_download(dir, filename, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "download written");
        writeln!(self.out, "\nDownload saved to {}", path.display())?;
        Ok(())
    }
}

fn save_download(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating download directory {:?}", dir))?;
    // keep the offered name from escaping the download directory
    let name = Path::new(filename)
        .file_name()
        .context("download file name is empty")?;
    let path = dir.join(name);
    fs::write(&path, bytes).with_context(|| format!("writing {:?}", path))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;
    use tempfile::tempdir;

    fn rendered<F>(draw: F) -> String
    where
        F: FnOnce(&mut TextPresenter<Vec<u8>>) -> Result<()>,
    {
        let mut p = TextPresenter::new(Vec::new());
        draw(&mut p).unwrap();
        String::from_utf8(p.into_inner()).unwrap()
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bar_chart_scales_to_largest_value() {
        let out = rendered(|p| {
            p.render_bar_chart("By Retailer", &strings(&["A", "B"]), &[100.0, 50.0])
        });
        let lines: Vec<&str> = out.lines().filter(|l| l.contains('$')).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches('█').count(), BAR_WIDTH);
        assert_eq!(lines[1].matches('█').count(), BAR_WIDTH / 2);
        assert!(lines[0].ends_with("$100"));
    }

    #[test]
    fn treemap_prints_parent_totals() {
        let paths = vec![
            strings(&["West", "Los Angeles"]),
            strings(&["West", "Seattle"]),
            strings(&["East", "Boston"]),
        ];
        let out = rendered(|p| p.render_treemap("Tree", &paths, &[10.0, 5.0, 2.0]));
        assert!(out.contains("West ($15)"));
        assert!(out.contains("  └ Seattle: $5"));
        assert!(out.contains("East ($2)"));
    }

    #[test]
    fn pie_chart_shows_shares() {
        let out = rendered(|p| p.render_pie_chart("Pie", &strings(&["A", "B"]), &[3.0, 1.0]));
        assert!(out.contains("75.0%  A"));
        assert!(out.contains("25.0%  B"));
    }

    #[test]
    fn download_is_written_into_directory() -> Result<()> {
        let dir = tempdir()?;
        let mut p = TextPresenter::new(Vec::new()).with_download_dir(dir.path());
        p.offer_download(b"a,b\n", "../escape.csv", "text/csv")?;
        assert_eq!(fs::read(dir.path().join("escape.csv"))?, b"a,b\n");
        Ok(())
    }

    #[test]
    fn table_lists_every_row() {
        let table = Table::new(vec![
            record("West", "California", "Los Angeles", "A", "2021-01-01", 1.0),
            record("East", "Maine", "Portland", "B", "bad", 2.0),
        ]);
        let out = rendered(|p| p.render_table(&table));
        assert!(out.contains("Filtered Data (2 rows)"));
        assert!(out.contains("West | California | Los Angeles | A |"));
        assert!(out.contains("| B | Men's Street Footwear |  | 1 | 2.00"));
    }
}
