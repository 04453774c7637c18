use crate::ingest::{FileFormat, IngestOptions};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Settings for a dashboard session. Every key is optional in the YAML file;
/// anything left out keeps its default.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    /// Field separator for delimited uploads.
    pub delimiter: char,
    /// WHATWG encoding label for delimited uploads.
    pub encoding: String,
    pub download_file_name: String,
    pub download_mime: String,
    /// Also render the filtered rows as a table.
    pub show_table: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Interactive Sales Dashboard".to_string(),
            delimiter: ';',
            encoding: "latin1".to_string(),
            download_file_name: "Filtered_Sales_Data.csv".to_string(),
            download_mime: "text/csv".to_string(),
            show_table: false,
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("parsing dashboard config")
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        Self::from_yaml_str(&text).with_context(|| format!("in config file {:?}", path))
    }

    /// Reader settings for an upload of the given format.
    pub fn ingest_options(&self, format: FileFormat) -> Result<IngestOptions> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter {:?} must be a single ASCII character", self.delimiter);
        }
        Ok(IngestOptions {
            format,
            delimiter: self.delimiter as u8,
            encoding: self.encoding.clone(),
        })
    }
}
