//! Append-only CSV writer with a fixed column set
//!
//! Records are serialized to a JSON object first and only the declared
//! columns are picked out, so new upstream fields never shift the columns.

use crate::{CrawlerError, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A single CSV destination
pub struct TabularSink {
    path: PathBuf,
    columns: Vec<String>,
    writer: csv::Writer<File>,
    rows: u64,
}

impl TabularSink {
    /// Creates the file at `path` and writes the header row
    pub fn create(path: &Path, columns: &[&str]) -> Result<Self> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(columns)?;
        writer.flush()?;

        Ok(Self {
            path: path.to_path_buf(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            writer,
            rows: 0,
        })
    }

    /// Writes one record, keeping only the declared columns
    pub fn write<R: Serialize>(&mut self, record: &R) -> Result<()> {
        let value = serde_json::to_value(record)?;
        self.write_value(&value)
    }

    /// Writes one JSON object; missing columns become empty cells
    pub fn write_value(&mut self, record: &Value) -> Result<()> {
        let Value::Object(fields) = record else {
            return Err(CrawlerError::UnexpectedPayload {
                url: self.path.display().to_string(),
                message: "records must be JSON objects".to_string(),
            });
        };

        let row: Vec<String> = self
            .columns
            .iter()
            .map(|column| render_cell(fields.get(column)))
            .collect();

        self.writer.write_record(&row)?;
        self.rows += 1;
        Ok(())
    }

    /// Pushes buffered rows to disk
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and closes the file, returning the number of data rows written
    pub fn close(mut self) -> Result<u64> {
        self.flush()?;
        Ok(self.rows)
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}
