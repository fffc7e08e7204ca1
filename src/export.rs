//! Tabular export to CSV or JSON files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::info;

use crate::data::{Table, Timestamp};

/// Timestamp format embedded in export file names.
pub const FILE_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Output format for exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// `<prefix>_<token>_<timestamp>`, e.g. `siss_critical_2025-03-10_08-00-00`.
pub fn file_stem(prefix: &str, token: &str, at: Timestamp) -> String {
    format!("{}_{}_{}", prefix, token, at.format(FILE_TIME_FORMAT))
}

/// `riwayat_status_siss_<timestamp>`, the transition log export.
pub fn history_file_stem(at: Timestamp) -> String {
    format!("riwayat_status_siss_{}", at.format(FILE_TIME_FORMAT))
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, "{}", sep)?;
        } else {
            first = false;
        }
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header row followed by every data row.
pub fn to_csv_string(table: &Table) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_row(&mut buf, &table.headers, ',');
    for row in &table.rows {
        let _ = write_row(&mut buf, row, ',');
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Array of objects keyed by header.
pub fn to_json_value(table: &Table) -> serde_json::Value {
    let records: Vec<serde_json::Value> = (0..table.rows.len())
        .map(|r| {
            let record: serde_json::Map<String, serde_json::Value> = table
                .headers
                .iter()
                .enumerate()
                .map(|(c, h)| (h.clone(), table.cell(r, c).into()))
                .collect();
            serde_json::Value::Object(record)
        })
        .collect();
    serde_json::Value::Array(records)
}

/// Write `table` to `<dir>/<stem>.<ext>`, creating `dir` if needed.
///
/// Returns the path written to.
pub fn export_table(dir: &Path, stem: &str, table: &Table, format: ExportFormat) -> Result<PathBuf> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    }

    let path = dir.join(format!("{}.{}", stem, format.extension()));
    let contents = match format {
        ExportFormat::Csv => to_csv_string(table),
        ExportFormat::Json => serde_json::to_string_pretty(&to_json_value(table))?,
    };

    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = table.len(), "Exported table");
    Ok(path)
}
