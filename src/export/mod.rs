//! Export the catalog to JSON or CSV.

use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::catalog;
use crate::db::{Database, ImageRecord};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}

/// Export all catalog records to a file, in display order. Returns the
/// number of records written.
pub fn export_images(db: &Database, output_path: &Path, format: ExportFormat) -> Result<usize> {
    let mut records = db.all_images()?;
    catalog::sort_for_display(&mut records);
    let count = records.len();

    match format {
        ExportFormat::Json => export_json(&records, output_path)?,
        ExportFormat::Csv => export_csv(&records, output_path)?,
    }

    tracing::info!(count, format = format.name(), path = %output_path.display(), "Catalog exported");
    Ok(count)
}

fn export_json(records: &[ImageRecord], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

fn export_csv(records: &[ImageRecord], output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
