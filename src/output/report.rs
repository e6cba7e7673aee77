use crate::record::ProductRecord;
use chrono::Local;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing the product report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("No records to write")]
    NoRecords,

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the collected records to a timestamped CSV report
///
/// The file is named `product_report_<YYYYmmdd_HHMMSS>.csv` and placed in
/// `dir`. Column headers are derived from the first record's field set;
/// every record in one run carries the same set by construction, so the
/// columns line up for all rows. Unmatched fields are written as empty
/// cells.
///
/// # Arguments
///
/// * `records` - The records to write; must be non-empty
/// * `dir` - Directory the report file is created in
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written report
/// * `Err(OutputError)` - Nothing to write, or the write failed
pub fn write_report(records: &[ProductRecord], dir: &Path) -> Result<PathBuf, OutputError> {
    let first = records.first().ok_or(OutputError::NoRecords)?;

    let filename = format!("product_report_{}.csv", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);

    if first.is_empty() {
        // No fields were requested; emit an empty report rather than
        // zero-width rows.
        std::fs::File::create(&path)?;
        tracing::warn!("No fields configured, report is empty: {}", path.display());
        return Ok(path);
    }

    let mut writer = csv::Writer::from_path(&path)?;

    writer.write_record(first.fields().map(|f| f.key()))?;
    for record in records {
        writer.write_record(record.entries().map(|(_, value)| value.unwrap_or("")))?;
    }
    writer.flush()?;

    Ok(path)
}
