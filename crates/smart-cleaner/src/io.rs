//! CSV import and export.

use crate::error::{Result, ResultExt};
use crate::utils::is_usable_table;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Rows sampled for schema inference.
pub const INFER_SCHEMA_ROWS: usize = 1000;

/// Read a CSV file with a header row.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .into_reader_with_file_handle(file)
        .finish()
        .context(format!("Failed to parse CSV '{}'", path.display()))?;

    info!("Loaded {}: {:?}", path.display(), df.shape());
    Ok(df)
}

/// Serialize a table as comma-delimited CSV with a header row.
///
/// An absent or empty table exports to empty bytes.
pub fn write_csv<'a>(df: impl Into<Option<&'a DataFrame>>) -> Result<Vec<u8>> {
    let df = match df.into() {
        Some(df) if is_usable_table(Some(df)) => df,
        _ => {
            debug!("Nothing to export");
            return Ok(Vec::new());
        }
    };

    let mut buf = Vec::new();
    let mut df = df.clone();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df)
        .context("Failed to write CSV")?;
    Ok(buf)
}
