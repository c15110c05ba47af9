//! Output module for rendering scraped records
//!
//! This module handles:
//! - Rendering records as JSON, JSON lines, or TSV
//! - Writing them to a file or any other writer

mod format;
mod tsv;

pub use format::{OutputError, OutputFormat, OutputResult};
pub use tsv::{format_tsv, TSV_HEADER};

use crate::state::EventRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes records to `writer` in the given format
///
/// # Arguments
///
/// * `records` - The records, in the order they should appear
/// * `format` - The rendering
/// * `writer` - Destination; flushed before returning
///
/// # Returns
///
/// * `Ok(())` - All records written
/// * `Err(OutputError)` - Serialization or IO failure
pub fn write_records<W: Write>(
    records: &[EventRecord],
    format: OutputFormat,
    mut writer: W,
) -> OutputResult<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.write_all(b"\n")?;
        }
        OutputFormat::Jsonl => {
            for record in records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
        }
        OutputFormat::Tsv => {
            writer.write_all(format_tsv(records).as_bytes())?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Writes records to a file, replacing any existing content
pub fn write_records_to_path(
    records: &[EventRecord],
    format: OutputFormat,
    path: &Path,
) -> OutputResult<()> {
    let file = File::create(path)?;
    write_records(records, format, BufWriter::new(file))
}
