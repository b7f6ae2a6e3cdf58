//! Export of an inversion as a two-column table
//!
//! The first row repeats the configured header names as titles. Each
//! following row is one member with the lists it belongs to, one per line
//! inside a single cell.

use crate::config::ColumnSpec;
use crate::error::Result;
use crate::inverter::Inversion;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options for CSV export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Prefix the output with a UTF-8 byte order mark
    pub bom: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        // spreadsheet tools misread Japanese UTF-8 without it
        Self { bom: true }
    }
}

/// Write the inversion as CSV
pub fn write_csv<W: Write>(
    mut writer: W,
    spec: &ColumnSpec,
    inversion: &Inversion,
    options: ExportOptions,
) -> Result<()> {
    if options.bom {
        writer.write_all(UTF8_BOM)?;
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    csv_writer.write_record([spec.key_header.as_str(), spec.value_header.as_str()])?;
    for (value, keys) in inversion.iter() {
        csv_writer.write_record([value, keys.join("\n").as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the inversion as CSV to a file
pub fn export_csv<P: AsRef<Path>>(
    path: P,
    spec: &ColumnSpec,
    inversion: &Inversion,
    options: ExportOptions,
) -> Result<()> {
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), spec, inversion, options)
}

/// Render the inversion as a pretty JSON object
pub fn to_json(inversion: &Inversion) -> Result<String> {
    Ok(serde_json::to_string_pretty(inversion)?)
}
