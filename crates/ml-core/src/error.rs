//! Error types for ml-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ml-core
///
/// The `Display` form of each variant is the message shown to the operator,
/// so it carries everything needed to fix the input or the column settings.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read the uploaded file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes that are not valid Shift_JIS (Windows-31J)
    #[error("failed to decode input as Shift_JIS: invalid byte sequence at offset {offset}")]
    Decode { offset: usize },

    /// Malformed CSV structure detected outside the csv crate
    #[error("CSVのパースに失敗しました。{message} (line {line})")]
    CsvParse { line: u64, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSVのパースに失敗しました。{}", csv_message(.0))]
    Csv(#[from] csv::Error),

    /// A requested column name is not in the header
    #[error("[{name}]が見つかりませんでした。ヘッダは次の中から選ぶ必要があります。{{{}}}", .header.join(", "))]
    MissingColumn { name: String, header: Vec<String> },

    /// A body row has no cell at a resolved column index
    #[error("row {row} has {len} cells, column index {index} is out of range")]
    RowTooShort { row: usize, index: usize, len: usize },

    /// Key and value sequences handed to the inverter differ in length
    #[error("cannot invert {keys} keys against {values} value lists")]
    LengthMismatch { keys: usize, values: usize },

    /// No preset matches the given name or index
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The csv crate's message without its own "CSV error: " prefix
fn csv_message(err: &csv::Error) -> String {
    let message = err.to_string();
    match message.strip_prefix("CSV error: ") {
        Some(rest) => rest.to_string(),
        None => message,
    }
}
