//! ml-core: Core library for inverting mailing-list membership exports
//!
//! A mailing-list service exports one row per list, with the list address
//! in one column and its members, one per line, in another. This library
//! answers the reverse question, which lists an address belongs to:
//! - Decode the Shift_JIS export
//! - Tokenize it as CSV, taking the first record as the header
//! - Resolve the list and member columns by header name
//! - Split member cells and invert into member → lists
//! - Export the result as CSV or JSON

pub mod config;
pub mod decoder;
pub mod error;
pub mod export;
pub mod inverter;
pub mod pipeline;
pub mod resolver;
pub mod session;
pub mod splitter;
pub mod table;
pub mod tokenizer;

pub use config::{ColumnSpec, Preset, PRESETS};
pub use decoder::decode;
pub use error::{Error, Result};
pub use export::{export_csv, to_json, write_csv, ExportOptions};
pub use inverter::{invert, Inversion};
pub use pipeline::{read_header, run_pipeline, run_with_spec, Pipeline, PipelineOutcome, Stage};
pub use resolver::resolve;
pub use session::{RunTicket, Session};
pub use splitter::{split_rows, split_value_cell};
pub use table::{RawTable, ResolvedColumns, RowView};
pub use tokenizer::{records, tokenize, Record, Records};
