//! Table types for a parsed membership export

use crate::error::Result;
use crate::tokenizer::Record;
use serde::{Deserialize, Serialize};

/// A parsed CSV file split into header and body rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// The first record of the file
    pub header: Vec<String>,
    /// Every record after the first, in file order
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table from an already split header and body
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Build a table from a record stream.
    ///
    /// The first record becomes the header before any other record is
    /// looked at. An empty stream yields an empty header and no rows.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        let mut records = records.into_iter();
        let header = match records.next() {
            Some(first) => first?,
            None => return Ok(Self::default()),
        };

        let rows = records.collect::<Result<Vec<_>>>()?;
        Ok(Self { header, rows })
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Get the number of body rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Column indices resolved against a header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub key_index: usize,
    pub value_index: usize,
}

/// One body row reduced to its key and the tokens of its value cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowView {
    /// Key cell, verbatim
    pub key: String,
    /// Non-empty value tokens in cell order
    pub values: Vec<String>,
}
