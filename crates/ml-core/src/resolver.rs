//! Header lookup for the configured key and value columns

use crate::config::ColumnSpec;
use crate::error::{Error, Result};
use crate::table::ResolvedColumns;

/// Resolve the key and value columns of `header`.
///
/// Names are matched exactly: no trimming, no case folding. The first
/// matching cell wins. The key column is looked up first and a missing key
/// is reported without checking the value column. Both names may resolve to
/// the same index.
pub fn resolve(header: &[String], spec: &ColumnSpec) -> Result<ResolvedColumns> {
    let key_index = find_column(header, &spec.key_header)?;
    let value_index = find_column(header, &spec.value_header)?;
    Ok(ResolvedColumns {
        key_index,
        value_index,
    })
}

/// Index of the first header cell equal to `name`
pub fn find_column(header: &[String], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell == name)
        .ok_or_else(|| Error::MissingColumn {
            name: name.to_string(),
            header: header.to_vec(),
        })
}
