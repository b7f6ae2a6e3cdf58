//! Splitting of multi-valued member cells

use crate::error::{Error, Result};
use crate::table::{RawTable, ResolvedColumns, RowView};

/// Split a value cell into its non-empty line tokens.
///
/// Lines end at `\n`; a `\r` right before it belongs to the line break.
/// Tokens are otherwise untouched, so `" a "` stays `" a "`.
pub fn split_value_cell(cell: &str) -> Vec<String> {
    cell.lines()
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reduce every body row to its key cell and split value cell
pub fn split_rows(table: &RawTable, columns: ResolvedColumns) -> Result<Vec<RowView>> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(row, cells)| -> Result<RowView> {
            let cell = |index: usize| {
                cells.get(index).ok_or(Error::RowTooShort {
                    row: row + 1,
                    index,
                    len: cells.len(),
                })
            };
            Ok(RowView {
                key: cell(columns.key_index)?.clone(),
                values: split_value_cell(cell(columns.value_index)?),
            })
        })
        .collect()
}
