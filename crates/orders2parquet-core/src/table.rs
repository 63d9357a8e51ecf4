//! Typed column access over record batches

use crate::error::{CoreError, Result};
use arrow::array::{RecordBatch, StringArray, TimestampMicrosecondArray};

/// Look up a column and downcast it to a string array.
///
/// A missing column or a non-string representation are both reported as a
/// schema mismatch against `table`.
pub(crate) fn string_column<'a>(
    batch: &'a RecordBatch,
    table: &str,
    name: &str,
) -> Result<&'a StringArray> {
    let idx = column_index(batch, table, name)?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| CoreError::SchemaMismatch {
            table: table.to_string(),
            column: name.to_string(),
        })
}

/// Look up a column and downcast it to a microsecond timestamp array.
pub(crate) fn timestamp_column<'a>(
    batch: &'a RecordBatch,
    table: &str,
    name: &str,
) -> Result<&'a TimestampMicrosecondArray> {
    let idx = column_index(batch, table, name)?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<TimestampMicrosecondArray>()
        .ok_or_else(|| CoreError::SchemaMismatch {
            table: table.to_string(),
            column: name.to_string(),
        })
}

pub(crate) fn column_index(batch: &RecordBatch, table: &str, name: &str) -> Result<usize> {
    batch
        .schema()
        .index_of(name)
        .map_err(|_| CoreError::SchemaMismatch {
            table: table.to_string(),
            column: name.to_string(),
        })
}
