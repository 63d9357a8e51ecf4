//! Hive-style partition keys
//!
//! Directory layout: `{dest}/{col=value}/.../part-00000.{ext}`. Date32
//! values render as ISO dates, strings are sanitized for use in paths,
//! and NULL partition values use the Hive placeholder.

use crate::error::{Result, WriterError};
use arrow::array::{Array, Date32Array, Int64Array, StringArray, UInt64Array};
use arrow::datatypes::Date32Type;
use std::path::Path;

pub(crate) const NULL_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// Render one partition value for use in a directory name.
pub(crate) fn format_partition_value(
    array: &dyn Array,
    row: usize,
    dest: &Path,
) -> Result<String> {
    if array.is_null(row) {
        return Ok(NULL_PARTITION.to_string());
    }

    let any = array.as_any();
    if let Some(strings) = any.downcast_ref::<StringArray>() {
        return Ok(sanitize_partition_value(strings.value(row)));
    }
    if let Some(dates) = any.downcast_ref::<Date32Array>() {
        let date = Date32Type::to_naive_date(dates.value(row));
        return Ok(date.format("%Y-%m-%d").to_string());
    }
    if let Some(counts) = any.downcast_ref::<UInt64Array>() {
        return Ok(counts.value(row).to_string());
    }
    if let Some(ints) = any.downcast_ref::<Int64Array>() {
        return Ok(ints.value(row).to_string());
    }

    Err(WriterError::encode(
        dest,
        format!(
            "partition column has unsupported type {}",
            array.data_type()
        ),
    ))
}

/// Build the relative directory path for one partition key combination,
/// e.g. `product_id=p42/week_start=2024-01-01`.
pub(crate) fn partition_dir(columns: &[String], values: &[String]) -> String {
    columns
        .iter()
        .zip(values)
        .map(|(column, value)| format!("{column}={value}"))
        .collect::<Vec<_>>()
        .join("/")
}

/// Sanitize a partition value for use in file paths
///
/// Replaces path-hostile characters with underscores.
fn sanitize_partition_value(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
