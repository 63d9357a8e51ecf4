//! Weekly bucketing and per-product order counts
//!
//! Week convention: ISO calendar week, Monday start. `week_start` is the
//! Monday of the week containing the purchase timestamp, truncated to a
//! date. The convention is fixed so that partition contents and any
//! downstream join on `week_start` are reproducible across runs.

use crate::error::{CoreError, Result};
use crate::schema::{field, weekly_aggregate_schema};
use crate::table::{string_column, timestamp_column};
use arrow::array::{Array, Date32Builder, RecordBatch, StringBuilder, UInt64Builder};
use arrow::datatypes::Date32Type;
use chrono::{DateTime, Datelike, Days};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Monday of the calendar week containing `timestamp_micros`, as days
/// since the Unix epoch (Date32). A timestamp exactly at Monday 00:00:00
/// belongs to the week it starts.
pub fn week_start_days(timestamp_micros: i64) -> Option<i32> {
    let date = DateTime::from_timestamp_micros(timestamp_micros)?.date_naive();
    let monday = date.checked_sub_days(Days::new(
        u64::from(date.weekday().num_days_from_monday()),
    ))?;
    Some(Date32Type::from_naive_date(monday))
}

/// Count joined rows per (`product_id`, `week_start`) group.
///
/// Groups with zero matches never appear, so every emitted count is ≥ 1
/// and the group key is unique. Output rows are sorted by group key so
/// repeated runs produce identical batches. A NULL timestamp or product
/// id is a data-quality failure, not something to drop or default.
pub fn weekly_order_counts(joined: &RecordBatch) -> Result<RecordBatch> {
    let order_ids = string_column(joined, "joined", field::ORDER_ID)?;
    let products = string_column(joined, "joined", field::PRODUCT_ID)?;
    let timestamps = timestamp_column(joined, "joined", field::ORDER_PURCHASE_TIMESTAMP)?;

    let mut counts: BTreeMap<(String, i32), u64> = BTreeMap::new();
    for row in 0..joined.num_rows() {
        if timestamps.is_null(row) {
            return Err(CoreError::MissingTimestamp {
                order_id: order_ids.value(row).to_string(),
                row,
            });
        }
        let week = week_start_days(timestamps.value(row)).ok_or_else(|| {
            CoreError::MissingTimestamp {
                order_id: order_ids.value(row).to_string(),
                row,
            }
        })?;
        if products.is_null(row) {
            return Err(CoreError::MissingProductId {
                order_id: order_ids.value(row).to_string(),
                row,
            });
        }
        *counts
            .entry((products.value(row).to_string(), week))
            .or_insert(0) += 1;
    }

    let mut product_builder = StringBuilder::new();
    let mut week_builder = Date32Builder::new();
    let mut count_builder = UInt64Builder::new();
    for ((product, week), count) in &counts {
        product_builder.append_value(product);
        week_builder.append_value(*week);
        count_builder.append_value(*count);
    }

    let aggregate = RecordBatch::try_new(
        weekly_aggregate_schema(),
        vec![
            Arc::new(product_builder.finish()),
            Arc::new(week_builder.finish()),
            Arc::new(count_builder.finish()),
        ],
    )?;
    tracing::debug!(
        joined = joined.num_rows(),
        groups = aggregate.num_rows(),
        "aggregated weekly order counts"
    );
    Ok(aggregate)
}
