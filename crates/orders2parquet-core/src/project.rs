//! Column projection for the filtered orders

use crate::error::{CoreError, Result};
use crate::schema::field;
use crate::table::column_index;
use arrow::array::RecordBatch;

/// Narrow the filtered orders to the two columns the join needs:
/// `order_id` and `order_purchase_timestamp`. Everything else is dropped.
pub fn project_order_columns(orders: &RecordBatch) -> Result<RecordBatch> {
    let mut indices = Vec::with_capacity(2);
    for column in [field::ORDER_ID, field::ORDER_PURCHASE_TIMESTAMP] {
        indices.push(column_index(orders, "orders", column)?);
    }
    orders.project(&indices).map_err(CoreError::from)
}
