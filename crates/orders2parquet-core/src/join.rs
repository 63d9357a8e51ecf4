//! Inner join of order items against the filtered orders
//!
//! The orders side is the build side: `order_id` is its unique key, and a
//! duplicate there would silently multiply item rows. That invariant is
//! enforced up front instead of assumed.

use crate::error::{CoreError, Result};
use crate::schema::{field, joined_schema};
use crate::table::{string_column, timestamp_column};
use arrow::array::{Array, RecordBatch, StringBuilder, TimestampMicrosecondBuilder};
use std::collections::HashMap;
use std::sync::Arc;

/// Inner join keyed on `order_id`: one output row per (item, order) pair.
///
/// NULL keys on either side never match. Rows whose order has no match in
/// the filtered orders are dropped. Output columns: `order_id`,
/// `product_id`, `order_purchase_timestamp`.
pub fn join_items_with_orders(
    items: &RecordBatch,
    orders: &RecordBatch,
) -> Result<RecordBatch> {
    let order_ids = string_column(orders, "orders", field::ORDER_ID)?;
    let timestamps = timestamp_column(orders, "orders", field::ORDER_PURCHASE_TIMESTAMP)?;

    let mut by_order: HashMap<&str, Option<i64>> = HashMap::with_capacity(orders.num_rows());
    for row in 0..orders.num_rows() {
        if order_ids.is_null(row) {
            continue;
        }
        let key = order_ids.value(row);
        let ts = timestamps.is_valid(row).then(|| timestamps.value(row));
        if by_order.insert(key, ts).is_some() {
            return Err(CoreError::DuplicateOrderId {
                order_id: key.to_string(),
            });
        }
    }

    let item_orders = string_column(items, "order_items", field::ORDER_ID)?;
    let products = string_column(items, "order_items", field::PRODUCT_ID)?;

    let mut order_id_builder = StringBuilder::new();
    let mut product_builder = StringBuilder::new();
    let mut ts_builder = TimestampMicrosecondBuilder::new();
    for row in 0..items.num_rows() {
        if item_orders.is_null(row) {
            continue;
        }
        let Some(ts) = by_order.get(item_orders.value(row)) else {
            continue;
        };
        order_id_builder.append_value(item_orders.value(row));
        if products.is_null(row) {
            product_builder.append_null();
        } else {
            product_builder.append_value(products.value(row));
        }
        ts_builder.append_option(*ts);
    }

    let joined = RecordBatch::try_new(
        joined_schema(),
        vec![
            Arc::new(order_id_builder.finish()),
            Arc::new(product_builder.finish()),
            Arc::new(ts_builder.finish().with_timezone("UTC")),
        ],
    )?;
    tracing::debug!(
        items = items.num_rows(),
        orders = orders.num_rows(),
        joined = joined.num_rows(),
        "joined order items with filtered orders"
    );
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{StringArray, TimestampMicrosecondArray};
    use arrow::datatypes::{DataType, Field, Schema};

    fn orders(rows: &[(Option<&str>, Option<i64>)]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new(field::ORDER_ID, DataType::Utf8, true),
            Field::new(
                field::ORDER_PURCHASE_TIMESTAMP,
                crate::schema::timestamp_type(),
                true,
            ),
        ]));
        let ids: StringArray = rows.iter().map(|(id, _)| *id).collect();
        let ts: TimestampMicrosecondArray = rows.iter().map(|(_, t)| *t).collect();
        RecordBatch::try_new(schema, vec![Arc::new(ids), Arc::new(ts.with_timezone("UTC"))])
            .unwrap()
    }

    fn items(rows: &[(Option<&str>, Option<&str>)]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new(field::ORDER_ID, DataType::Utf8, true),
            Field::new(field::PRODUCT_ID, DataType::Utf8, true),
        ]));
        let ids: StringArray = rows.iter().map(|(id, _)| *id).collect();
        let products: StringArray = rows.iter().map(|(_, p)| *p).collect();
        RecordBatch::try_new(schema, vec![Arc::new(ids), Arc::new(products)]).unwrap()
    }

    #[test]
    fn inner_join_drops_unmatched_items() {
        let orders = orders(&[(Some("o1"), Some(1_000_000))]);
        let items = items(&[
            (Some("o1"), Some("pA")),
            (Some("o2"), Some("pB")),
        ]);

        let joined = join_items_with_orders(&items, &orders).unwrap();
        assert_eq!(joined.num_rows(), 1);

        let ids = string_column(&joined, "joined", field::ORDER_ID).unwrap();
        assert_eq!(ids.value(0), "o1");
    }

    #[test]
    fn many_items_per_order_are_preserved() {
        let orders = orders(&[(Some("o1"), Some(1_000_000))]);
        let items = items(&[
            (Some("o1"), Some("pA")),
            (Some("o1"), Some("pB")),
            (Some("o1"), Some("pA")),
        ]);

        let joined = join_items_with_orders(&items, &orders).unwrap();
        assert_eq!(joined.num_rows(), 3);
    }

    #[test]
    fn null_keys_never_match() {
        let orders = orders(&[(None, Some(1_000_000)), (Some("o1"), Some(2_000_000))]);
        let items = items(&[(None, Some("pA")), (Some("o1"), Some("pB"))]);

        let joined = join_items_with_orders(&items, &orders).unwrap();
        assert_eq!(joined.num_rows(), 1);
    }

    #[test]
    fn duplicate_order_id_fails_fast() {
        let orders = orders(&[(Some("o1"), Some(1_000_000)), (Some("o1"), Some(2_000_000))]);
        let items = items(&[(Some("o1"), Some("pA"))]);

        let err = join_items_with_orders(&items, &orders).unwrap_err();
        match err {
            CoreError::DuplicateOrderId { order_id } => assert_eq!(order_id, "o1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_either_side_yields_empty_result() {
        let empty_orders = orders(&[]);
        let some_items = items(&[(Some("o1"), Some("pA"))]);
        assert_eq!(
            join_items_with_orders(&some_items, &empty_orders)
                .unwrap()
                .num_rows(),
            0
        );

        let some_orders = orders(&[(Some("o1"), Some(1_000_000))]);
        let empty_items = items(&[]);
        assert_eq!(
            join_items_with_orders(&empty_items, &some_orders)
                .unwrap()
                .num_rows(),
            0
        );
    }

    #[test]
    fn null_timestamp_survives_the_join() {
        let orders = orders(&[(Some("o1"), None)]);
        let items = items(&[(Some("o1"), Some("pA"))]);

        let joined = join_items_with_orders(&items, &orders).unwrap();
        assert_eq!(joined.num_rows(), 1);
        let ts =
            timestamp_column(&joined, "joined", field::ORDER_PURCHASE_TIMESTAMP).unwrap();
        assert!(ts.is_null(0));
    }
}
