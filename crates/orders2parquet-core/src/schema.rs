//! Column names and Arrow schemas shared across the pipeline stages
//!
//! Column names follow the source datasets; the aggregate columns are the
//! pipeline's own output contract.

use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use std::sync::{Arc, OnceLock};

/// Column names used across the two source tables and the output.
pub mod field {
    pub const ORDER_ID: &str = "order_id";
    pub const ORDER_STATUS: &str = "order_status";
    pub const ORDER_PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
    pub const PRODUCT_ID: &str = "product_id";
    pub const WEEK_START: &str = "week_start";
    pub const ORDER_COUNT: &str = "order_count";
}

/// Columns the orders dataset must provide.
pub const ORDERS_REQUIRED: &[&str] = &[
    field::ORDER_ID,
    field::ORDER_STATUS,
    field::ORDER_PURCHASE_TIMESTAMP,
];

/// Columns the order-items dataset must provide.
pub const ORDER_ITEMS_REQUIRED: &[&str] = &[field::ORDER_ID, field::PRODUCT_ID];

/// Arrow type of the purchase timestamp after loading.
pub fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into()))
}

/// Schema of the joined (item, order) pairs fed into the aggregator.
///
/// The timestamp stays nullable here: unparseable source values survive
/// as NULL until the aggregator rejects them, so they are never silently
/// dropped by an earlier stage.
pub fn joined_schema() -> Arc<Schema> {
    static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(Schema::new(vec![
            Field::new(field::ORDER_ID, DataType::Utf8, false),
            Field::new(field::PRODUCT_ID, DataType::Utf8, true),
            Field::new(field::ORDER_PURCHASE_TIMESTAMP, timestamp_type(), true),
        ]))
    }))
}

/// Schema of the weekly aggregate produced by
/// [`crate::aggregate::weekly_order_counts`].
pub fn weekly_aggregate_schema() -> Arc<Schema> {
    static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(Schema::new(vec![
            Field::new(field::PRODUCT_ID, DataType::Utf8, false),
            Field::new(field::WEEK_START, DataType::Date32, false),
            Field::new(field::ORDER_COUNT, DataType::UInt64, false),
        ]))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_aggregate_schema_columns() {
        let schema = weekly_aggregate_schema();
        assert_eq!(schema.fields().len(), 3);
        assert_eq!(schema.field(0).name(), field::PRODUCT_ID);
        assert_eq!(schema.field(1).name(), field::WEEK_START);
        assert_eq!(schema.field(2).name(), field::ORDER_COUNT);
        assert_eq!(schema.field(1).data_type(), &DataType::Date32);
    }

    #[test]
    fn joined_timestamp_is_nullable() {
        let schema = joined_schema();
        assert!(schema.field(2).is_nullable());
        assert!(!schema.field(0).is_nullable());
    }
}
