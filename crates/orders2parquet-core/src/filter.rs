//! Status filtering over the orders table

use crate::error::{CoreError, Result};
use crate::schema::field;
use arrow::array::{BooleanArray, RecordBatch, StringArray};
use arrow::compute::filter_record_batch;

/// Keep the orders whose status equals `status` exactly (case-sensitive).
///
/// An empty result is valid and flows downstream as an empty table. The
/// only failure mode is the status column itself being absent.
pub fn filter_by_status(orders: &RecordBatch, status: &str) -> Result<RecordBatch> {
    let idx = orders
        .schema()
        .index_of(field::ORDER_STATUS)
        .map_err(|_| CoreError::InvalidFilterValue {
            column: field::ORDER_STATUS.to_string(),
        })?;
    let statuses = orders
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| CoreError::InvalidFilterValue {
            column: field::ORDER_STATUS.to_string(),
        })?;

    // NULL status never matches.
    let mask: BooleanArray = statuses
        .iter()
        .map(|value| Some(value == Some(status)))
        .collect();

    let filtered = filter_record_batch(orders, &mask)?;
    tracing::debug!(
        input = orders.num_rows(),
        kept = filtered.num_rows(),
        status,
        "filtered orders by status"
    );
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn orders(rows: &[(&str, &str)]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new(field::ORDER_ID, DataType::Utf8, true),
            Field::new(field::ORDER_STATUS, DataType::Utf8, true),
        ]));
        let ids: StringArray = rows.iter().map(|(id, _)| Some(*id)).collect();
        let statuses: StringArray = rows.iter().map(|(_, s)| Some(*s)).collect();
        RecordBatch::try_new(schema, vec![Arc::new(ids), Arc::new(statuses)]).unwrap()
    }

    #[test]
    fn keeps_only_matching_status() {
        let batch = orders(&[
            ("o1", "delivered"),
            ("o2", "canceled"),
            ("o3", "delivered"),
        ]);

        let filtered = filter_by_status(&batch, "delivered").unwrap();
        assert_eq!(filtered.num_rows(), 2);

        let statuses = crate::table::string_column(&filtered, "orders", field::ORDER_STATUS)
            .unwrap();
        for row in 0..filtered.num_rows() {
            assert_eq!(statuses.value(row), "delivered");
        }
    }

    #[test]
    fn match_is_case_sensitive() {
        let batch = orders(&[("o1", "Delivered")]);
        let filtered = filter_by_status(&batch, "delivered").unwrap();
        assert_eq!(filtered.num_rows(), 0);
    }

    #[test]
    fn unmatched_value_yields_empty_not_error() {
        let batch = orders(&[("o1", "delivered")]);
        let filtered = filter_by_status(&batch, "shipped").unwrap();
        assert_eq!(filtered.num_rows(), 0);
    }

    #[test]
    fn missing_status_column_is_invalid_filter() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            field::ORDER_ID,
            DataType::Utf8,
            true,
        )]));
        let ids: StringArray = [Some("o1")].into_iter().collect();
        let batch = RecordBatch::try_new(schema, vec![Arc::new(ids)]).unwrap();

        let err = filter_by_status(&batch, "delivered").unwrap_err();
        assert!(matches!(err, CoreError::InvalidFilterValue { .. }));
    }
}
