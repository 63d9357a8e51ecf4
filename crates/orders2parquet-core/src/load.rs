//! CSV ingestion for the two source datasets
//!
//! Every column is read as a nullable string first, so one malformed value
//! cannot abort the load. The purchase timestamp is then converted to a
//! typed column with NULL marking values that failed to parse; whether a
//! NULL timestamp is fatal is the aggregator's call, not the loader's.

use crate::error::{CoreError, Result};
use crate::schema::{field, timestamp_type, ORDERS_REQUIRED, ORDER_ITEMS_REQUIRED};
use arrow::array::{ArrayRef, RecordBatch, StringArray, TimestampMicrosecondArray};
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

const BATCH_SIZE: usize = 8192;

/// Read the orders dataset.
///
/// Requires `order_id`, `order_status` and `order_purchase_timestamp`
/// columns; the timestamp column comes back typed as
/// `Timestamp(Microsecond, UTC)`.
pub fn read_orders(path: &Path) -> Result<RecordBatch> {
    let batch = read_csv(path, "orders", ORDERS_REQUIRED)?;
    tracing::debug!(rows = batch.num_rows(), "loaded orders table");
    parse_timestamp_column(batch)
}

/// Read the order-items dataset. Requires `order_id` and `product_id`.
pub fn read_order_items(path: &Path) -> Result<RecordBatch> {
    let batch = read_csv(path, "order_items", ORDER_ITEMS_REQUIRED)?;
    tracing::debug!(rows = batch.num_rows(), "loaded order-items table");
    Ok(batch)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| CoreError::SourceNotFound {
        path: path.display().to_string(),
        source,
    })
}

fn csv_error(path: &Path) -> impl Fn(arrow::error::ArrowError) -> CoreError + '_ {
    move |source| CoreError::Csv {
        path: path.display().to_string(),
        source,
    }
}

fn read_csv(path: &Path, table: &str, required: &[&str]) -> Result<RecordBatch> {
    let mut file = open(path)?;

    // Only the header matters here; the inferred value types are discarded
    // in favor of reading everything as strings.
    let format = Format::default().with_header(true);
    let (inferred, _) = format
        .infer_schema(&mut file, Some(128))
        .map_err(csv_error(path))?;
    file.rewind().map_err(|source| CoreError::SourceNotFound {
        path: path.display().to_string(),
        source,
    })?;

    for column in required {
        if inferred.index_of(column).is_err() {
            return Err(CoreError::SchemaMismatch {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_format(format)
        .with_batch_size(BATCH_SIZE)
        .build(file)
        .map_err(csv_error(path))?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch.map_err(csv_error(path))?);
    }
    if batches.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }
    arrow::compute::concat_batches(&schema, &batches).map_err(csv_error(path))
}

/// Replace the string-typed purchase timestamp column with a
/// `Timestamp(Microsecond, UTC)` column. Unparseable or empty values
/// become NULL.
fn parse_timestamp_column(batch: RecordBatch) -> Result<RecordBatch> {
    let idx = crate::table::column_index(&batch, "orders", field::ORDER_PURCHASE_TIMESTAMP)?;
    let raw = batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| CoreError::SchemaMismatch {
            table: "orders".to_string(),
            column: field::ORDER_PURCHASE_TIMESTAMP.to_string(),
        })?;

    let parsed: TimestampMicrosecondArray = raw
        .iter()
        .map(|value| value.and_then(parse_timestamp_micros))
        .collect();
    let parsed = parsed.with_timezone("UTC");

    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    columns[idx] = Arc::new(parsed);

    let fields: Vec<Field> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| {
            if f.name() == field::ORDER_PURCHASE_TIMESTAMP {
                Field::new(f.name(), timestamp_type(), true)
            } else {
                f.as_ref().clone()
            }
        })
        .collect();

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(CoreError::from)
}

/// Parse a purchase timestamp into microseconds since the Unix epoch.
///
/// Accepts `2024-01-02 10:30:00`, the RFC 3339 `T` variant, and bare
/// dates. Returns `None` for anything else.
pub fn parse_timestamp_micros(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let datetime = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })?;
    Some(datetime.and_utc().timestamp_micros())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_orders_with_typed_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "orders.csv",
            "order_id,order_status,order_purchase_timestamp\n\
             o1,delivered,2024-01-02 10:30:00\n\
             o2,canceled,2024-01-03 11:00:00\n",
        );

        let batch = read_orders(&path).unwrap();
        assert_eq!(batch.num_rows(), 2);

        let ts = crate::table::timestamp_column(&batch, "orders", field::ORDER_PURCHASE_TIMESTAMP)
            .unwrap();
        assert_eq!(ts.null_count(), 0);
        assert_eq!(
            ts.value(0),
            parse_timestamp_micros("2024-01-02 10:30:00").unwrap()
        );
    }

    #[test]
    fn unparseable_timestamp_loads_as_null() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "orders.csv",
            "order_id,order_status,order_purchase_timestamp\n\
             o1,delivered,not-a-date\n",
        );

        let batch = read_orders(&path).unwrap();
        let ts = crate::table::timestamp_column(&batch, "orders", field::ORDER_PURCHASE_TIMESTAMP)
            .unwrap();
        assert_eq!(ts.null_count(), 1);
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_orders(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, CoreError::SourceNotFound { .. }));
    }

    #[test]
    fn missing_required_column_is_schema_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "items.csv", "order_id,price\no1,10.0\n");

        let err = read_order_items(&path).unwrap_err();
        match err {
            CoreError::SchemaMismatch { table, column } => {
                assert_eq!(table, "order_items");
                assert_eq!(column, field::PRODUCT_ID);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "items.csv", "order_id,product_id\n");

        let batch = read_order_items(&path).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 2);
    }

    #[test]
    fn extra_columns_are_preserved_by_the_loader() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "items.csv",
            "order_id,order_item_id,product_id,price\no1,1,p1,58.9\n",
        );

        let batch = read_order_items(&path).unwrap();
        assert_eq!(batch.num_columns(), 4);
        assert_eq!(batch.num_rows(), 1);
    }

    #[test]
    fn timestamp_formats() {
        assert_eq!(
            parse_timestamp_micros("2024-01-02 10:30:00"),
            parse_timestamp_micros("2024-01-02T10:30:00")
        );
        assert!(parse_timestamp_micros("2024-01-02").is_some());
        assert!(parse_timestamp_micros("").is_none());
        assert!(parse_timestamp_micros("02/01/2024").is_none());
    }
}
