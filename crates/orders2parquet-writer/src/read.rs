//! Read-back of a partitioned dataset
//!
//! Walks the directory tree written by [`crate::write_partitioned`],
//! decodes every leaf file and re-attaches the partition columns from the
//! directory keys. Partition values come back as strings (the directory
//! key carries no type); leaf columns keep their original types.

use crate::engine::OutputEngine;
use crate::error::{Result, WriterError};
use crate::partition::NULL_PARTITION;
use arrow::array::{ArrayRef, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Read every leaf of the partitioned dataset under `dest`.
///
/// Returns one batch per leaf file, partition columns appended after the
/// leaf columns, in deterministic (sorted path) order.
pub fn read_partitioned(dest: &Path, engine: OutputEngine) -> Result<Vec<RecordBatch>> {
    let mut batches = Vec::new();
    let mut key_stack = Vec::new();
    visit(dest, engine, &mut key_stack, &mut batches)?;
    Ok(batches)
}

fn visit(
    dir: &Path,
    engine: OutputEngine,
    key_stack: &mut Vec<(String, String)>,
    out: &mut Vec<RecordBatch>,
) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| WriterError::read_failure(dir, e))?
        .collect::<std::io::Result<_>>()
        .map_err(|e| WriterError::read_failure(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name().to_string_lossy().into_owned();
            match name.split_once('=') {
                Some((column, value)) => {
                    key_stack.push((column.to_string(), value.to_string()));
                    visit(&path, engine, key_stack, out)?;
                    key_stack.pop();
                }
                None => visit(&path, engine, key_stack, out)?,
            }
        } else if path.extension().and_then(|ext| ext.to_str())
            == Some(engine.file_extension())
        {
            let leaf = read_leaf(&path, engine)?;
            out.push(attach_partition_columns(leaf, key_stack, &path)?);
        }
    }
    Ok(())
}

fn read_leaf(path: &Path, engine: OutputEngine) -> Result<RecordBatch> {
    let file = File::open(path).map_err(|e| WriterError::read_failure(path, e))?;
    let (schema, batches) = match engine {
        OutputEngine::Parquet => {
            let builder = ParquetRecordBatchReaderBuilder::try_new(file)
                .map_err(|e| WriterError::encode(path, e))?;
            let schema = Arc::clone(builder.schema());
            let reader = builder.build().map_err(|e| WriterError::encode(path, e))?;
            let batches = reader
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| WriterError::encode(path, e))?;
            (schema, batches)
        }
        OutputEngine::Ipc => {
            let reader = arrow::ipc::reader::FileReader::try_new(file, None)
                .map_err(|e| WriterError::encode(path, e))?;
            let schema = reader.schema();
            let batches = reader
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| WriterError::encode(path, e))?;
            (schema, batches)
        }
    };

    if batches.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }
    arrow::compute::concat_batches(&schema, &batches)
        .map_err(|e| WriterError::encode(path, e))
}

fn attach_partition_columns(
    leaf: RecordBatch,
    key_stack: &[(String, String)],
    path: &Path,
) -> Result<RecordBatch> {
    if key_stack.is_empty() {
        return Ok(leaf);
    }

    let rows = leaf.num_rows();
    let mut fields: Vec<Field> = leaf
        .schema()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    let mut columns: Vec<ArrayRef> = leaf.columns().to_vec();

    for (column, value) in key_stack {
        let cell = (value != NULL_PARTITION).then_some(value.as_str());
        let array: StringArray = std::iter::repeat(cell).take(rows).collect();
        fields.push(Field::new(column, DataType::Utf8, true));
        columns.push(Arc::new(array));
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .map_err(|e| WriterError::encode(path, e))
}
