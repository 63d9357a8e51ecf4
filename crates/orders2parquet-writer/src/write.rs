//! Partition splitting and leaf-file output

use crate::encoding::writer_properties;
use crate::engine::OutputEngine;
use crate::error::{Result, WriterError};
use crate::partition::{format_partition_value, partition_dir};
use arrow::array::{ArrayRef, RecordBatch, UInt32Array};
use arrow::compute::take;
use parquet::arrow::ArrowWriter;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Write `batch` under `dest` as a partitioned columnar dataset.
///
/// One directory tree per distinct combination of the partition column
/// values; partition columns are encoded in the directory key and dropped
/// from the leaf files. An empty partition set writes a single
/// unpartitioned leaf; an empty batch writes no leaves but still creates
/// `dest`. Returns the paths of the written leaf files.
pub fn write_partitioned(
    batch: &RecordBatch,
    dest: &Path,
    engine: OutputEngine,
    partition_cols: &[String],
) -> Result<Vec<PathBuf>> {
    let schema = batch.schema();
    let mut partition_indices = Vec::with_capacity(partition_cols.len());
    for column in partition_cols {
        let idx = schema.index_of(column).map_err(|_| {
            WriterError::UnknownPartitionColumn {
                column: column.clone(),
            }
        })?;
        partition_indices.push(idx);
    }
    let keep_indices: Vec<usize> = (0..schema.fields().len())
        .filter(|idx| !partition_indices.contains(idx))
        .collect();

    std::fs::create_dir_all(dest).map_err(|e| WriterError::write_failure(dest, e))?;

    if batch.num_rows() == 0 {
        tracing::debug!(dest = %dest.display(), "empty aggregate, nothing to write");
        return Ok(Vec::new());
    }

    let leaf_name = format!("part-00000.{}", engine.file_extension());

    if partition_indices.is_empty() {
        let path = dest.join(leaf_name);
        write_leaf(batch, &path, engine)?;
        return Ok(vec![path]);
    }

    // BTreeMap keeps directory creation order deterministic.
    let mut groups: BTreeMap<Vec<String>, Vec<u32>> = BTreeMap::new();
    for row in 0..batch.num_rows() {
        let mut key = Vec::with_capacity(partition_indices.len());
        for &idx in &partition_indices {
            key.push(format_partition_value(batch.column(idx), row, dest)?);
        }
        groups.entry(key).or_default().push(row as u32);
    }

    let mut written = Vec::with_capacity(groups.len());
    for (key, rows) in &groups {
        let indices = UInt32Array::from(rows.clone());
        let columns = batch
            .columns()
            .iter()
            .map(|column| take(column.as_ref(), &indices, None))
            .collect::<std::result::Result<Vec<ArrayRef>, _>>()
            .map_err(|e| WriterError::encode(dest, e))?;
        let subset = RecordBatch::try_new(batch.schema(), columns)
            .map_err(|e| WriterError::encode(dest, e))?;
        // Degenerate case: partitioning by every column would leave an
        // empty leaf schema, so the columns are kept in the files too.
        let leaf = if keep_indices.is_empty() {
            subset
        } else {
            subset
                .project(&keep_indices)
                .map_err(|e| WriterError::encode(dest, e))?
        };

        let dir = dest.join(partition_dir(partition_cols, key));
        std::fs::create_dir_all(&dir).map_err(|e| WriterError::write_failure(&dir, e))?;
        let path = dir.join(&leaf_name);
        write_leaf(&leaf, &path, engine)?;
        written.push(path);
    }

    tracing::info!(
        rows = batch.num_rows(),
        files = written.len(),
        dest = %dest.display(),
        %engine,
        "wrote partitioned dataset"
    );
    Ok(written)
}

fn write_leaf(batch: &RecordBatch, path: &Path, engine: OutputEngine) -> Result<()> {
    let file = File::create(path).map_err(|e| WriterError::write_failure(path, e))?;
    match engine {
        OutputEngine::Parquet => {
            let mut writer =
                ArrowWriter::try_new(file, batch.schema(), Some(writer_properties().clone()))
                    .map_err(|e| WriterError::encode(path, e))?;
            writer
                .write(batch)
                .map_err(|e| WriterError::encode(path, e))?;
            writer.close().map_err(|e| WriterError::encode(path, e))?;
        }
        OutputEngine::Ipc => {
            let schema = batch.schema();
            let mut writer = arrow::ipc::writer::FileWriter::try_new(file, &schema)
                .map_err(|e| WriterError::encode(path, e))?;
            writer
                .write(batch)
                .map_err(|e| WriterError::encode(path, e))?;
            writer
                .finish()
                .map_err(|e| WriterError::encode(path, e))?;
        }
    }
    tracing::debug!(rows = batch.num_rows(), path = %path.display(), "wrote leaf file");
    Ok(())
}
