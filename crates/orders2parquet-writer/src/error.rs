//! Error types for partitioned output

use thiserror::Error;

/// Errors that can occur while writing or reading the partitioned dataset
#[derive(Debug, Error)]
pub enum WriterError {
    /// The requested storage engine is not recognized
    #[error("unsupported output engine '{engine}' (supported: parquet, ipc)")]
    UnsupportedEngine { engine: String },

    /// A configured partition column is not a column of the table
    #[error("partition column '{column}' is not a column of the output table")]
    UnknownPartitionColumn { column: String },

    /// I/O failure; surfaced, never retried
    #[error("write failed for '{path}': {source}")]
    WriteFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while reading the dataset back
    #[error("read failed for '{path}': {source}")]
    ReadFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Columnar encode/decode failure
    #[error("encode failed for '{path}': {message}")]
    Encode { path: String, message: String },
}

impl WriterError {
    pub(crate) fn write_failure(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn read_failure(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::ReadFailure {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn encode(path: &std::path::Path, message: impl ToString) -> Self {
        Self::Encode {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WriterError>;
