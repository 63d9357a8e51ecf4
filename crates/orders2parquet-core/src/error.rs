//! Error types for the core pipeline stages
//!
//! Each stage validates its own preconditions and fails with a specific
//! kind; nothing is coerced to defaults and nothing is retried.

use thiserror::Error;

/// Errors produced by the core transformation stages
#[derive(Debug, Error)]
pub enum CoreError {
    /// Source file missing or unreadable
    #[error("source not found or unreadable: '{path}': {source}")]
    SourceNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from a source table
    #[error("schema mismatch in {table}: required column '{column}' is missing")]
    SchemaMismatch { table: String, column: String },

    /// The status column the filter keys on is absent
    #[error("invalid filter: column '{column}' is absent from the orders table")]
    InvalidFilterValue { column: String },

    /// Orders-side join key appeared more than once; joining would
    /// silently multiply item rows
    #[error("duplicate order id '{order_id}' on the orders side of the join")]
    DuplicateOrderId { order_id: String },

    /// A joined row reached the aggregator without a parseable purchase
    /// timestamp
    #[error("missing or unparseable purchase timestamp for order '{order_id}' (row {row})")]
    MissingTimestamp { order_id: String, row: usize },

    /// A joined row reached the aggregator without a product id; grouping
    /// it would invent a product
    #[error("missing product id for order '{order_id}' (row {row})")]
    MissingProductId { order_id: String, row: usize },

    /// CSV decoding failed (malformed rows, bad encoding)
    #[error("csv decode failed for '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: arrow::error::ArrowError,
    },

    /// Arrow kernel failure while assembling a batch
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
