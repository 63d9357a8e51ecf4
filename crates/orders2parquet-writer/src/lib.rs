// orders2parquet-writer - partitioned columnar output
//
// Splits a record batch by the distinct values of its partition columns
// and writes one Hive-style directory tree per combination, with the
// partition columns encoded in the directory key and dropped from the
// leaf files. Parquet and Arrow IPC leaf formats are supported.

mod encoding;
mod engine;
mod error;
mod partition;
mod read;
mod write;

pub use engine::OutputEngine;
pub use error::{Result, WriterError};
pub use read::read_partitioned;
pub use write::write_partitioned;
