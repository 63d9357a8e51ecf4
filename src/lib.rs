// orders2parquet - weekly per-product order counts from raw order exports
//
// Reads an orders CSV and an order-items CSV, keeps the orders matching a
// configured status, joins the items against them, counts orders per
// product and ISO week, and writes the result as a partitioned columnar
// dataset. The binary in main.rs is a thin wrapper around
// [`pipeline::run_pipeline`].

pub mod pipeline;

pub use pipeline::{run_pipeline, PipelineError, RunSummary, Stage, StageError};
