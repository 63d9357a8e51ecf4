// orders2parquet-core - transformation stages for the weekly order-count pipeline
//
// load → filter → project → join → aggregate, in that order. Every stage
// takes fully materialized Arrow record batches and returns a new one;
// there is no streaming between stages and no shared mutable state.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod join;
pub mod load;
pub mod project;
pub mod schema;

mod table;

pub use error::{CoreError, Result};
