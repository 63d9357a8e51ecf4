//! Pipeline orchestration
//!
//! Sequences load → filter → project → join → aggregate → write, each
//! stage fully materialized before the next. The first failing stage
//! halts the run; its error is wrapped with the stage name so the binary
//! can map it to an exit code. There is no partial-output cleanup.

use orders2parquet_config::RuntimeConfig;
use orders2parquet_core::{aggregate, filter, join, load, project, CoreError};
use orders2parquet_writer::{write_partitioned, OutputEngine, WriterError};
use std::path::Path;
use thiserror::Error;

/// Pipeline stage names, used for error annotation and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Filter,
    Project,
    Join,
    Aggregate,
    Write,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::Filter => "filter",
            Stage::Project => "project",
            Stage::Join => "join",
            Stage::Aggregate => "aggregate",
            Stage::Write => "write",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage failure with its originating error attached.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Writer(#[from] WriterError),
}

impl PipelineError {
    fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// Process exit code for this failure, one per error kind.
    pub fn exit_code(&self) -> i32 {
        match &self.source {
            StageError::Core(err) => match err {
                CoreError::SourceNotFound { .. } => 10,
                CoreError::SchemaMismatch { .. } | CoreError::Csv { .. } => 11,
                CoreError::InvalidFilterValue { .. } => 12,
                CoreError::DuplicateOrderId { .. } => 13,
                CoreError::MissingTimestamp { .. } => 14,
                CoreError::MissingProductId { .. } => 18,
                CoreError::Arrow(_) => 1,
            },
            StageError::Writer(err) => match err {
                WriterError::UnsupportedEngine { .. } => 15,
                WriterError::UnknownPartitionColumn { .. } => 16,
                WriterError::WriteFailure { .. }
                | WriterError::ReadFailure { .. }
                | WriterError::Encode { .. } => 17,
            },
        }
    }
}

/// Row counts observed at each stage, for logging.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub order_rows: usize,
    pub filtered_rows: usize,
    pub item_rows: usize,
    pub joined_rows: usize,
    pub aggregate_rows: usize,
    pub files_written: usize,
}

/// Run the whole pipeline against a resolved configuration.
pub fn run_pipeline(config: &RuntimeConfig) -> Result<RunSummary, PipelineError> {
    // Resolve the engine before touching any data so a bad engine fails
    // without side effects.
    let engine: OutputEngine = config
        .output
        .engine
        .parse()
        .map_err(|e: WriterError| PipelineError::new(Stage::Write, e))?;

    tracing::info!(
        orders = %config.sources.orders_path,
        order_items = %config.sources.order_items_path,
        "loading source tables"
    );
    let orders = load::read_orders(Path::new(&config.sources.orders_path))
        .map_err(|e| PipelineError::new(Stage::Load, e))?;
    let items = load::read_order_items(Path::new(&config.sources.order_items_path))
        .map_err(|e| PipelineError::new(Stage::Load, e))?;

    tracing::info!(status = %config.filter.order_status, "filtering orders by status");
    let filtered = filter::filter_by_status(&orders, &config.filter.order_status)
        .map_err(|e| PipelineError::new(Stage::Filter, e))?;

    let projected = project::project_order_columns(&filtered)
        .map_err(|e| PipelineError::new(Stage::Project, e))?;

    tracing::info!("joining order items with filtered orders");
    let joined = join::join_items_with_orders(&items, &projected)
        .map_err(|e| PipelineError::new(Stage::Join, e))?;

    tracing::info!("aggregating weekly order counts");
    let weekly = aggregate::weekly_order_counts(&joined)
        .map_err(|e| PipelineError::new(Stage::Aggregate, e))?;

    tracing::info!(dest = %config.output.path, %engine, "writing partitioned output");
    let written = write_partitioned(
        &weekly,
        Path::new(&config.output.path),
        engine,
        &config.output.partition_cols,
    )
    .map_err(|e| PipelineError::new(Stage::Write, e))?;

    let summary = RunSummary {
        order_rows: orders.num_rows(),
        filtered_rows: filtered.num_rows(),
        item_rows: items.num_rows(),
        joined_rows: joined.num_rows(),
        aggregate_rows: weekly.num_rows(),
        files_written: written.len(),
    };
    tracing::info!(
        orders = summary.order_rows,
        filtered = summary.filtered_rows,
        joined = summary.joined_rows,
        groups = summary.aggregate_rows,
        files = summary.files_written,
        "pipeline completed"
    );
    Ok(summary)
}
