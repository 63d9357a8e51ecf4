// CLI entry point
//
// Thin wrapper around the core: resolve configuration (file, environment,
// flags), set up logging, run the pipeline, map failures to exit codes.
// Configuration and CLI errors exit 2; pipeline failures exit with the
// code of their error kind.

use anyhow::{Context, Result};
use clap::Parser;
use orders2parquet::run_pipeline;
use orders2parquet_config::{
    load_config, load_from_file_path, ConfigOverrides, LoggingConfig, RuntimeConfig,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "orders2parquet",
    about = "Weekly per-product order counts from raw order exports"
)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the orders dataset CSV file
    #[arg(long)]
    orders_path: Option<String>,

    /// Path to the order-items dataset CSV file
    #[arg(long)]
    order_items_path: Option<String>,

    /// Destination directory for the partitioned output
    #[arg(long)]
    output_path: Option<String>,

    /// Keep only orders with this status
    #[arg(long)]
    status_filter: Option<String>,

    /// Output engine: parquet or ipc
    #[arg(long)]
    engine: Option<String>,

    /// Partition columns, comma separated
    #[arg(long, value_delimiter = ',')]
    partition_cols: Option<Vec<String>>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err:#}");
            std::process::exit(2);
        }
    };

    if let Err(err) = init_logging(&config.logging) {
        eprintln!("logging setup failed: {err:#}");
        std::process::exit(2);
    }

    match run_pipeline(&config) {
        Ok(summary) => {
            tracing::info!(
                groups = summary.aggregate_rows,
                files = summary.files_written,
                "done"
            );
        }
        Err(err) => {
            tracing::error!(stage = %err.stage, "{err:#}");
            std::process::exit(err.exit_code());
        }
    }
}

fn resolve_config(args: &Args) -> Result<RuntimeConfig> {
    let mut config = match &args.config {
        Some(path) => load_from_file_path(path)?,
        None => load_config()?,
    };

    config.apply_overrides(&ConfigOverrides {
        orders_path: args.orders_path.clone(),
        order_items_path: args.order_items_path.clone(),
        output_path: args.output_path.clone(),
        order_status: args.status_filter.clone(),
        engine: args.engine.clone(),
        partition_cols: args.partition_cols.clone(),
        log_level: args.log_level.clone(),
        log_file: args
            .log_file
            .as_ref()
            .map(|path| path.display().to_string()),
    });

    config.validate()?;
    Ok(config)
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    // RUST_LOG wins over the configured level, matching the usual
    // env-filter convention.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match &logging.file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create log file: {path}"))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
