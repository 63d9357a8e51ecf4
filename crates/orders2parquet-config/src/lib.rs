// orders2parquet-config - runtime configuration for the pipeline
//
// Sources, in priority order:
// 1. CLI overrides (collected by the binary, applied last)
// 2. Environment variables (ORDERS2PARQUET_* prefix)
// 3. TOML config file (--config flag, or ./orders2parquet.toml,
//    ./.orders2parquet.toml)
// 4. Built-in defaults
//
// Loading does not validate; the binary validates once after the CLI
// overrides are merged in.

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod env_overrides;
mod sources;
mod validation;

pub use sources::{load_config, load_from_file_path};

/// Fully resolved pipeline parameters. One immutable value per run; no
/// ambient state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Paths of the two source datasets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub orders_path: String,
    #[serde(default)]
    pub order_items_path: String,
}

/// Output destination, engine and partitioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_partition_cols")]
    pub partition_cols: Vec<String>,
}

fn default_engine() -> String {
    "parquet".to_string()
}

fn default_partition_cols() -> Vec<String> {
    vec!["product_id".to_string()]
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            engine: default_engine(),
            partition_cols: default_partition_cols(),
        }
    }
}

/// Order-status filter applied before the join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_order_status")]
    pub order_status: String,
}

fn default_order_status() -> String {
    "delivered".to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            order_status: default_order_status(),
        }
    }
}

/// Logging parameters consumed by the binary, not by the core stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Field-by-field overrides collected from the command line. A set field
/// wins over file and environment values.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub orders_path: Option<String>,
    pub order_items_path: Option<String>,
    pub output_path: Option<String>,
    pub order_status: Option<String>,
    pub engine: Option<String>,
    pub partition_cols: Option<Vec<String>>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl RuntimeConfig {
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(v) = &overrides.orders_path {
            self.sources.orders_path = v.clone();
        }
        if let Some(v) = &overrides.order_items_path {
            self.sources.order_items_path = v.clone();
        }
        if let Some(v) = &overrides.output_path {
            self.output.path = v.clone();
        }
        if let Some(v) = &overrides.order_status {
            self.filter.order_status = v.clone();
        }
        if let Some(v) = &overrides.engine {
            self.output.engine = v.clone();
        }
        if let Some(v) = &overrides.partition_cols {
            self.output.partition_cols = v.clone();
        }
        if let Some(v) = &overrides.log_level {
            self.logging.level = v.clone();
        }
        if let Some(v) = &overrides.log_file {
            self.logging.file = Some(v.clone());
        }
    }

    /// Validate the fully merged configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
