// Configuration validation
//
// Runs once, after file, environment and CLI sources are merged.

use crate::RuntimeConfig;
use anyhow::{bail, Result};

// Partition columns must come from the aggregate's columns, and never all
// of them: order_count stays in the leaf files.
const PARTITIONABLE_COLUMNS: &[&str] = &["product_id", "week_start"];

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    if config.sources.orders_path.is_empty() {
        bail!("sources.orders_path must be set");
    }
    if config.sources.order_items_path.is_empty() {
        bail!("sources.order_items_path must be set");
    }
    if config.output.path.is_empty() {
        bail!("output.path must be set");
    }
    if config.output.engine.is_empty() {
        bail!("output.engine must be set");
    }
    if config.filter.order_status.is_empty() {
        bail!("filter.order_status must be set");
    }

    let mut seen = Vec::new();
    for column in &config.output.partition_cols {
        if !PARTITIONABLE_COLUMNS.contains(&column.as_str()) {
            bail!(
                "output.partition_cols: '{}' is not a partitionable column (allowed: {})",
                column,
                PARTITIONABLE_COLUMNS.join(", ")
            );
        }
        if seen.contains(&column) {
            bail!("output.partition_cols: '{}' listed twice", column);
        }
        seen.push(column);
    }

    if config.logging.level.is_empty() {
        bail!("logging.level must be set");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.sources.orders_path = "orders.csv".to_string();
        config.sources.order_items_path = "items.csv".to_string();
        config.output.path = "out".to_string();
        config
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn rejects_missing_paths() {
        let mut config = valid();
        config.sources.orders_path.clear();
        assert!(validate_config(&config).is_err());

        let mut config = valid();
        config.output.path.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_unknown_partition_column() {
        let mut config = valid();
        config.output.partition_cols = vec!["order_count".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_duplicate_partition_column() {
        let mut config = valid();
        config.output.partition_cols =
            vec!["product_id".to_string(), "product_id".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn accepts_both_partition_columns() {
        let mut config = valid();
        config.output.partition_cols =
            vec!["product_id".to_string(), "week_start".to_string()];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn accepts_empty_partition_cols() {
        let mut config = valid();
        config.output.partition_cols.clear();
        assert!(validate_config(&config).is_ok());
    }
}
