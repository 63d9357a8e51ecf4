// Environment-variable overrides
//
// One flat ORDERS2PARQUET_* variable per configuration field. The env
// source is a trait so tests can inject values without touching process
// state.

use crate::RuntimeConfig;

pub(crate) const ENV_PREFIX: &str = "ORDERS2PARQUET_";

pub(crate) trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

pub(crate) fn apply_env_overrides(config: &mut RuntimeConfig, env: &dyn EnvSource) {
    if let Some(v) = env.get("ORDERS_PATH") {
        config.sources.orders_path = v;
    }
    if let Some(v) = env.get("ORDER_ITEMS_PATH") {
        config.sources.order_items_path = v;
    }
    if let Some(v) = env.get("OUTPUT_PATH") {
        config.output.path = v;
    }
    if let Some(v) = env.get("STATUS_FILTER") {
        config.filter.order_status = v;
    }
    if let Some(v) = env.get("ENGINE") {
        config.output.engine = v;
    }
    if let Some(v) = env.get("PARTITION_COLS") {
        config.output.partition_cols = v
            .split(',')
            .map(|col| col.trim().to_string())
            .filter(|col| !col.is_empty())
            .collect();
    }
    if let Some(v) = env.get("LOG_LEVEL") {
        config.logging.level = v;
    }
    if let Some(v) = env.get("LOG_FILE") {
        config.logging.file = Some(v);
    }
}
