// Configuration source loading
//
// Priority order (highest last so later sources overwrite):
// 1. Built-in defaults
// 2. TOML config file (ORDERS2PARQUET_CONFIG path, then default locations)
// 3. Environment variables (ORDERS2PARQUET_* prefix)
//
// CLI overrides are applied by the caller on top of the result.

use crate::env_overrides::{self, EnvSource};
use crate::RuntimeConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

const DEFAULT_LOCATIONS: &[&str] = &["./orders2parquet.toml", "./.orders2parquet.toml"];

/// Load configuration from the default file locations and the environment.
/// Missing files are not an error; defaults fill the gaps.
pub fn load_config() -> Result<RuntimeConfig> {
    let mut config = match load_from_default_locations()? {
        Some(file_config) => file_config,
        None => RuntimeConfig::default(),
    };
    env_overrides::apply_env_overrides(&mut config, &StdEnvSource);
    Ok(config)
}

/// Load configuration from an explicit file path (CLI `--config` flag).
/// Unlike [`load_config`], a missing or unparseable file is an error.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let path = path.as_ref();
    let mut config = read_file(path)?;
    env_overrides::apply_env_overrides(&mut config, &StdEnvSource);
    Ok(config)
}

fn load_from_default_locations() -> Result<Option<RuntimeConfig>> {
    if let Ok(path) = env::var("ORDERS2PARQUET_CONFIG") {
        return read_file(Path::new(&path)).map(Some);
    }

    for path in DEFAULT_LOCATIONS {
        if Path::new(path).exists() {
            return read_file(Path::new(path)).map(Some);
        }
    }

    Ok(None)
}

fn read_file(path: &Path) -> Result<RuntimeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", env_overrides::ENV_PREFIX, key)).ok()
    }
}
