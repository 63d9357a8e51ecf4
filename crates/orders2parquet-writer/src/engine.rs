//! Output engine selection

use crate::error::WriterError;
use std::str::FromStr;

/// Physical storage engine for the aggregated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEngine {
    /// Parquet with Snappy compression
    Parquet,
    /// Arrow IPC file format
    Ipc,
}

impl OutputEngine {
    pub fn file_extension(&self) -> &'static str {
        match self {
            OutputEngine::Parquet => "parquet",
            OutputEngine::Ipc => "arrow",
        }
    }
}

impl std::fmt::Display for OutputEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputEngine::Parquet => write!(f, "parquet"),
            OutputEngine::Ipc => write!(f, "ipc"),
        }
    }
}

impl FromStr for OutputEngine {
    type Err = WriterError;

    fn from_str(s: &str) -> Result<Self, WriterError> {
        match s.to_ascii_lowercase().as_str() {
            "parquet" => Ok(OutputEngine::Parquet),
            "ipc" | "arrow" | "feather" => Ok(OutputEngine::Ipc),
            _ => Err(WriterError::UnsupportedEngine {
                engine: s.to_string(),
            }),
        }
    }
}
