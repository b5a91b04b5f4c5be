use crate::query::{DEFAULT_MAX_DEPTH, QueryOptions};
use crate::store::DEFAULT_INDENT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub storage: StorageConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file holding every collection
    pub path: PathBuf,
    /// Spaces per indentation level when the file is rewritten
    pub indent: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/database.json"),
            indent: DEFAULT_INDENT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Deepest allowed nesting of parenthesized groups in a query
    pub max_depth: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl QueryConfig {
    pub fn options(&self) -> QueryOptions {
        QueryOptions::new().max_depth(self.max_depth)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<DbConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<DbConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<DbConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static DbConfig {
    static DEFAULT_CONFIG: LazyLock<DbConfig> = LazyLock::new(DbConfig::default);
    &DEFAULT_CONFIG
}
