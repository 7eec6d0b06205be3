//! Query configurations loaded from YAML.
//!
//! ```yaml
//! natural_language: Tax lawyer with corporate experience
//! hard_criteria:
//!   - JD degree from an accredited U.S. law school
//! soft_criteria:
//!   - Experience advising clients on tax implications
//! ```

mod error;


use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::QueryConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// One search query with its hard and soft criteria.
pub struct QueryConfig {
    #[serde(default)]
    pub natural_language: String,
    /// Must-haves.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hard_criteria: Vec<String>,
    /// Nice-to-haves.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub soft_criteria: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl QueryConfig {
    pub fn new(natural_language: impl Into<String>) -> Self {
        Self {
            natural_language: natural_language.into(),
            ..Default::default()
        }
    }

    pub fn with_hard_criteria(mut self, criteria: Vec<String>) -> Self {
        self.hard_criteria = criteria;
        self
    }

    pub fn with_soft_criteria(mut self, criteria: Vec<String>) -> Self {
        self.soft_criteria = criteria;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, QueryConfigError> {
        // An empty document deserializes as null.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| QueryConfigError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, QueryConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| QueryConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_yaml_str(&text).map_err(|e| match e {
            QueryConfigError::Parse { message, .. } => QueryConfigError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })?;

        debug!(
            path = %path.display(),
            hard = config.hard_criteria.len(),
            soft = config.soft_criteria.len(),
            "Loaded query config"
        );
        Ok(config)
    }
}

/// File-name component of a config path; the evaluation API knows configs by it.
pub fn config_file_name(path: &Path) -> Result<String, QueryConfigError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| QueryConfigError::InvalidPath {
            path: path.to_path_buf(),
        })
}

/// `.yml`/`.yaml` files directly inside `dir`, sorted by name.
pub fn discover_configs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, QueryConfigError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|source| QueryConfigError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("yml") || e.eq_ignore_ascii_case("yaml"))
        })
        .collect();
    paths.sort();
    Ok(paths)
}
