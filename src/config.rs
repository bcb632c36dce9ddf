use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::types::{PoolOrder, PoolOrderKind};

pub const CONFIG_ENV_VAR: &str = "GROUP_ROTATION_CONFIG";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct RotationConfig {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub grouping: GroupingConfig,
}

impl RotationConfig {
    /// An explicit path must exist. Otherwise the env var and then the
    /// user config dir are tried, falling back to defaults when neither
    /// holds a file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let config_path = resolve_config_path();
        match config_path {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(RotationConfig::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let parsed: RotationConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse TOML from {}", path.display()))?;
        Ok(parsed)
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|base| base.join("group-rotation").join("config.toml"))
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_roster_path")]
    pub roster: PathBuf,
    #[serde(default = "default_state_path")]
    pub state: PathBuf,
    #[serde(default = "default_matrix_path")]
    pub matrix: PathBuf,
    #[serde(default = "default_report_path")]
    pub report: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            roster: default_roster_path(),
            state: default_state_path(),
            matrix: default_matrix_path(),
            report: default_report_path(),
        }
    }
}

fn default_roster_path() -> PathBuf {
    PathBuf::from("students.txt")
}

fn default_state_path() -> PathBuf {
    PathBuf::from("group_data.json")
}

fn default_matrix_path() -> PathBuf {
    PathBuf::from("pair_count_matrix.csv")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("group_assignments.txt")
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GroupingConfig {
    #[serde(default = "default_group_size")]
    pub group_size: usize,
    #[serde(default)]
    pub pool_order: PoolOrderKind,
    #[serde(default)]
    pub seed: u64,
}

impl GroupingConfig {
    pub fn pool_order(&self) -> PoolOrder {
        self.pool_order.with_seed(self.seed)
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            group_size: default_group_size(),
            pool_order: PoolOrderKind::default(),
            seed: 0,
        }
    }
}

fn default_group_size() -> usize {
    4
}
