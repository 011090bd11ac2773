//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gradebook_core::Branch;

/// Top-level gradebook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradebookConfig {
    /// Curriculum JSON holding every branch.
    #[serde(default = "default_curriculum")]
    pub curriculum: PathBuf,
    /// Branch used when `--branch` is not given.
    #[serde(default = "default_branch")]
    pub default_branch: String,
    /// Output format used when `--format` is not given.
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_curriculum() -> PathBuf {
    PathBuf::from("Curriculums.json")
}
fn default_branch() -> String {
    "general".to_string()
}
fn default_format() -> String {
    "text".to_string()
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            curriculum: default_curriculum(),
            default_branch: default_branch(),
            default_format: default_format(),
        }
    }
}

impl GradebookConfig {
    /// Resolve the branch from a CLI override or the configured default.
    pub fn branch(&self, cli_override: Option<&str>) -> Result<Branch> {
        let name = cli_override.unwrap_or(&self.default_branch);
        Ok(name.parse::<Branch>()?)
    }

    /// Resolve the curriculum path from a CLI override or the configured path.
    pub fn curriculum_path(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override.unwrap_or_else(|| self.curriculum.clone())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `gradebook.toml` in the current directory
/// 2. `~/.config/gradebook/config.toml`
///
/// Environment variable overrides: `GRADEBOOK_CURRICULUM`, `GRADEBOOK_BRANCH`.
pub fn load_config_from(path: Option<&Path>) -> Result<GradebookConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradebook.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<GradebookConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradebookConfig::default(),
    };

    if let Ok(curriculum) = std::env::var("GRADEBOOK_CURRICULUM") {
        config.curriculum = PathBuf::from(curriculum);
    }
    if let Ok(branch) = std::env::var("GRADEBOOK_BRANCH") {
        config.default_branch = branch;
    }

    config.curriculum = PathBuf::from(resolve_env_vars(&config.curriculum.to_string_lossy()));
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradebook"))
}
