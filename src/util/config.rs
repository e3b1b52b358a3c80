//! Configuration file support for qtpack.
//!
//! qtpack reads two configuration file locations:
//! - Global: `~/.qtpack/config.toml` - User-wide defaults
//! - Project: `.qtpack/config.toml` - Build-directory overrides
//!
//! Project config takes precedence over global config. Option defaults in
//! `[options]` sit below `-o name=value` pairs given on the command line.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// qtpack configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Raw package option defaults (e.g., `shared = "False"`)
    pub options: BTreeMap<String, String>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Default number of parallel jobs (None = auto-detect)
    pub jobs: Option<usize>,

    /// Install prefix passed to configure
    pub install_prefix: Option<PathBuf>,

    /// Directory holding the checkout and the default install prefix
    pub build_root: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = crate::util::fs::read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.install_prefix.is_some() {
            self.build.install_prefix = other.build.install_prefix;
        }
        if other.build.build_root.is_some() {
            self.build.build_root = other.build.build_root;
        }

        // Options merge key by key
        self.options.extend(other.options);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.qtpack/config.toml)
/// 2. Global config (~/.qtpack/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global qtpack config directory (~/.qtpack).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".qtpack"))
}

/// Get the project config path (.qtpack/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".qtpack").join("config.toml")
}
