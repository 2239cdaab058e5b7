//! Configuration loading, validation, and management for skymem.
//!
//! Loads configuration from `~/.skymem/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! Every component that scores or scans content reads the promote threshold
//! from here — there is exactly one threshold value in the system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.skymem/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkymemConfig {
    /// Directory holding the stream files and archives
    #[serde(default = "default_memory_dir")]
    pub memory_dir: PathBuf,

    /// Retention and promotion settings
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Indexing collaborator settings
    #[serde(default)]
    pub indexer: IndexerConfig,

    /// Authority gate settings
    #[serde(default)]
    pub authority: AuthorityConfig,
}

fn default_memory_dir() -> PathBuf {
    dirs_home().join(".skymem").join("memory")
}

/// Retention and promotion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Records with importance at or above this are long-term material.
    /// Shared by write-time scoring, promotion scanning, and the
    /// explicit-long floor.
    #[serde(default = "default_promote_threshold")]
    pub promote_threshold: f64,

    /// Short-term entries kept after promotion before rotation archives
    /// the oldest overflow.
    #[serde(default = "default_short_term_max_lines")]
    pub short_term_max_lines: usize,
}

fn default_promote_threshold() -> f64 {
    0.7
}
fn default_short_term_max_lines() -> usize {
    5000
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            promote_threshold: default_promote_threshold(),
            short_term_max_lines: default_short_term_max_lines(),
        }
    }
}

/// Indexing collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Which indexer to wire in ("noop" until an embedding backend exists)
    #[serde(default = "default_indexer_backend")]
    pub backend: String,

    /// Bound on the best-effort forward call during promotion
    #[serde(default = "default_indexer_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_indexer_backend() -> String {
    "noop".into()
}
fn default_indexer_timeout_secs() -> u64 {
    10
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            backend: default_indexer_backend(),
            timeout_secs: default_indexer_timeout_secs(),
        }
    }
}

/// Authority gate settings.
///
/// Action names not present in either list are denied by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityConfig {
    /// Actions the agent may perform
    #[serde(default = "default_allowed_actions")]
    pub allowed_actions: Vec<String>,

    /// Actions that require an owner override
    #[serde(default)]
    pub restricted_actions: Vec<String>,
}

fn default_allowed_actions() -> Vec<String> {
    [
        "memory.write",
        "memory.remember",
        "memory.list",
        "memory.get",
        "memory.search",
        "memory.stats",
        "memory.promote",
        "memory.maintain",
        "memory.delete",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            allowed_actions: default_allowed_actions(),
            restricted_actions: vec![],
        }
    }
}

impl SkymemConfig {
    /// Load configuration from the default path (~/.skymem/config.toml).
    ///
    /// Environment overrides:
    /// - `SKYMEM_MEMORY_DIR` — relocate the stream files (highest priority)
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(dir) = std::env::var("SKYMEM_MEMORY_DIR") {
            config.memory_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".skymem")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.retention.promote_threshold) {
            return Err(ConfigError::ValidationError(
                "retention.promote_threshold must be between 0.0 and 1.0".into(),
            ));
        }

        if self.retention.short_term_max_lines == 0 {
            return Err(ConfigError::ValidationError(
                "retention.short_term_max_lines must be at least 1".into(),
            ));
        }

        if self.indexer.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "indexer.timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for SkymemConfig {
    fn default() -> Self {
        Self {
            memory_dir: default_memory_dir(),
            retention: RetentionConfig::default(),
            indexer: IndexerConfig::default(),
            authority: AuthorityConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
