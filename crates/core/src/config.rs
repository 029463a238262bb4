//! Configuration file parsing for .ripple.toml

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Ordered specifier-prefix -> project-relative path-prefix table
pub type PathAliases = IndexMap<String, String>;

/// File name searched for in the project root and its ancestors
pub const CONFIG_FILE_NAME: &str = ".ripple.toml";

/// Errors raised while loading or validating configuration.
///
/// These are fatal at startup: no analysis runs on an invalid configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config: {0}")]
    Write(#[source] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Project root {0} is not a readable directory")]
    ProjectRoot(PathBuf),
}

/// Main configuration structure for .ripple.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RippleConfig {
    #[serde(default)]
    pub impact: ImpactConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// Caller expansion depth; 0 means direct callers only
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Suffixes appended to a resolved import base, tried in order after the exact path
    #[serde(default = "default_import_extensions")]
    pub extensions: Vec<String>,

    /// Specifier prefix -> project-relative path prefix (longest prefix wins)
    #[serde(default)]
    pub path_aliases: PathAliases,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File extensions the enumerator picks up
    #[serde(default = "default_scan_extensions")]
    pub extensions: Vec<String>,

    /// Extra gitignore-style patterns to skip
    #[serde(default = "default_ignore_paths")]
    pub ignore: Vec<String>,
}

// Default functions
fn default_max_depth() -> usize {
    5
}

fn default_import_extensions() -> Vec<String> {
    [
        ".ts",
        ".tsx",
        ".js",
        ".jsx",
        "/index.ts",
        "/index.tsx",
        "/index.js",
        "/index.jsx",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_scan_extensions() -> Vec<String> {
    vec![
        ".ts".to_string(),
        ".tsx".to_string(),
        ".js".to_string(),
        ".jsx".to_string(),
    ]
}

fn default_ignore_paths() -> Vec<String> {
    vec![
        "node_modules/".to_string(),
        "dist/".to_string(),
        "build/".to_string(),
        "coverage/".to_string(),
    ]
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            extensions: default_import_extensions(),
            path_aliases: PathAliases::new(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_scan_extensions(),
            ignore: default_ignore_paths(),
        }
    }
}

impl RippleConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: RippleConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents, path)
    }

    /// Find and load .ripple.toml from the given directory or its ancestors
    pub fn find_and_load(start_dir: &Path) -> Result<Self, ConfigError> {
        let mut current = start_dir;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                tracing::debug!(path = %config_path.display(), "loading config");
                return Self::from_file(&config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(ConfigError::Write)?;
        Ok(())
    }

    /// Reject values no analysis can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "scan.extensions must list at least one extension".to_string(),
            ));
        }

        if let Some(ext) = self.scan.extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(ConfigError::Invalid(format!(
                "scan extension {:?} must start with '.'",
                ext
            )));
        }

        if self.resolve.extensions.iter().any(|e| e.is_empty()) {
            return Err(ConfigError::Invalid(
                "resolve.extensions must not contain empty entries".to_string(),
            ));
        }

        if self.resolve.path_aliases.keys().any(|prefix| prefix.is_empty()) {
            return Err(ConfigError::Invalid(
                "resolve.path_aliases prefixes must be non-empty".to_string(),
            ));
        }

        Ok(())
    }
}
