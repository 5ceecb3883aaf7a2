//! Category mapping and ignore-rule configuration.
//!
//! The configuration file drives classification: an ordered list of
//! categories, each claiming a set of extensions, plus optional ignore rules
//! excluding files from organization beyond the built-in hidden-name rule.
//! It is loaded fresh on every invocation; nothing is cached across calls.
//!
//! # Configuration File Format
//!
//! Configuration is stored in TOML format. Category order is significant:
//! the first category to claim an extension wins.
//!
//! ```toml
//! [[categories]]
//! name = "images"
//! extensions = ["jpg", "jpeg", "png", "gif"]
//!
//! [[categories]]
//! name = "docs"
//! extensions = ["pdf", "txt", "md"]
//!
//! [ignore]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.partial"]
//! extensions = ["tmp"]
//! regex = []
//! ```

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".refilerc.toml";

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at an explicitly requested path.
    ConfigNotFound(PathBuf),
    /// No configuration file exists at any of the searched locations.
    NoConfigFound,
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern in the ignore rules.
    InvalidGlobPattern(String),
    /// Invalid regex pattern in the ignore rules, with the compile error.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::NoConfigFound => {
                write!(
                    f,
                    "No configuration file found: expected {} in the current directory \
                     or ~/.config/refile/config.toml",
                    LOCAL_CONFIG_FILE
                )
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A single category rule: a name and the extensions it claims.
///
/// Extensions are written without a leading dot and matched
/// case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub extensions: Vec<String>,
}

/// The loaded configuration: ordered categories plus ignore rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category rules in declaration order. Order decides ties.
    pub categories: Vec<CategoryRule>,

    /// Files to exclude from organization. Defaults to no exclusions.
    #[serde(default)]
    pub ignore: IgnoreRules,
}

/// Rules excluding files from organization, beyond the hidden-name rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IgnoreRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// File extensions to exclude (e.g., "tmp", "partial").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.partial").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the filename.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl CategoryConfig {
    /// Load configuration, searching the standard locations.
    ///
    /// Locations are tried in order:
    /// 1. The explicit `config_path`, when provided
    /// 2. `.refilerc.toml` in the current directory
    /// 3. `~/.config/refile/config.toml`
    ///
    /// There is no built-in mapping to fall back to: if no file is found the
    /// load fails, before any filesystem mutation happens.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if an explicit path does not
    /// exist, `ConfigError::NoConfigFound` if no searched location has a
    /// configuration file, and parse/IO errors otherwise.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("refile")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Err(ConfigError::NoConfigFound)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds a configuration from category rules alone, with no ignore
    /// rules. Mainly useful for library callers and tests.
    pub fn from_rules(categories: Vec<CategoryRule>) -> Self {
        Self {
            categories,
            ignore: IgnoreRules::default(),
        }
    }
}

/// Compiled ignore rules for efficient per-file matching.
///
/// Glob and regex patterns are compiled once here so matching a file does
/// not reparse them.
pub struct CompiledIgnore {
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl CompiledIgnore {
    /// Compile ignore rules, validating every pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex pattern is invalid.
    pub fn new(rules: &IgnoreRules) -> Result<Self, ConfigError> {
        let patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let regexes = rules
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            filenames: rules.filenames.iter().cloned().collect(),
            extensions: rules
                .extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            patterns,
            regexes,
        })
    }

    /// Compiled form of the empty rule set: matches nothing.
    pub fn none() -> Self {
        Self {
            filenames: HashSet::new(),
            extensions: HashSet::new(),
            patterns: Vec::new(),
            regexes: Vec::new(),
        }
    }

    /// Returns true if a file is excluded by the configured ignore rules.
    ///
    /// Checks run in order with early termination: exact filename, file
    /// extension, glob patterns against the path, regex against the
    /// filename.
    pub fn matches(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.filenames.contains(file_name.as_ref()) {
            return true;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.extensions.contains(&ext_lower) {
                return true;
            }
        }

        if self
            .patterns
            .iter()
            .any(|pattern| pattern.matches_path(file_path))
        {
            return true;
        }

        self.regexes.iter().any(|regex| regex.is_match(&file_name))
    }
}
