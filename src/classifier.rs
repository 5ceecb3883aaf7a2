//! Extension classification for sorting files into categories.
//!
//! The classifier is built from a [`CategoryConfig`](crate::config::CategoryConfig)
//! and answers one question: which category does a file extension belong to?
//! Category order matters: when two categories claim the same extension, the
//! first one listed in the configuration wins. Extensions not claimed by any
//! category fall back to [`FALLBACK_CATEGORY`].

use crate::config::CategoryConfig;
use std::collections::HashMap;

/// Reserved category for extensions no configured category claims.
pub const FALLBACK_CATEGORY: &str = "others";

/// Returns true if a file or directory name counts as hidden.
///
/// Hidden entries (names beginning with `.` or `_`) are never classified
/// or relocated.
///
/// # Examples
///
/// ```
/// use refile::classifier::is_hidden;
///
/// assert!(is_hidden(".gitignore"));
/// assert!(is_hidden("_build"));
/// assert!(!is_hidden("photo.jpg"));
/// ```
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

/// Extracts the extension from a file name: the substring after the last `.`.
///
/// A name with no dot yields an empty extension, which no category claims,
/// so such files classify into the fallback category. A trailing dot also
/// yields an empty extension.
pub fn split_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => "",
    }
}

/// Compiled extension-to-category lookup table.
///
/// Built once per invocation from the loaded configuration. Lookups are
/// case-insensitive: configured extensions are lower-cased when the index is
/// built and queried extensions are lower-cased before lookup.
#[derive(Debug, Clone)]
pub struct CategoryIndex {
    by_extension: HashMap<String, String>,
}

impl CategoryIndex {
    /// Builds the index from a loaded configuration.
    ///
    /// Categories are processed in configuration order and the first category
    /// to claim an extension keeps it.
    pub fn from_config(config: &CategoryConfig) -> Self {
        let mut by_extension = HashMap::new();
        for rule in &config.categories {
            for ext in &rule.extensions {
                by_extension
                    .entry(ext.to_lowercase())
                    .or_insert_with(|| rule.name.clone());
            }
        }
        Self { by_extension }
    }

    /// Returns the category name for an extension, or [`FALLBACK_CATEGORY`]
    /// when no configured category claims it.
    ///
    /// # Examples
    ///
    /// ```
    /// use refile::classifier::CategoryIndex;
    /// use refile::config::{CategoryConfig, CategoryRule};
    ///
    /// let config = CategoryConfig::from_rules(vec![CategoryRule {
    ///     name: "images".to_string(),
    ///     extensions: vec!["jpg".to_string(), "png".to_string()],
    /// }]);
    /// let index = CategoryIndex::from_config(&config);
    ///
    /// assert_eq!(index.classify("jpg"), "images");
    /// assert_eq!(index.classify("exe"), "others");
    /// ```
    pub fn classify(&self, extension: &str) -> &str {
        self.by_extension
            .get(&extension.to_lowercase())
            .map(String::as_str)
            .unwrap_or(FALLBACK_CATEGORY)
    }

    /// Number of distinct extensions the index knows about.
    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    /// Returns true if no category claims any extension.
    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}
