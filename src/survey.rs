//! Read-only directory survey: file listings, sizes, and per-extension
//! statistics.
//!
//! Nothing here mutates the filesystem; the survey exists to answer "what
//! is in this tree" before reorganizing it.

use crate::classifier::{is_hidden, split_extension};
use crate::config::ConfigError;
use glob::Pattern;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Aggregate numbers for one extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtensionStats {
    /// Number of files with this extension.
    pub count: usize,
    /// Combined size of those files in bytes.
    pub total_bytes: u64,
}

/// A recursive file listing filtered by a Unix-style glob pattern.
///
/// Hidden entries (names starting with `.` or `_`) are excluded unless
/// `include_hidden` is set; excluded hidden directories are not descended
/// into.
pub struct Survey {
    directory: PathBuf,
    pattern: Pattern,
    include_hidden: bool,
}

impl Survey {
    /// Creates a survey of `directory` for filenames matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidGlobPattern` if the pattern does not
    /// compile.
    pub fn new(directory: &Path, pattern: &str, include_hidden: bool) -> Result<Self, ConfigError> {
        let pattern = Pattern::new(pattern)
            .map_err(|_| ConfigError::InvalidGlobPattern(pattern.to_string()))?;
        Ok(Self {
            directory: directory.to_path_buf(),
            pattern,
            include_hidden,
        })
    }

    /// Sorted list of matching file paths.
    pub fn files(&self) -> io::Result<Vec<PathBuf>> {
        let include_hidden = self.include_hidden;
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.directory)
            .min_depth(1)
            .into_iter()
            .filter_entry(move |e| {
                // depth 0 is the surveyed directory itself, whatever its name
                e.depth() == 0
                    || include_hidden
                    || !is_hidden(&e.file_name().to_string_lossy())
            })
        {
            let entry = entry.map_err(io::Error::other)?;
            if !entry.file_type().is_file() {
                continue;
            }
            if self.pattern.matches(&entry.file_name().to_string_lossy()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Number of matching files.
    pub fn count(&self) -> io::Result<usize> {
        Ok(self.files()?.len())
    }

    /// Matching files with their sizes in bytes, sorted by path.
    pub fn sizes(&self) -> io::Result<Vec<(PathBuf, u64)>> {
        self.files()?
            .into_iter()
            .map(|path| {
                let len = path.metadata()?.len();
                Ok((path, len))
            })
            .collect()
    }

    /// Combined size of all matching files in bytes.
    pub fn total_size(&self) -> io::Result<u64> {
        Ok(self.sizes()?.into_iter().map(|(_, len)| len).sum())
    }

    /// Count and combined size per extension, keyed by the lowercased
    /// extension without its dot. Files with no extension land under the
    /// empty key.
    pub fn extension_stats(&self) -> io::Result<BTreeMap<String, ExtensionStats>> {
        let mut stats: BTreeMap<String, ExtensionStats> = BTreeMap::new();
        for (path, len) in self.sizes()? {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let ext = split_extension(&name).to_lowercase();
            let entry = stats.entry(ext).or_default();
            entry.count += 1;
            entry.total_bytes += len;
        }
        Ok(stats)
    }
}
