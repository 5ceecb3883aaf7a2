//! Directory reorganization: classify and relocate files into category
//! subdirectories, or flatten a tree into one level.
//!
//! Per-file problems never abort a batch. Each pass runs every feasible
//! relocation and returns a [`BatchReport`] listing what was relocated, what
//! was skipped and why, and what failed. Only an unreadable source directory
//! is fatal.

use crate::classifier::{CategoryIndex, is_hidden, split_extension};
use crate::config::CompiledIgnore;
use crate::output::OutputFormatter;
use crate::relocate::{
    RelocateError, RelocateMode, RelocateOutcome, RelocateResult, Relocation, relocate_into,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Aggregated outcome of one reorganize or flatten pass.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files that were moved or copied, in processing order.
    pub relocated: Vec<Relocation>,
    /// Entries that were passed over, with the reason (directory, hidden,
    /// ignore rule, destination collision).
    pub skipped: Vec<(PathBuf, String)>,
    /// Files whose relocation failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    fn new() -> Self {
        Self::default()
    }

    /// Returns true if no relocation failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of entries the pass looked at.
    pub fn total_processed(&self) -> usize {
        self.relocated.len() + self.skipped.len() + self.failed.len()
    }

    /// Relocation counts grouped by the name of the directory files landed
    /// in. For a reorganize pass this is the per-category tally.
    pub fn counts_by_destination(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for op in &self.relocated {
            if let Some(dir) = op.dest.parent().and_then(|p| p.file_name()) {
                *counts.entry(dir.to_string_lossy().into_owned()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Sorts the immediate files of a directory into category subdirectories.
///
/// Holds the compiled classification index and ignore rules for one
/// invocation; nothing is cached beyond it.
pub struct Reorganizer<'a> {
    index: &'a CategoryIndex,
    ignore: &'a CompiledIgnore,
    mode: RelocateMode,
}

impl<'a> Reorganizer<'a> {
    pub fn new(index: &'a CategoryIndex, ignore: &'a CompiledIgnore, mode: RelocateMode) -> Self {
        Self {
            index,
            ignore,
            mode,
        }
    }

    /// One non-recursive pass over `source_dir`'s immediate entries.
    ///
    /// Directories, hidden entries (names starting with `.` or `_`), and
    /// entries matching the ignore rules are skipped. Every other file is
    /// classified by its extension and relocated into
    /// `dest_dir/<category>`, with the category directory created on first
    /// use. A file whose name already exists at its destination is skipped
    /// and reported, never overwritten.
    ///
    /// `verbose` switches from a progress bar to per-file lines; it has no
    /// behavioral effect.
    ///
    /// # Errors
    ///
    /// Returns `RelocateError::InvalidSourceDir` if `source_dir` cannot be
    /// read. Per-file failures land in the report instead.
    pub fn reorganize(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        verbose: bool,
    ) -> RelocateResult<BatchReport> {
        let entries = fs::read_dir(source_dir).map_err(|e| RelocateError::InvalidSourceDir {
            path: source_dir.to_path_buf(),
            source: e,
        })?;

        // Snapshot the listing first: when dest_dir == source_dir the
        // category directories appear inside the directory being scanned.
        let entries: Vec<_> = entries.flatten().collect();

        let mut report = BatchReport::new();
        let progress =
            (!verbose).then(|| OutputFormatter::create_progress_bar(entries.len() as u64));

        for entry in entries {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(pb) = &progress {
                pb.inc(1);
            }

            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                if verbose {
                    OutputFormatter::plain(&format!("{} is not a file, skipping", name));
                }
                report.skipped.push((path, "not a regular file".to_string()));
                continue;
            }
            if is_hidden(&name) {
                if verbose {
                    OutputFormatter::plain(&format!("{} is hidden, skipping", name));
                }
                report.skipped.push((path, "hidden".to_string()));
                continue;
            }
            if self.ignore.matches(&path) {
                if verbose {
                    OutputFormatter::plain(&format!("{} matches an ignore rule, skipping", name));
                }
                report
                    .skipped
                    .push((path, "ignored by configuration".to_string()));
                continue;
            }

            let category = self.index.classify(split_extension(&name));
            let target = dest_dir.join(category);

            match relocate_into(&target, &path, self.mode) {
                Ok(RelocateOutcome::Relocated(op)) => {
                    if verbose {
                        OutputFormatter::success(&format!(
                            "{} {} to {}/",
                            self.mode.verb(),
                            name,
                            category
                        ));
                    }
                    report.relocated.push(op);
                }
                Ok(RelocateOutcome::SkippedExisting { source, existing }) => {
                    if verbose {
                        OutputFormatter::warning(&format!(
                            "{} already exists, skipping {}",
                            existing.display(),
                            name
                        ));
                    }
                    report.skipped.push((
                        source,
                        format!("destination {} already exists", existing.display()),
                    ));
                }
                Err(e) => {
                    if verbose {
                        OutputFormatter::error(&e.to_string());
                    }
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(report)
    }
}

/// Pulls every file strictly below `source_dir`'s top level directly into
/// `dest_dir`, discarding the subdirectory structure.
///
/// Files already directly under `source_dir` are left untouched. Name
/// collisions at the destination are skipped and reported. Unreadable
/// subtrees are recorded as failures and the walk continues.
///
/// # Errors
///
/// Returns `RelocateError::InvalidSourceDir` if `source_dir` is not a
/// readable directory.
pub fn flatten(
    source_dir: &Path,
    dest_dir: &Path,
    mode: RelocateMode,
    verbose: bool,
) -> RelocateResult<BatchReport> {
    if !source_dir.is_dir() {
        return Err(RelocateError::InvalidSourceDir {
            path: source_dir.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "source is not a directory",
            ),
        });
    }

    let mut report = BatchReport::new();

    // Snapshot the candidates before relocating anything so files moved
    // into dest_dir are not revisited by the walk.
    let mut candidates: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(source_dir).min_depth(2) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                candidates.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| source_dir.to_path_buf());
                report.failed.push((path, e.to_string()));
            }
        }
    }

    let progress = (!verbose).then(|| OutputFormatter::create_progress_bar(candidates.len() as u64));

    for path in candidates {
        if let Some(pb) = &progress {
            pb.inc(1);
        }

        // Already flat at the destination.
        if path.parent() == Some(dest_dir) {
            report
                .skipped
                .push((path, "already at destination".to_string()));
            continue;
        }

        match relocate_into(dest_dir, &path, mode) {
            Ok(RelocateOutcome::Relocated(op)) => {
                if verbose {
                    OutputFormatter::success(&format!(
                        "{} {} to {}",
                        mode.verb(),
                        op.source.display(),
                        dest_dir.display()
                    ));
                }
                report.relocated.push(op);
            }
            Ok(RelocateOutcome::SkippedExisting { source, existing }) => {
                if verbose {
                    OutputFormatter::warning(&format!(
                        "{} already exists, skipping {}",
                        existing.display(),
                        source.display()
                    ));
                }
                report.skipped.push((
                    source,
                    format!("destination {} already exists", existing.display()),
                ));
            }
            Err(e) => {
                if verbose {
                    OutputFormatter::error(&e.to_string());
                }
                report.failed.push((path, e.to_string()));
            }
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CategoryConfig, CategoryRule, IgnoreRules};
    use tempfile::TempDir;

    fn index_for(rules: Vec<(&str, Vec<&str>)>) -> CategoryIndex {
        let categories = rules
            .into_iter()
            .map(|(name, exts)| CategoryRule {
                name: name.to_string(),
                extensions: exts.iter().map(|e| e.to_string()).collect(),
            })
            .collect();
        CategoryIndex::from_config(&CategoryConfig::from_rules(categories))
    }

    #[test]
    fn test_reorganize_sorts_by_category() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.jpg"), "x").expect("write");
        fs::write(base.join("b.txt"), "x").expect("write");
        fs::write(base.join("c.exe"), "x").expect("write");

        let index = index_for(vec![("images", vec!["jpg", "png"]), ("docs", vec!["txt"])]);
        let ignore = CompiledIgnore::none();
        let organizer = Reorganizer::new(&index, &ignore, RelocateMode::Move);

        let report = organizer.reorganize(base, base, false).expect("reorganize");

        assert_eq!(report.relocated.len(), 3);
        assert!(report.is_clean());
        assert!(base.join("images").join("a.jpg").exists());
        assert!(base.join("docs").join("b.txt").exists());
        assert!(base.join("others").join("c.exe").exists());
        assert!(!base.join("a.jpg").exists());
    }

    #[test]
    fn test_reorganize_skips_hidden_and_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join(".hidden.txt"), "x").expect("write");
        fs::write(base.join("_scratch.txt"), "x").expect("write");
        fs::create_dir(base.join("subdir")).expect("mkdir");

        let index = index_for(vec![("docs", vec!["txt"])]);
        let ignore = CompiledIgnore::none();
        let organizer = Reorganizer::new(&index, &ignore, RelocateMode::Move);

        let report = organizer.reorganize(base, base, false).expect("reorganize");

        assert!(report.relocated.is_empty());
        assert_eq!(report.skipped.len(), 3);
        assert!(base.join(".hidden.txt").exists());
        assert!(base.join("_scratch.txt").exists());
        assert!(base.join("subdir").exists());
        assert!(!base.join("docs").exists());
    }

    #[test]
    fn test_reorganize_respects_ignore_rules() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("keep.txt"), "x").expect("write");
        fs::write(base.join("skip.tmp"), "x").expect("write");

        let index = index_for(vec![("docs", vec!["txt", "tmp"])]);
        let rules = IgnoreRules {
            extensions: vec!["tmp".to_string()],
            ..Default::default()
        };
        let ignore = CompiledIgnore::new(&rules).expect("compile");
        let organizer = Reorganizer::new(&index, &ignore, RelocateMode::Move);

        let report = organizer.reorganize(base, base, false).expect("reorganize");

        assert_eq!(report.relocated.len(), 1);
        assert!(base.join("skip.tmp").exists());
        assert!(base.join("docs").join("keep.txt").exists());
    }

    #[test]
    fn test_reorganize_copy_mode_keeps_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.jpg"), "x").expect("write");

        let index = index_for(vec![("images", vec!["jpg"])]);
        let ignore = CompiledIgnore::none();
        let organizer = Reorganizer::new(&index, &ignore, RelocateMode::Copy);

        let report = organizer.reorganize(base, base, false).expect("reorganize");

        assert_eq!(report.relocated.len(), 1);
        assert!(base.join("a.jpg").exists());
        assert!(base.join("images").join("a.jpg").exists());
    }

    #[test]
    fn test_reorganize_separate_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        let source = base.join("inbox");
        let dest = base.join("sorted");
        fs::create_dir(&source).expect("mkdir");
        fs::write(source.join("a.jpg"), "x").expect("write");

        let index = index_for(vec![("images", vec!["jpg"])]);
        let ignore = CompiledIgnore::none();
        let organizer = Reorganizer::new(&index, &ignore, RelocateMode::Move);

        let report = organizer
            .reorganize(&source, &dest, false)
            .expect("reorganize");

        assert_eq!(report.relocated.len(), 1);
        assert!(dest.join("images").join("a.jpg").exists());
        assert!(!source.join("a.jpg").exists());
    }

    #[test]
    fn test_reorganize_collision_is_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.jpg"), "incoming").expect("write");
        fs::create_dir(base.join("images")).expect("mkdir");
        fs::write(base.join("images").join("a.jpg"), "already here").expect("write");

        let index = index_for(vec![("images", vec!["jpg"])]);
        let ignore = CompiledIgnore::none();
        let organizer = Reorganizer::new(&index, &ignore, RelocateMode::Move);

        let report = organizer.reorganize(base, base, false).expect("reorganize");

        assert!(report.relocated.is_empty());
        assert_eq!(report.skipped.len(), 2); // the images dir itself and the collision
        assert!(base.join("a.jpg").exists());
        assert_eq!(
            fs::read_to_string(base.join("images").join("a.jpg")).expect("read"),
            "already here"
        );
    }

    #[test]
    fn test_reorganize_missing_source_dir() {
        let index = index_for(vec![("docs", vec!["txt"])]);
        let ignore = CompiledIgnore::none();
        let organizer = Reorganizer::new(&index, &ignore, RelocateMode::Move);

        let result = organizer.reorganize(Path::new("/no/such/dir"), Path::new("/tmp"), false);
        assert!(matches!(
            result,
            Err(RelocateError::InvalidSourceDir { .. })
        ));
    }

    #[test]
    fn test_counts_by_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.jpg"), "x").expect("write");
        fs::write(base.join("b.jpg"), "x").expect("write");
        fs::write(base.join("c.txt"), "x").expect("write");

        let index = index_for(vec![("images", vec!["jpg"]), ("docs", vec!["txt"])]);
        let ignore = CompiledIgnore::none();
        let organizer = Reorganizer::new(&index, &ignore, RelocateMode::Move);

        let report = organizer.reorganize(base, base, false).expect("reorganize");
        let counts = report.counts_by_destination();

        assert_eq!(counts.get("images"), Some(&2));
        assert_eq!(counts.get("docs"), Some(&1));
    }

    #[test]
    fn test_flatten_pulls_deep_files_up() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("top.txt"), "x").expect("write");
        fs::create_dir_all(base.join("a").join("b")).expect("mkdir");
        fs::write(base.join("a").join("one.txt"), "x").expect("write");
        fs::write(base.join("a").join("b").join("two.txt"), "x").expect("write");

        let report = flatten(base, base, RelocateMode::Move, false).expect("flatten");

        assert_eq!(report.relocated.len(), 2);
        assert!(base.join("top.txt").exists(), "top-level files stay put");
        assert!(base.join("one.txt").exists());
        assert!(base.join("two.txt").exists());
        assert!(!base.join("a").join("one.txt").exists());
    }

    #[test]
    fn test_flatten_collision_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir_all(base.join("a")).expect("mkdir");
        fs::create_dir_all(base.join("b")).expect("mkdir");
        fs::write(base.join("a").join("same.txt"), "first").expect("write");
        fs::write(base.join("b").join("same.txt"), "second").expect("write");

        let report = flatten(base, base, RelocateMode::Move, false).expect("flatten");

        assert_eq!(report.relocated.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        // One of the two landed, the other stayed where it was.
        assert!(base.join("same.txt").exists());
        let survivors = [
            base.join("a").join("same.txt"),
            base.join("b").join("same.txt"),
        ];
        assert_eq!(survivors.iter().filter(|p| p.exists()).count(), 1);
    }

    #[test]
    fn test_flatten_into_other_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        let source = base.join("tree");
        let dest = base.join("flat");
        fs::create_dir_all(source.join("deep")).expect("mkdir");
        fs::create_dir(&dest).expect("mkdir");
        fs::write(source.join("deep").join("f.txt"), "x").expect("write");

        let report = flatten(&source, &dest, RelocateMode::Copy, false).expect("flatten");

        assert_eq!(report.relocated.len(), 1);
        assert!(dest.join("f.txt").exists());
        assert!(source.join("deep").join("f.txt").exists(), "copy keeps source");
    }

    #[test]
    fn test_flatten_missing_source() {
        let result = flatten(
            Path::new("/no/such/dir"),
            Path::new("/tmp"),
            RelocateMode::Move,
            false,
        );
        assert!(matches!(
            result,
            Err(RelocateError::InvalidSourceDir { .. })
        ));
    }
}
