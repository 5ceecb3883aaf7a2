//! Whole-tree maintenance: pruning empty directories and
//! extension-filtered bulk delete/copy.
//!
//! Like the reorganize pass, these operations collect per-entry failures
//! into a report and keep going; only a missing root aborts up front.

use crate::relocate::{
    RelocateError, RelocateMode, RelocateOutcome, RelocateResult, relocate_into,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default number of pruning passes.
pub const DEFAULT_PRUNE_PASSES: usize = 10;

/// Outcome of a [`prune_empty_dirs`] run.
#[derive(Debug, Default)]
pub struct PruneReport {
    /// Directories removed, in removal order.
    pub removed: Vec<PathBuf>,
    /// Directories that were empty but could not be removed.
    pub failed: Vec<(PathBuf, String)>,
    /// Number of passes actually performed.
    pub passes: usize,
}

/// Outcome of a bulk delete or bulk copy.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Source paths removed (delete) or copied (copy).
    pub affected: Vec<PathBuf>,
    /// Paths passed over, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    /// Paths whose operation failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

fn require_dir(path: &Path) -> RelocateResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(RelocateError::InvalidSourceDir {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        })
    }
}

fn is_dir_empty(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

/// Normalizes an extension argument into a lowercase `.ext` suffix.
fn dot_suffix(ext: &str) -> String {
    format!(".{}", ext.trim_start_matches('.')).to_lowercase()
}

fn name_has_suffix(name: &str, lower_suffix: &str) -> bool {
    name.to_lowercase().ends_with(lower_suffix)
}

/// Removes directories under `root` that contain nothing at all.
///
/// Runs up to `max_passes` scan-then-remove passes, stopping early once a
/// pass removes nothing. Each pass removes only directories that were
/// already empty when the pass scanned them, so a parent emptied by one
/// pass is collected by the next; the pass bound is what lets removals
/// cascade upward.
///
/// `root` itself is never removed. A directory containing only hidden
/// files is not empty and is never touched. Removal failures are recorded
/// and pruning continues.
///
/// # Errors
///
/// Returns `RelocateError::InvalidSourceDir` if `root` is not a directory.
pub fn prune_empty_dirs(root: &Path, max_passes: usize) -> RelocateResult<PruneReport> {
    require_dir(root)?;

    let mut report = PruneReport::default();
    for _ in 0..max_passes {
        report.passes += 1;

        let candidates: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_dir() && is_dir_empty(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        let mut removed_this_pass = 0;
        for dir in candidates {
            match fs::remove_dir(&dir) {
                Ok(()) => {
                    report.removed.push(dir);
                    removed_this_pass += 1;
                }
                Err(e) => {
                    if !report.failed.iter().any(|(p, _)| p == &dir) {
                        report.failed.push((dir, e.to_string()));
                    }
                }
            }
        }

        if removed_this_pass == 0 {
            break;
        }
    }

    Ok(report)
}

/// Deletes every file ending in `.ext` under `root`, at any depth.
///
/// The extension comparison ignores case; a leading dot on `ext` is
/// accepted and stripped. Per-file failures are recorded and deletion
/// continues.
///
/// # Errors
///
/// Returns `RelocateError::InvalidSourceDir` if `root` is not a directory.
pub fn delete_by_extension(ext: &str, root: &Path) -> RelocateResult<SweepReport> {
    require_dir(root)?;
    let suffix = dot_suffix(ext);

    let targets: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_type().is_file()
                && name_has_suffix(&entry.file_name().to_string_lossy(), &suffix)
        })
        .map(|entry| entry.into_path())
        .collect();

    let mut report = SweepReport::default();
    for path in targets {
        match fs::remove_file(&path) {
            Ok(()) => report.affected.push(path),
            Err(e) => report.failed.push((path, e.to_string())),
        }
    }

    Ok(report)
}

/// Copies every file ending in `.ext` under `source_dir` into a single
/// flat `dest_dir`, creating it if absent.
///
/// When `dest_dir` is `None` it defaults to `source_dir/<ext>`. A file
/// whose name already exists at the destination is skipped, never
/// overwritten; files already inside the destination are not re-copied.
///
/// # Errors
///
/// Returns `RelocateError::InvalidSourceDir` if `source_dir` is not a
/// directory, or `RelocateError::DirectoryCreationFailed` if the
/// destination cannot be created.
pub fn copy_by_extension(
    ext: &str,
    source_dir: &Path,
    dest_dir: Option<&Path>,
) -> RelocateResult<SweepReport> {
    require_dir(source_dir)?;
    let suffix = dot_suffix(ext);
    let dest = dest_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| source_dir.join(ext.trim_start_matches('.')));

    fs::create_dir_all(&dest).map_err(|e| RelocateError::DirectoryCreationFailed {
        path: dest.clone(),
        source: e,
    })?;

    let candidates: Vec<PathBuf> = WalkDir::new(source_dir)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_type().is_file()
                && name_has_suffix(&entry.file_name().to_string_lossy(), &suffix)
                && !entry.path().starts_with(&dest)
        })
        .map(|entry| entry.into_path())
        .collect();

    let mut report = SweepReport::default();
    for path in candidates {
        match relocate_into(&dest, &path, RelocateMode::Copy) {
            Ok(RelocateOutcome::Relocated(op)) => report.affected.push(op.source),
            Ok(RelocateOutcome::SkippedExisting { source, existing }) => {
                report.skipped.push((
                    source,
                    format!("destination {} already exists", existing.display()),
                ));
            }
            Err(e) => report.failed.push((path, e.to_string())),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prune_cascades_upward() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("empty1")).expect("mkdir");
        fs::create_dir_all(root.join("empty2").join("empty3")).expect("mkdir");
        fs::create_dir(root.join("keep")).expect("mkdir");
        fs::write(root.join("keep").join("file.txt"), "x").expect("write");

        let report = prune_empty_dirs(root, DEFAULT_PRUNE_PASSES).expect("prune");

        assert_eq!(report.removed.len(), 3);
        assert!(!root.join("empty1").exists());
        assert!(!root.join("empty2").exists());
        assert!(root.join("keep").join("file.txt").exists());
        // empty2 needed a second pass, the third found nothing
        assert!(report.passes >= 2);
    }

    #[test]
    fn test_prune_never_removes_dirs_with_hidden_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("shadow")).expect("mkdir");
        fs::write(root.join("shadow").join(".keepme"), "x").expect("write");

        let report = prune_empty_dirs(root, DEFAULT_PRUNE_PASSES).expect("prune");

        assert!(report.removed.is_empty());
        assert!(root.join("shadow").exists());
    }

    #[test]
    fn test_prune_never_removes_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("emptyroot");
        fs::create_dir(&root).expect("mkdir");

        let report = prune_empty_dirs(&root, DEFAULT_PRUNE_PASSES).expect("prune");

        assert!(report.removed.is_empty());
        assert!(root.exists());
    }

    #[test]
    fn test_prune_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("empty")).expect("mkdir");

        prune_empty_dirs(root, DEFAULT_PRUNE_PASSES).expect("prune");
        let second = prune_empty_dirs(root, DEFAULT_PRUNE_PASSES).expect("prune");

        assert!(second.removed.is_empty());
        assert_eq!(second.passes, 1);
    }

    #[test]
    fn test_prune_respects_pass_limit() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        // A five-deep chain of empty directories needs five cascading passes.
        fs::create_dir_all(root.join("a/b/c/d/e")).expect("mkdir");

        let report = prune_empty_dirs(root, 2).expect("prune");

        assert_eq!(report.passes, 2);
        assert_eq!(report.removed.len(), 2);
        assert!(root.join("a/b/c").exists());
        assert!(!root.join("a/b/c/d").exists());
    }

    #[test]
    fn test_delete_by_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("sub")).expect("mkdir");
        fs::write(root.join("a.log"), "x").expect("write");
        fs::write(root.join("sub").join("b.log"), "x").expect("write");
        fs::write(root.join("c.txt"), "x").expect("write");

        let report = delete_by_extension("log", root).expect("delete");

        assert_eq!(report.affected.len(), 2);
        assert!(!root.join("a.log").exists());
        assert!(!root.join("sub").join("b.log").exists());
        assert!(root.join("c.txt").exists());
    }

    #[test]
    fn test_delete_by_extension_accepts_leading_dot_and_case() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("a.LOG"), "x").expect("write");
        fs::write(root.join("dialog"), "x").expect("write");

        let report = delete_by_extension(".log", root).expect("delete");

        assert_eq!(report.affected.len(), 1);
        assert!(!root.join("a.LOG").exists());
        assert!(root.join("dialog").exists(), "suffix must include the dot");
    }

    #[test]
    fn test_copy_by_extension_flat_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("sub")).expect("mkdir");
        fs::write(root.join("a.pdf"), "x").expect("write");
        fs::write(root.join("sub").join("b.pdf"), "x").expect("write");
        fs::write(root.join("c.txt"), "x").expect("write");

        let dest = root.join("collected");
        let report = copy_by_extension("pdf", root, Some(&dest)).expect("copy");

        assert_eq!(report.affected.len(), 2);
        assert!(dest.join("a.pdf").exists());
        assert!(dest.join("b.pdf").exists());
        assert!(!dest.join("c.txt").exists());
        assert!(root.join("a.pdf").exists(), "copy keeps sources");
    }

    #[test]
    fn test_copy_by_extension_default_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("a.pdf"), "x").expect("write");

        let report = copy_by_extension("pdf", root, None).expect("copy");

        assert_eq!(report.affected.len(), 1);
        assert!(root.join("pdf").join("a.pdf").exists());
    }

    #[test]
    fn test_copy_by_extension_skips_existing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("sub")).expect("mkdir");
        fs::write(root.join("sub").join("a.pdf"), "incoming").expect("write");
        let dest = root.join("collected");
        fs::create_dir(&dest).expect("mkdir");
        fs::write(dest.join("a.pdf"), "already here").expect("write");

        let report = copy_by_extension("pdf", root, Some(&dest)).expect("copy");

        assert!(report.affected.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(
            fs::read_to_string(dest.join("a.pdf")).expect("read"),
            "already here"
        );
    }

    #[test]
    fn test_copy_by_extension_is_rerunnable() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("sub")).expect("mkdir");
        fs::write(root.join("sub").join("a.pdf"), "x").expect("write");

        copy_by_extension("pdf", root, None).expect("copy");
        let second = copy_by_extension("pdf", root, None).expect("copy");

        // The first run's output is skipped as existing on the second run.
        assert!(second.affected.is_empty());
        assert_eq!(second.skipped.len(), 1);
    }

    #[test]
    fn test_sweep_missing_root() {
        assert!(matches!(
            delete_by_extension("log", Path::new("/no/such/dir")),
            Err(RelocateError::InvalidSourceDir { .. })
        ));
        assert!(matches!(
            copy_by_extension("pdf", Path::new("/no/such/dir"), None),
            Err(RelocateError::InvalidSourceDir { .. })
        ));
        assert!(matches!(
            prune_empty_dirs(Path::new("/no/such/dir"), 10),
            Err(RelocateError::InvalidSourceDir { .. })
        ));
    }
}
