/// Single-file relocation primitives.
///
/// This module moves or copies one file into a destination directory,
/// creating the directory when needed. Relocation never overwrites: if an
/// entry with the same name already exists at the destination, the file is
/// left in place and the caller is told so.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How a file is transferred to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocateMode {
    /// The source is removed after transfer. Within one filesystem this is a
    /// single rename; across filesystems it degrades to copy-then-remove,
    /// which is not atomic and can leave both copies behind if interrupted.
    Move,
    /// The source remains in place.
    Copy,
}

impl RelocateMode {
    /// Present-tense verb for progress output.
    pub fn verb(&self) -> &'static str {
        match self {
            RelocateMode::Move => "Moving",
            RelocateMode::Copy => "Copying",
        }
    }

    /// Past-tense verb for summaries.
    pub fn past_verb(&self) -> &'static str {
        match self {
            RelocateMode::Move => "Moved",
            RelocateMode::Copy => "Copied",
        }
    }
}

/// Record of one completed relocation.
#[derive(Debug, Clone)]
pub struct Relocation {
    /// Where the file was before the operation.
    pub source: PathBuf,
    /// Where the file is now (copy mode: where the duplicate is).
    pub dest: PathBuf,
}

/// Errors that can occur while relocating files.
#[derive(Debug)]
pub enum RelocateError {
    /// Failed to create a destination directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to transfer a file to its destination.
    TransferFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// A source directory could not be read or does not exist.
    InvalidSourceDir { path: PathBuf, source: io::Error },
    /// The source path has no final name component.
    MissingFileName { path: PathBuf },
}

impl std::fmt::Display for RelocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::TransferFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to transfer {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            Self::InvalidSourceDir { path, source } => {
                write!(f, "Invalid source directory {}: {}", path.display(), source)
            }
            Self::MissingFileName { path } => {
                write!(f, "Path has no file name component: {}", path.display())
            }
        }
    }
}

impl std::error::Error for RelocateError {}

/// Result type for relocation operations.
pub type RelocateResult<T> = Result<T, RelocateError>;

/// Outcome of a single relocation attempt.
#[derive(Debug)]
pub enum RelocateOutcome {
    /// The file was transferred.
    Relocated(Relocation),
    /// An entry with the same name already exists at the destination; the
    /// source was left untouched.
    SkippedExisting {
        source: PathBuf,
        existing: PathBuf,
    },
}

/// Relocates a file into `dest_dir`, creating the directory if absent.
///
/// Directory creation is idempotent. Collisions are reported, never
/// resolved by overwriting.
///
/// # Examples
///
/// ```no_run
/// use refile::relocate::{relocate_into, RelocateMode};
/// use std::path::Path;
///
/// let outcome = relocate_into(
///     Path::new("/sorted/images"),
///     Path::new("/inbox/photo.png"),
///     RelocateMode::Move,
/// );
/// match outcome {
///     Ok(o) => println!("{:?}", o),
///     Err(e) => eprintln!("Relocation failed: {}", e),
/// }
/// ```
pub fn relocate_into(
    dest_dir: &Path,
    file_path: &Path,
    mode: RelocateMode,
) -> RelocateResult<RelocateOutcome> {
    fs::create_dir_all(dest_dir).map_err(|e| RelocateError::DirectoryCreationFailed {
        path: dest_dir.to_path_buf(),
        source: e,
    })?;

    let file_name = file_path
        .file_name()
        .ok_or_else(|| RelocateError::MissingFileName {
            path: file_path.to_path_buf(),
        })?;

    let destination = dest_dir.join(file_name);
    if destination.exists() {
        return Ok(RelocateOutcome::SkippedExisting {
            source: file_path.to_path_buf(),
            existing: destination,
        });
    }

    match mode {
        RelocateMode::Move => move_file(file_path, &destination)?,
        RelocateMode::Copy => {
            fs::copy(file_path, &destination).map_err(|e| RelocateError::TransferFailed {
                from: file_path.to_path_buf(),
                to: destination.clone(),
                source: e,
            })?;
        }
    }

    Ok(RelocateOutcome::Relocated(Relocation {
        source: file_path.to_path_buf(),
        dest: destination,
    }))
}

/// Moves a file by rename, degrading to copy-then-remove across
/// filesystem boundaries.
fn move_file(from: &Path, to: &Path) -> RelocateResult<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            // rename cannot cross mount points; fall back to copy + remove.
            fs::copy(from, to).map_err(|e| RelocateError::TransferFailed {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source: e,
            })?;
            fs::remove_file(from).map_err(|e| RelocateError::TransferFailed {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source: e,
            })
        }
        Err(e) => Err(RelocateError::TransferFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: e,
        }),
    }
}
