//! Command-line interface.
//!
//! Maps subcommands onto the library operations, loads configuration where
//! classification needs it, and prints batch summaries. Configuration
//! problems abort before anything on disk is touched; per-file problems are
//! reported after the batch completes.

use crate::classifier::CategoryIndex;
use crate::config::{CategoryConfig, CompiledIgnore};
use crate::organizer::{BatchReport, Reorganizer, flatten};
use crate::output::OutputFormatter;
use crate::relocate::RelocateMode;
use crate::survey::Survey;
use crate::sweep::{
    DEFAULT_PRUNE_PASSES, SweepReport, copy_by_extension, delete_by_extension, prune_empty_dirs,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "refile",
    version,
    about = "Sort files into category subdirectories by extension"
)]
pub struct Cli {
    /// Path to the category mapping configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sort a directory's files into per-category subdirectories
    Organize {
        /// Directory whose files should be organized
        #[arg(default_value = ".")]
        source: PathBuf,

        /// Destination root for category folders (defaults to the source)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Copy files instead of moving them
        #[arg(long)]
        copy: bool,

        /// Print a line per file instead of a progress bar
        #[arg(short, long)]
        verbose: bool,
    },
    /// Pull every file below a directory's top level into one flat directory
    Flatten {
        /// Directory tree to flatten
        #[arg(default_value = ".")]
        source: PathBuf,

        /// Where the files should land (defaults to the source)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Copy files instead of moving them
        #[arg(long)]
        copy: bool,

        /// Print a line per file instead of a progress bar
        #[arg(short, long)]
        verbose: bool,
    },
    /// Remove directories that contain nothing, cascading upward
    Prune {
        /// Root of the tree to prune (never removed itself)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Upper bound on cascading passes
        #[arg(long, default_value_t = DEFAULT_PRUNE_PASSES)]
        max_passes: usize,

        /// List every removed directory
        #[arg(short, long)]
        verbose: bool,
    },
    /// Delete every file with the given extension under a directory tree
    DeleteExt {
        /// Extension to delete, with or without the leading dot
        ext: String,

        /// Root of the tree to sweep
        #[arg(default_value = ".")]
        root: PathBuf,

        /// List every deleted file
        #[arg(short, long)]
        verbose: bool,
    },
    /// Copy every file with the given extension into one flat directory
    CopyExt {
        /// Extension to collect, with or without the leading dot
        ext: String,

        /// Root of the tree to sweep
        #[arg(default_value = ".")]
        source: PathBuf,

        /// Flat destination directory (defaults to source/<ext>)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// List every copied file
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show counts, sizes and per-extension statistics for a tree
    Stats {
        /// Directory to survey
        #[arg(default_value = ".")]
        directory: PathBuf,

        /// Unix-style filename pattern to match
        #[arg(short, long, default_value = "*")]
        pattern: String,

        /// Include hidden files and directories
        #[arg(long)]
        hidden: bool,
    },
}

/// Runs the parsed command line. Errors are rendered messages ready for
/// display.
pub fn run(cli: Cli) -> Result<(), String> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Organize {
            source,
            dest,
            copy,
            verbose,
        } => organize_command(&source, dest.as_deref(), mode_for(copy), verbose, config_path),
        Command::Flatten {
            source,
            dest,
            copy,
            verbose,
        } => flatten_command(&source, dest.as_deref(), mode_for(copy), verbose),
        Command::Prune {
            root,
            max_passes,
            verbose,
        } => prune_command(&root, max_passes, verbose),
        Command::DeleteExt { ext, root, verbose } => delete_command(&ext, &root, verbose),
        Command::CopyExt {
            ext,
            source,
            dest,
            verbose,
        } => copy_command(&ext, &source, dest.as_deref(), verbose),
        Command::Stats {
            directory,
            pattern,
            hidden,
        } => stats_command(&directory, &pattern, hidden),
    }
}

fn mode_for(copy: bool) -> RelocateMode {
    if copy {
        RelocateMode::Copy
    } else {
        RelocateMode::Move
    }
}

fn organize_command(
    source: &Path,
    dest: Option<&Path>,
    mode: RelocateMode,
    verbose: bool,
    config_path: Option<&Path>,
) -> Result<(), String> {
    let dest = dest.unwrap_or(source);
    OutputFormatter::info(&format!("Organizing contents of {}", source.display()));

    // Configuration problems must surface before any filesystem mutation.
    let config = CategoryConfig::load(config_path).map_err(|e| e.to_string())?;
    let ignore = CompiledIgnore::new(&config.ignore).map_err(|e| e.to_string())?;
    let index = CategoryIndex::from_config(&config);

    let report = Reorganizer::new(&index, &ignore, mode)
        .reorganize(source, dest, verbose)
        .map_err(|e| e.to_string())?;

    OutputFormatter::summary_table(&report.counts_by_destination(), report.relocated.len());
    finish_batch(&report, verbose);
    Ok(())
}

fn flatten_command(
    source: &Path,
    dest: Option<&Path>,
    mode: RelocateMode,
    verbose: bool,
) -> Result<(), String> {
    let dest = dest.unwrap_or(source);
    OutputFormatter::info(&format!(
        "Flattening {} into {}",
        source.display(),
        dest.display()
    ));

    let report = flatten(source, dest, mode, verbose).map_err(|e| e.to_string())?;

    OutputFormatter::plain(&format!(
        "{} {} {}",
        mode.past_verb(),
        report.relocated.len(),
        if report.relocated.len() == 1 {
            "file"
        } else {
            "files"
        }
    ));
    finish_batch(&report, verbose);
    Ok(())
}

fn finish_batch(report: &BatchReport, verbose: bool) {
    if verbose {
        OutputFormatter::problem_list("Skipped", &report.skipped);
    }
    OutputFormatter::problem_list("Failed", &report.failed);
    if report.is_clean() {
        OutputFormatter::success("Done");
    } else {
        OutputFormatter::warning("Some files could not be relocated, see above");
    }
}

fn prune_command(root: &Path, max_passes: usize, verbose: bool) -> Result<(), String> {
    let report = prune_empty_dirs(root, max_passes).map_err(|e| e.to_string())?;

    if verbose {
        for dir in &report.removed {
            OutputFormatter::success(&format!("Removed empty directory {}", dir.display()));
        }
    }
    OutputFormatter::problem_list("Could not remove", &report.failed);
    OutputFormatter::plain(&format!(
        "Removed {} empty {} in {} {}",
        report.removed.len(),
        if report.removed.len() == 1 {
            "directory"
        } else {
            "directories"
        },
        report.passes,
        if report.passes == 1 { "pass" } else { "passes" }
    ));
    Ok(())
}

fn delete_command(ext: &str, root: &Path, verbose: bool) -> Result<(), String> {
    let report = delete_by_extension(ext, root).map_err(|e| e.to_string())?;
    report_sweep("Deleted", &report, verbose);
    Ok(())
}

fn copy_command(
    ext: &str,
    source: &Path,
    dest: Option<&Path>,
    verbose: bool,
) -> Result<(), String> {
    let report = copy_by_extension(ext, source, dest).map_err(|e| e.to_string())?;
    report_sweep("Copied", &report, verbose);
    Ok(())
}

fn report_sweep(action: &str, report: &SweepReport, verbose: bool) {
    if verbose {
        for path in &report.affected {
            OutputFormatter::success(&format!("{} {}", action, path.display()));
        }
        OutputFormatter::problem_list("Skipped", &report.skipped);
    }
    OutputFormatter::problem_list("Failed", &report.failed);
    OutputFormatter::plain(&format!(
        "{} {} {}",
        action,
        report.affected.len(),
        if report.affected.len() == 1 {
            "file"
        } else {
            "files"
        }
    ));
}

fn stats_command(directory: &Path, pattern: &str, hidden: bool) -> Result<(), String> {
    let survey = Survey::new(directory, pattern, hidden).map_err(|e| e.to_string())?;
    let stats = survey.extension_stats().map_err(|e| e.to_string())?;
    let total_files: usize = stats.values().map(|s| s.count).sum();
    let total_bytes: u64 = stats.values().map(|s| s.total_bytes).sum();

    OutputFormatter::header(&format!("FILES IN {}", directory.display()));
    for (ext, s) in &stats {
        let label = if ext.is_empty() { "(none)" } else { ext.as_str() };
        OutputFormatter::plain(&format!(
            "{:<12} {:>6} {:>12}",
            label,
            s.count,
            format_size(s.total_bytes)
        ));
    }
    OutputFormatter::plain(&format!(
        "Total: {} files, {}",
        total_files,
        format_size(total_bytes)
    ));
    Ok(())
}

fn format_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}
