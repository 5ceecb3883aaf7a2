//! Output formatting and styling.
//!
//! Centralizes all terminal output: colored status lines, progress bars,
//! and the post-batch summary table.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::PathBuf;

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for file operations.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use refile::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints a summary table of relocation counts per destination.
    pub fn summary_table(counts: &HashMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        // Sort names for consistent output
        let mut rows: Vec<_> = counts.iter().collect();
        rows.sort_by_key(|&(name, _)| name);

        let max_name_len = rows
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_name_len
        );
        println!("{}", "-".repeat(max_name_len + 10));

        for (name, count) in &rows {
            let file_word = if **count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                name,
                count.to_string().green(),
                file_word,
                width = max_name_len
            );
        }

        println!("{}", "-".repeat(max_name_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" },
            width = max_name_len
        );
    }

    /// Prints a list of per-file problems under a colored header.
    pub fn problem_list(header: &str, problems: &[(PathBuf, String)]) {
        if problems.is_empty() {
            return;
        }
        Self::warning(&format!("{} ({}):", header, problems.len()));
        for (path, reason) in problems {
            println!("  - {}: {}", path.display(), reason);
        }
    }
}
