//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status lines,
//! the progress bar shown while sorting, and the per-category summary table.

use crate::sorter::{SortEvent, SortReport, SortReporter};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// OutputFormatter::success("Folder sorted!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark, on stderr.
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

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[SIMULATION] {}", message).yellow());
    }

    /// Creates a progress bar for `total` files.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a summary table with file counts by category.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Images".to_string(), 8);
    /// counts.insert("PDFs".to_string(), 15);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = max_category_len
        );
    }

    /// Prints the closing summary of a run.
    pub fn report(report: &SortReport) {
        if report.total_moved() == 0 && !report.has_failures() {
            Self::info("Nothing to move.");
            return;
        }

        Self::summary_table(&report.moved, report.total_moved());

        if !report.skipped.is_empty() {
            Self::plain(&format!("Skipped: {}", report.skipped.len()));
        }

        if report.has_failures() {
            Self::header("ERRORS");
            for failure in &report.failures {
                Self::error(&format!("{}: {}", failure.path.display(), failure.reason));
            }
            Self::warning(&format!(
                "{} {} could not be sorted. Please review the errors above.",
                report.failures.len(),
                plural(report.failures.len())
            ));
        }

        if report.simulated {
            Self::dry_run_notice("No files were modified.");
        } else {
            Self::success("Sorting complete!");
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// Prints one line per event above a progress bar.
pub struct ConsoleReporter {
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self { progress: None }
    }

    fn print(&self, line: String) {
        match &self.progress {
            Some(pb) => pb.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SortReporter for ConsoleReporter {
    fn event(&mut self, event: &SortEvent) {
        let line = match event {
            SortEvent::Moved(_) => format!("{} {}", "✓".green(), event),
            SortEvent::Planned(_) => format!("{} {}", "→".yellow(), event),
            SortEvent::Skipped { .. } => format!("  {}", event.to_string().dimmed()),
            SortEvent::Failed { .. } | SortEvent::Unreadable { .. } => {
                format!("{} {}", "⚠".red(), event.to_string().red())
            }
        };
        self.print(line);
    }

    fn progress(&mut self, done: usize, total: usize) {
        let pb = self
            .progress
            .get_or_insert_with(|| OutputFormatter::create_progress_bar(total as u64));
        pb.set_length(total as u64);
        pb.set_position(done as u64);
        if done >= total {
            pb.finish_and_clear();
        }
    }
}
