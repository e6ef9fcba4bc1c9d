//! Command-line interface module for foldersort.
//!
//! This module handles argument parsing, configuration loading and the
//! orchestration of a sorting run, including how its results are printed.

use crate::config::SortConfig;
use crate::output::{ConsoleReporter, OutputFormatter};
use crate::sorter::{SortEvent, SortOptions, SortReport, Sorter};
use clap::Parser;
use std::path::PathBuf;

/// Sort the files of a directory into category subfolders by extension.
#[derive(Debug, Clone, Parser)]
#[command(name = "foldersort", version, about)]
pub struct Cli {
    /// Directory to sort
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub directory: PathBuf,

    /// Also sort files found in subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Show what would be moved without touching any file
    #[arg(short = 'n', long, visible_alias = "simulate")]
    pub dry_run: bool,

    /// Configuration file to use instead of the default lookup
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not put Word and Excel files into YYYY/MM subfolders
    #[arg(long)]
    pub no_date_folders: bool,

    /// Print the run report as JSON instead of human-readable output
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Merges the flags with the configuration defaults.
    pub fn sort_options(&self, config: &SortConfig) -> SortOptions {
        SortOptions {
            recursive: self.recursive || config.organize.recursive,
            simulate: self.dry_run,
            date_subfolders: config.organize.date_subfolders && !self.no_date_folders,
        }
    }
}

/// Runs the CLI application with the given arguments.
///
/// Returns an error message for fatal problems only: an unusable directory
/// or configuration. Files that could not be moved are listed in the output
/// and do not make the run fail.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use foldersort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["foldersort", "--dry-run", "/home/me/Downloads"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<SortReport, String> {
    let config = SortConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let filters = config
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))?;
    let mapper = config
        .mapper()
        .map_err(|e| format!("Error loading categories: {}", e))?;

    let options = cli.sort_options(&config);
    let sorter = Sorter::new(options)
        .with_filters(filters)
        .with_mapper(mapper);

    if cli.json {
        let report = sorter
            .run(&cli.directory, &mut |_: &SortEvent| {})
            .map_err(|e| e.to_string())?;
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Error serializing report: {}", e))?;
        println!("{}", json);
        return Ok(report);
    }

    if options.simulate {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            cli.directory.display()
        ));
    } else {
        OutputFormatter::info(&format!("Sorting contents of: {}", cli.directory.display()));
    }

    let mut reporter = ConsoleReporter::new();
    let report = sorter
        .run(&cli.directory, &mut reporter)
        .map_err(|e| e.to_string())?;

    OutputFormatter::report(&report);
    if report.simulated && report.total_moved() > 0 {
        OutputFormatter::plain(&format!(
            "Run 'foldersort {}' without --dry-run to move the files.",
            cli.directory.display()
        ));
    }

    Ok(report)
}
