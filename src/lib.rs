//! foldersort - sort the files of a directory into category folders
//!
//! This library classifies files by extension, plans collision-free
//! destinations inside category subfolders and moves the files there, or only
//! reports the plan when simulating. Filters and extra extension mappings are
//! configured through TOML files.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod output;
pub mod sorter;

pub use config::{CompiledFilters, ConfigError, SortConfig};
pub use file_category::{Category, FileMapper};
pub use sorter::{MovePlan, SortError, SortEvent, SortOptions, SortReport, SortReporter, Sorter};

pub use cli::{Cli, run_cli};
