//! Configuration file support.
//!
//! Settings are read from a TOML file and cover three things:
//! - Filters deciding which files are left alone
//! - Defaults for how a directory is organized
//! - Extra extension mappings on top of the built-in category table
//!
//! # Configuration File Format
//!
//! ```toml
//! [filters]
//! enable_hidden_files = false
//! skip_lock_files = true
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.tmp", "node_modules/**"]
//! extensions = ["bak"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//!
//! [organize]
//! recursive = false
//! date_subfolders = true
//!
//! [categories]
//! heif = "Images"
//! ```
//!
//! Glob patterns are matched against the path relative to the directory
//! being organized.

use crate::file_category::{Category, FileMapper};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".foldersortrc.toml";

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{0}': expected *.ext or dir/**")]
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    /// An extension mapping names a category that does not exist.
    #[error("Unknown category '{category}' for extension '{extension}'")]
    UnknownCategory { extension: String, category: String },
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortConfig {
    #[serde(default)]
    pub filters: FilterRules,

    #[serde(default)]
    pub organize: OrganizeRules,

    /// Extra `extension = "Category"` mappings.
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

/// Rules deciding which files are considered at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to include hidden files and directories (starting with ".").
    #[serde(default)]
    pub enable_hidden_files: bool,

    /// Whether to skip office lock files such as `~$report.docx`.
    #[serde(default = "default_true")]
    pub skip_lock_files: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist, overrides every other rule.
    #[serde(default)]
    pub include: IncludeRules,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: false,
            skip_lock_files: true,
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.tmp", "node_modules/**").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude (e.g., "bak", "tmp", "log").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Defaults for a run. Command-line flags can only switch these on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeRules {
    /// Descend into subdirectories.
    #[serde(default)]
    pub recursive: bool,

    /// Put Word and Excel files under `YYYY/MM` subfolders.
    #[serde(default = "default_true")]
    pub date_subfolders: bool,
}

impl Default for OrganizeRules {
    fn default() -> Self {
        Self {
            recursive: false,
            date_subfolders: true,
        }
    }
}

impl SortConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.foldersortrc.toml` in the current directory
    /// 3. Look for `~/.config/foldersort/config.toml`
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any file that is found fails to parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("foldersort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile the filter rules for matching.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }

    /// Builds the extension table, applying the `[categories]` overrides.
    pub fn mapper(&self) -> Result<FileMapper, ConfigError> {
        let mut mapper = FileMapper::default();
        for (extension, name) in &self.categories {
            let category =
                Category::from_dir_name(name).ok_or_else(|| ConfigError::UnknownCategory {
                    extension: extension.clone(),
                    category: name.clone(),
                })?;
            mapper.add_extension_mapping(extension, category);
        }
        Ok(mapper)
    }
}

/// Why a file was left out of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Hidden,
    LockFile,
    Filename,
    Extension,
    Pattern,
    Regex,
    Symlink,
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Exclusion::Hidden => "hidden file",
            Exclusion::LockFile => "office lock file",
            Exclusion::Filename => "excluded file name",
            Exclusion::Extension => "excluded extension",
            Exclusion::Pattern => "matches an exclude pattern",
            Exclusion::Regex => "matches an exclude regex",
            Exclusion::Symlink => "symbolic link",
        };
        f.write_str(reason)
    }
}

/// Filter rules with every pattern compiled up front.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    skip_lock_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self {
            enable_hidden_files: false,
            skip_lock_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            skip_lock_files: rules.skip_lock_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Check if a file should be organized.
    pub fn should_include(&self, file_path: &Path) -> bool {
        self.exclusion(file_path).is_none()
    }

    /// Returns the first rule excluding `file_path`, if any.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter, on any component of the path
    /// 3. Office lock files
    /// 4. Exact filename match
    /// 5. File extension match
    /// 6. Glob pattern match
    /// 7. Regex pattern match
    pub fn exclusion(&self, file_path: &Path) -> Option<Exclusion> {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.matches_any(&self.include_patterns, file_path) {
            return None;
        }

        if !self.enable_hidden_files && is_hidden(file_path) {
            return Some(Exclusion::Hidden);
        }

        if self.skip_lock_files && file_name.starts_with("~$") {
            return Some(Exclusion::LockFile);
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return Some(Exclusion::Filename);
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return Some(Exclusion::Extension);
            }
        }

        if self.matches_any(&self.exclude_patterns, file_path) {
            return Some(Exclusion::Pattern);
        }

        if self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
        {
            return Some(Exclusion::Regex);
        }

        None
    }

    /// Whether a recursive walk should enter the directory `dir_path`.
    ///
    /// Hidden directories are only entered when hidden files are enabled or
    /// include patterns might whitelist something inside them.
    pub fn should_descend(&self, dir_path: &Path) -> bool {
        let hidden = dir_path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'));
        self.enable_hidden_files || !hidden || !self.include_patterns.is_empty()
    }

    fn matches_any(&self, patterns: &[Pattern], file_path: &Path) -> bool {
        patterns.iter().any(|pattern| pattern.matches_path(file_path))
    }
}
