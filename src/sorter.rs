//! The sorting engine.
//!
//! A run scans a root directory, classifies every candidate file by its
//! extension and moves it into the matching category folder under the root.
//! Nothing is ever overwritten: when the destination name is taken, ` (n)`
//! is inserted before the extension until a free name is found.
//!
//! In simulation mode the same plan is computed and reported, but no
//! directory is created and no file is moved.
use crate::config::{CompiledFilters, Exclusion};
use crate::file_category::{Category, FileMapper};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Errors that can occur while sorting.
///
/// The first three are fatal and abort a run before any file is touched.
/// The rest only ever concern a single file and are reported as
/// [`SortEvent::Failed`].
#[derive(Debug, Error)]
pub enum SortError {
    /// The root directory does not exist.
    #[error("Directory not found: {}", .path.display())]
    RootNotFound { path: PathBuf },
    /// The root path exists but is not a directory.
    #[error("Not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },
    /// The root directory could not be read.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to read the modification time of a file.
    #[error("Failed to read metadata of {}: {source}", .path.display())]
    MetadataFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its category directory.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Result type for sorting operations.
pub type SortResult<T> = Result<T, SortError>;

/// Options for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOptions {
    /// Also sort files found in subdirectories.
    pub recursive: bool,
    /// Compute and report the plan without touching the filesystem.
    pub simulate: bool,
    /// Place categories with a date layout under `YYYY/MM` subfolders.
    pub date_subfolders: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            simulate: false,
            date_subfolders: true,
        }
    }
}

/// Where a single file goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// `destination` relative to the root, used for display.
    pub relative_destination: PathBuf,
    pub category: Category,
}

impl MovePlan {
    /// True if the file had to be renamed to avoid a collision.
    pub fn renamed(&self) -> bool {
        self.source.file_name() != self.destination.file_name()
    }
}

/// One notification per processed or skipped file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortEvent {
    /// Simulation only: the file would be moved.
    Planned(MovePlan),
    Moved(MovePlan),
    Skipped { path: PathBuf, reason: Exclusion },
    Failed { path: PathBuf, reason: String },
    /// A directory below the root could not be listed during the walk.
    Unreadable { path: PathBuf, reason: String },
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

impl std::fmt::Display for SortEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortEvent::Planned(plan) | SortEvent::Moved(plan) => {
                let name = display_name(&plan.source);
                if plan.renamed() {
                    write!(f, "{}  →  {}", name, plan.relative_destination.display())
                } else {
                    let dir = plan
                        .relative_destination
                        .parent()
                        .unwrap_or(Path::new(""));
                    write!(f, "{}  →  {}/", name, dir.display())
                }
            }
            SortEvent::Skipped { path, reason } => {
                write!(f, "{} skipped ({})", display_name(path), reason)
            }
            SortEvent::Failed { path, reason } => {
                write!(f, "Error moving '{}': {}", display_name(path), reason)
            }
            SortEvent::Unreadable { path, reason } => {
                write!(f, "Could not read '{}': {}", display_name(path), reason)
            }
        }
    }
}

/// Receives the events and progress of a run.
///
/// Any `FnMut(&SortEvent)` closure is a reporter that ignores progress.
pub trait SortReporter {
    fn event(&mut self, event: &SortEvent);

    /// Called with `done == 0` before the first file and after every file.
    fn progress(&mut self, _done: usize, _total: usize) {}
}

impl<F> SortReporter for F
where
    F: FnMut(&SortEvent),
{
    fn event(&mut self, event: &SortEvent) {
        self(event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    pub root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub simulated: bool,
    /// Number of files that passed the filters.
    pub candidates: usize,
    /// Files moved (or planned, when simulating) per category folder.
    pub moved: BTreeMap<String, usize>,
    pub skipped: Vec<SkippedFile>,
    pub failures: Vec<FailedFile>,
}

impl SortReport {
    fn new(root: PathBuf, simulated: bool) -> Self {
        Self {
            root,
            started_at: Utc::now(),
            simulated,
            candidates: 0,
            moved: BTreeMap::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn total_moved(&self) -> usize {
        self.moved.values().sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Returns `destination` if nothing occupies it, otherwise the first free
/// `stem (n).ext` sibling, counting from 1.
///
/// Paths in `taken` count as occupied even if they do not exist yet.
///
/// # Examples
///
/// ```no_run
/// use foldersort::sorter::unique_destination;
/// use std::collections::HashSet;
/// use std::path::Path;
///
/// // With Text/a.txt already present:
/// let dest = unique_destination(Path::new("Text/a.txt"), &HashSet::new());
/// assert_eq!(dest, Path::new("Text/a (1).txt"));
/// ```
pub fn unique_destination(destination: &Path, taken: &HashSet<PathBuf>) -> PathBuf {
    let is_free = |path: &Path| path.symlink_metadata().is_err() && !taken.contains(path);

    if is_free(destination) {
        return destination.to_path_buf();
    }

    let stem = destination.file_stem().unwrap_or_default();
    let extension = destination.extension();

    let mut n: u64 = 1;
    loop {
        let mut name = OsString::from(stem);
        name.push(format!(" ({n})"));
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }

        let candidate = destination.with_file_name(name);
        if is_free(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Sorts the files of a directory into category folders.
pub struct Sorter {
    mapper: FileMapper,
    filters: CompiledFilters,
    options: SortOptions,
}

impl Sorter {
    /// Creates a sorter with the standard category table and default filters.
    pub fn new(options: SortOptions) -> Self {
        Self {
            mapper: FileMapper::default(),
            filters: CompiledFilters::default(),
            options,
        }
    }

    pub fn with_mapper(mut self, mapper: FileMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn options(&self) -> &SortOptions {
        &self.options
    }

    /// Sorts `root`, reporting every file to `reporter`.
    ///
    /// Returns an error only when the root itself is unusable; in that case
    /// the reporter is never called. Per-file problems are reported as
    /// [`SortEvent::Failed`] and the run carries on.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foldersort::sorter::{SortEvent, SortOptions, Sorter};
    /// use std::path::Path;
    ///
    /// let sorter = Sorter::new(SortOptions { simulate: true, ..Default::default() });
    /// let report = sorter
    ///     .run(Path::new("/home/me/Downloads"), &mut |event: &SortEvent| println!("{event}"))
    ///     .expect("root should be a directory");
    /// println!("{} files would move", report.total_moved());
    /// ```
    pub fn run<R>(&self, root: &Path, reporter: &mut R) -> SortResult<SortReport>
    where
        R: SortReporter + ?Sized,
    {
        let root = resolve_root(root)?;
        let mut report = SortReport::new(root.clone(), self.options.simulate);

        let candidates = self.collect_candidates(&root, reporter, &mut report);
        let total = candidates.len();
        report.candidates = total;
        reporter.progress(0, total);

        let mut planned = HashSet::new();
        for (index, source) in candidates.iter().enumerate() {
            match self.process(&root, source, &mut planned) {
                Ok(plan) => {
                    *report
                        .moved
                        .entry(plan.category.dir_name().to_string())
                        .or_insert(0) += 1;
                    let event = if self.options.simulate {
                        SortEvent::Planned(plan)
                    } else {
                        SortEvent::Moved(plan)
                    };
                    reporter.event(&event);
                }
                Err(e) => record_failure(source, e.to_string(), reporter, &mut report),
            }
            reporter.progress(index + 1, total);
        }

        Ok(report)
    }

    /// Computes where `source` would go without touching the filesystem.
    pub fn plan(
        &self,
        root: &Path,
        source: &Path,
        taken: &HashSet<PathBuf>,
    ) -> SortResult<MovePlan> {
        let category = self.mapper.categorize_path(source);
        let mut dir = root.join(category.dir_name());

        if self.options.date_subfolders
            && let Some(layout) = category.date_layout()
        {
            let modified = fs::metadata(source)
                .and_then(|m| m.modified())
                .map_err(|e| SortError::MetadataFailed {
                    path: source.to_path_buf(),
                    source: e,
                })?;
            let stamp = DateTime::<Local>::from(modified).format(layout).to_string();
            dir.extend(stamp.split('/'));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| SortError::FileMoveFailure {
                from: source.to_path_buf(),
                to: dir.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
            })?;

        let destination = unique_destination(&dir.join(file_name), taken);
        let relative_destination = destination
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| destination.clone());

        Ok(MovePlan {
            source: source.to_path_buf(),
            destination,
            relative_destination,
            category,
        })
    }

    fn process(
        &self,
        root: &Path,
        source: &Path,
        planned: &mut HashSet<PathBuf>,
    ) -> SortResult<MovePlan> {
        let mut plan = self.plan(root, source, planned)?;

        if !self.options.simulate {
            if let Some(dir) = plan.destination.parent() {
                fs::create_dir_all(dir).map_err(|e| SortError::DirectoryCreationFailed {
                    path: dir.to_path_buf(),
                    source: e,
                })?;
            }

            // Someone else may take the name between planning and moving.
            while let Err(e) = move_without_overwrite(&plan.source, &plan.destination) {
                if e.kind() != io::ErrorKind::AlreadyExists {
                    return Err(SortError::FileMoveFailure {
                        from: plan.source.clone(),
                        to: plan.destination.clone(),
                        source: e,
                    });
                }
                plan = self.plan(root, source, planned)?;
            }
        }

        planned.insert(plan.destination.clone());
        Ok(plan)
    }

    fn collect_candidates<R>(
        &self,
        root: &Path,
        reporter: &mut R,
        report: &mut SortReport,
    ) -> Vec<PathBuf>
    where
        R: SortReporter + ?Sized,
    {
        let max_depth = if self.options.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry));

        let mut candidates = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    let reason = e.to_string();
                    report.failures.push(FailedFile {
                        path: path.clone(),
                        reason: reason.clone(),
                    });
                    reporter.event(&SortEvent::Unreadable { path, reason });
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let exclusion = if file_type.is_symlink() {
                Some(Exclusion::Symlink)
            } else {
                self.filters.exclusion(relative)
            };

            if let Some(reason) = exclusion {
                report.skipped.push(SkippedFile {
                    path: entry.path().to_path_buf(),
                    reason: reason.to_string(),
                });
                reporter.event(&SortEvent::Skipped {
                    path: entry.path().to_path_buf(),
                    reason,
                });
                continue;
            }

            if !file_type.is_file() {
                continue;
            }

            candidates.push(entry.into_path());
        }

        candidates
    }

    /// Directories the walk must not enter: category folders directly under
    /// the root, and whatever the filters reject.
    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        if entry.depth() == 1 && Category::is_category_dir(&entry.file_name().to_string_lossy())
        {
            return true;
        }
        !self.filters.should_descend(entry.path())
    }
}

fn record_failure<R>(path: &Path, reason: String, reporter: &mut R, report: &mut SortReport)
where
    R: SortReporter + ?Sized,
{
    report.failures.push(FailedFile {
        path: path.to_path_buf(),
        reason: reason.clone(),
    });
    reporter.event(&SortEvent::Failed {
        path: path.to_path_buf(),
        reason,
    });
}

/// Moves `from` to `to`, failing with `AlreadyExists` instead of replacing
/// an existing `to`.
///
/// Uses a hard link followed by removal of the source. Where hard links are
/// not available (another filesystem, FAT volumes) it falls back to a rename.
pub fn move_without_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    match fs::hard_link(from, to) {
        Ok(()) => fs::remove_file(from).inspect_err(|_| {
            let _ = fs::remove_file(to);
        }),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(e),
        Err(_) => fs::rename(from, to),
    }
}

/// Validates the root and returns its canonical form.
fn resolve_root(root: &Path) -> SortResult<PathBuf> {
    let metadata = fs::metadata(root).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SortError::RootNotFound {
            path: root.to_path_buf(),
        },
        _ => SortError::ReadDirFailed {
            path: root.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_dir() {
        return Err(SortError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let canonical = fs::canonicalize(root).map_err(|e| SortError::ReadDirFailed {
        path: root.to_path_buf(),
        source: e,
    })?;

    // Surface an unreadable root as fatal rather than as a walk error.
    fs::read_dir(&canonical).map_err(|e| SortError::ReadDirFailed {
        path: canonical.clone(),
        source: e,
    })?;

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExcludeRules, FilterRules, SortConfig};
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent");
        }
        fs::write(path, path.to_string_lossy().as_bytes()).expect("Failed to write file");
    }

    fn run_collecting(sorter: &Sorter, root: &Path) -> (SortReport, Vec<SortEvent>) {
        let mut events = Vec::new();
        let report = sorter
            .run(root, &mut |event: &SortEvent| events.push(event.clone()))
            .expect("Run failed");
        (report, events)
    }

    #[test]
    fn test_unique_destination_free_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("a.txt");

        assert_eq!(unique_destination(&dest, &HashSet::new()), dest);
    }

    #[test]
    fn test_unique_destination_appends_counter() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("a.txt");
        touch(&dest);
        touch(&temp_dir.path().join("a (1).txt"));

        assert_eq!(
            unique_destination(&dest, &HashSet::new()),
            temp_dir.path().join("a (2).txt")
        );
    }

    #[test]
    fn test_unique_destination_respects_taken_set() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("a.txt");
        let taken: HashSet<PathBuf> = [dest.clone()].into_iter().collect();

        assert_eq!(
            unique_destination(&dest, &taken),
            temp_dir.path().join("a (1).txt")
        );
    }

    #[test]
    fn test_unique_destination_without_extension_and_multiple_dots() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let readme = temp_dir.path().join("README");
        let archive = temp_dir.path().join("backup.tar.gz");
        touch(&readme);
        touch(&archive);

        assert_eq!(
            unique_destination(&readme, &HashSet::new()),
            temp_dir.path().join("README (1)")
        );
        assert_eq!(
            unique_destination(&archive, &HashSet::new()),
            temp_dir.path().join("backup.tar (1).gz")
        );
    }

    #[test]
    fn test_run_moves_files_into_categories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(&root.join("photo.jpg"));
        touch(&root.join("doc.pdf"));
        touch(&root.join("clip.mp4"));
        touch(&root.join("setup.exe"));

        let (report, events) = run_collecting(&Sorter::new(SortOptions::default()), root);

        assert!(root.join("Images/photo.jpg").is_file());
        assert!(root.join("PDFs/doc.pdf").is_file());
        assert!(root.join("Videos/clip.mp4").is_file());
        assert!(root.join("Others/setup.exe").is_file());
        assert!(!root.join("photo.jpg").exists());
        assert_eq!(report.total_moved(), 4);
        assert_eq!(report.candidates, 4);
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| matches!(e, SortEvent::Moved(_))));
    }

    #[test]
    fn test_run_reports_progress() {
        struct Progress(Vec<(usize, usize)>);
        impl SortReporter for Progress {
            fn event(&mut self, _event: &SortEvent) {}
            fn progress(&mut self, done: usize, total: usize) {
                self.0.push((done, total));
            }
        }

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        touch(&temp_dir.path().join("a.txt"));
        touch(&temp_dir.path().join("b.txt"));

        let mut progress = Progress(Vec::new());
        Sorter::new(SortOptions::default())
            .run(temp_dir.path(), &mut progress)
            .expect("Run failed");

        assert_eq!(progress.0, vec![(0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_simulation_plans_collisions_without_touching_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(&root.join("a.txt"));
        touch(&root.join("sub/a.txt"));

        let sorter = Sorter::new(SortOptions {
            recursive: true,
            simulate: true,
            ..Default::default()
        });
        let (report, events) = run_collecting(&sorter, root);

        let destinations: Vec<PathBuf> = events
            .iter()
            .filter_map(|e| match e {
                SortEvent::Planned(plan) => Some(plan.relative_destination.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            destinations,
            vec![PathBuf::from("Text/a.txt"), PathBuf::from("Text/a (1).txt")]
        );
        assert!(report.simulated);
        assert!(root.join("a.txt").is_file());
        assert!(root.join("sub/a.txt").is_file());
        assert!(!root.join("Text").exists());
    }

    #[test]
    fn test_category_folders_are_not_resorted() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(&root.join("Images/old.jpg"));
        touch(&root.join("Others/misplaced.pdf"));

        let sorter = Sorter::new(SortOptions {
            recursive: true,
            ..Default::default()
        });
        let (report, events) = run_collecting(&sorter, root);

        assert_eq!(report.candidates, 0);
        assert!(events.is_empty());
        assert!(root.join("Others/misplaced.pdf").is_file());
    }

    #[test]
    fn test_date_subfolders_for_spreadsheets() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let source = root.join("budget.xlsx");
        touch(&source);
        let modified = fs::metadata(&source).unwrap().modified().unwrap();
        let stamp = DateTime::<Local>::from(modified).format("%Y/%m").to_string();

        run_collecting(&Sorter::new(SortOptions::default()), root);

        let expected = root.join("Excel").join(stamp).join("budget.xlsx");
        assert!(expected.is_file(), "missing {}", expected.display());
    }

    #[test]
    fn test_date_subfolders_can_be_disabled() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(&root.join("letter.docx"));

        let sorter = Sorter::new(SortOptions {
            date_subfolders: false,
            ..Default::default()
        });
        run_collecting(&sorter, root);

        assert!(root.join("Word Documents/letter.docx").is_file());
    }

    #[test]
    fn test_per_file_failure_does_not_stop_run() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        // A plain file squatting on the category folder name.
        touch(&root.join("Text"));
        touch(&root.join("notes.txt"));
        touch(&root.join("photo.png"));

        let config = SortConfig {
            filters: FilterRules {
                exclude: ExcludeRules {
                    filenames: vec!["Text".to_string()],
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let sorter =
            Sorter::new(SortOptions::default()).with_filters(config.compile().unwrap());
        let (report, events) = run_collecting(&sorter, root);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(events.iter().any(|e| matches!(e, SortEvent::Failed { .. })));
        assert!(root.join("notes.txt").is_file());
        assert!(root.join("Images/photo.png").is_file());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("nope");

        let mut calls = 0;
        let result = Sorter::new(SortOptions::default())
            .run(&missing, &mut |_: &SortEvent| calls += 1);

        assert!(matches!(result, Err(SortError::RootNotFound { .. })));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_file_root_is_fatal() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("file.txt");
        touch(&file);

        let result = Sorter::new(SortOptions::default()).run(&file, &mut |_: &SortEvent| {});

        assert!(matches!(result, Err(SortError::NotADirectory { .. })));
        assert!(file.is_file());
    }

    #[test]
    fn test_event_display() {
        let plan = MovePlan {
            source: PathBuf::from("/data/a.txt"),
            destination: PathBuf::from("/data/Text/a (1).txt"),
            relative_destination: PathBuf::from("Text/a (1).txt"),
            category: Category::Text,
        };
        assert_eq!(
            SortEvent::Moved(plan).to_string(),
            "a.txt  →  Text/a (1).txt"
        );

        let plan = MovePlan {
            source: PathBuf::from("/data/photo.jpg"),
            destination: PathBuf::from("/data/Images/photo.jpg"),
            relative_destination: PathBuf::from("Images/photo.jpg"),
            category: Category::Images,
        };
        assert_eq!(
            SortEvent::Planned(plan).to_string(),
            "photo.jpg  →  Images/"
        );

        let skipped = SortEvent::Skipped {
            path: PathBuf::from("/data/.hidden"),
            reason: Exclusion::Hidden,
        };
        assert_eq!(skipped.to_string(), ".hidden skipped (hidden file)");

        let unreadable = SortEvent::Unreadable {
            path: PathBuf::from("/data/locked"),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            unreadable.to_string(),
            "Could not read 'locked': permission denied"
        );
    }

    #[test]
    fn test_move_without_overwrite_moves_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let from = temp_dir.path().join("a.txt");
        let to = temp_dir.path().join("b.txt");
        fs::write(&from, "content").expect("Failed to write file");

        move_without_overwrite(&from, &to).expect("Move failed");

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "content");
    }

    #[test]
    fn test_move_without_overwrite_refuses_existing_target() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let from = temp_dir.path().join("a.txt");
        let to = temp_dir.path().join("b.txt");
        fs::write(&from, "incoming").expect("Failed to write file");
        fs::write(&to, "already here").expect("Failed to write file");

        let err = move_without_overwrite(&from, &to).expect_err("Target must not be replaced");

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&from).unwrap(), "incoming");
        assert_eq!(fs::read_to_string(&to).unwrap(), "already here");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_reported_as_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let target = TempDir::new().expect("Failed to create temp directory");
        let real = target.path().join("real.pdf");
        touch(&real);
        std::os::unix::fs::symlink(&real, root.join("link.pdf")).expect("Failed to symlink");

        let (report, events) = run_collecting(&Sorter::new(SortOptions::default()), root);

        assert_eq!(report.candidates, 0);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(
            events,
            vec![SortEvent::Skipped {
                path: report.root.join("link.pdf"),
                reason: Exclusion::Symlink,
            }]
        );
        assert!(root.join("link.pdf").symlink_metadata().is_ok());
        assert!(real.is_file());
    }
}
