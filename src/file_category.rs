/// Extension-based file categorization.
///
/// Every file is sorted into exactly one [`Category`] by looking up its
/// extension in a fixed table. Lookups are case-insensitive and anything that
/// is not in the table lands in [`Category::Others`].
///
/// # Examples
///
/// ```
/// use foldersort::file_category::{Category, FileMapper};
///
/// let mapper = FileMapper::default();
/// assert_eq!(mapper.extension_to_category("jpg"), Some(Category::Images));
/// assert_eq!(mapper.extension_to_category("PDF"), Some(Category::Pdfs));
/// assert_eq!(mapper.categorize(Some("xyz")), Category::Others);
/// ```
use std::collections::HashMap;
use std::path::Path;

/// A destination category. Each one owns a subfolder of the sorted directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Raster and vector images (PNG, JPG, SVG, ...)
    Images,
    /// PDF documents
    Pdfs,
    /// Video files (MP4, MKV, ...)
    Videos,
    /// Word processor documents (DOC, DOCX, ODT)
    WordDocuments,
    /// Spreadsheets and CSV
    Excel,
    /// Plain and lightly formatted text
    Text,
    /// Everything without a known extension
    Others,
}

impl Category {
    /// All categories, in table order.
    pub const ALL: [Category; 7] = [
        Category::Images,
        Category::Pdfs,
        Category::Videos,
        Category::WordDocuments,
        Category::Excel,
        Category::Text,
        Category::Others,
    ];

    /// Returns the subfolder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldersort::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::WordDocuments.dir_name(), "Word Documents");
    /// assert_eq!(Category::Others.dir_name(), "Others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Pdfs => "PDFs",
            Category::Videos => "Videos",
            Category::WordDocuments => "Word Documents",
            Category::Excel => "Excel",
            Category::Text => "Text",
            Category::Others => "Others",
        }
    }

    /// Returns a human-readable description of this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Images => "Image files",
            Category::Pdfs => "PDF documents",
            Category::Videos => "Video files",
            Category::WordDocuments => "Word processor documents",
            Category::Excel => "Spreadsheets",
            Category::Text => "Text files",
            Category::Others => "Other files",
        }
    }

    /// Looks a category up by its folder name, ignoring case.
    pub fn from_dir_name(name: &str) -> Option<Category> {
        Self::ALL
            .into_iter()
            .find(|category| category.dir_name().eq_ignore_ascii_case(name))
    }

    /// Returns true if `name` is exactly the folder name of a category.
    pub fn is_category_dir(name: &str) -> bool {
        Self::ALL.iter().any(|category| category.dir_name() == name)
    }

    /// The `chrono` format of the dated subfolders used for this category,
    /// if it uses them. Components are separated by `/`.
    pub fn date_layout(&self) -> Option<&'static str> {
        match self {
            Category::WordDocuments | Category::Excel => Some("%Y/%m"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Maps file extensions to categories.
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<String, Category>,
}

impl FileMapper {
    /// Creates a new `FileMapper` with the standard extension table.
    pub fn new() -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        mapper.populate_standard_mappings();
        mapper
    }

    fn populate_standard_mappings(&mut self) {
        const TABLE: &[(Category, &[&str])] = &[
            (
                Category::Images,
                &[
                    "png", "jpg", "jpeg", "gif", "webp", "bmp", "tiff", "svg", "heic",
                ],
            ),
            (Category::Pdfs, &["pdf"]),
            (
                Category::Videos,
                &["mp4", "mov", "avi", "mkv", "webm", "wmv"],
            ),
            (Category::WordDocuments, &["doc", "docx", "odt"]),
            (
                Category::Excel,
                &["xls", "xlsx", "xlsm", "xlsb", "xltx", "ods", "csv"],
            ),
            (Category::Text, &["txt", "md", "rtf"]),
        ];

        for (category, extensions) in TABLE {
            for ext in *extensions {
                self.add_extension_mapping(ext, *category);
            }
        }
    }

    /// Adds or replaces an extension mapping. A leading dot is ignored.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        let ext = ext.trim_start_matches('.');
        self.extension_map.insert(ext.to_lowercase(), category);
    }

    /// Maps a file extension (without the dot) to a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldersort::file_category::{Category, FileMapper};
    ///
    /// let mapper = FileMapper::default();
    /// assert_eq!(mapper.extension_to_category("MP4"), Some(Category::Videos));
    /// assert_eq!(mapper.extension_to_category("exe"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }

    /// Determines the category for an optional extension, falling back to
    /// [`Category::Others`].
    pub fn categorize(&self, ext: Option<&str>) -> Category {
        ext.and_then(|e| self.extension_to_category(e))
            .unwrap_or(Category::Others)
    }

    /// Determines the category of a path from its extension.
    pub fn categorize_path(&self, path: &Path) -> Category {
        let ext = path.extension().map(|e| e.to_string_lossy());
        self.categorize(ext.as_deref())
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}
