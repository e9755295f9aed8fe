/// File categorization by extension.
///
/// This module maps file extensions to the five fixed sorting categories.
/// The taxonomy is fixed at build time; callers needing a different table
/// must fork it.
///
/// # Examples
///
/// ```
/// use tidytree::file_category::{Category, ExtensionTable};
///
/// let table = ExtensionTable::default();
/// assert_eq!(table.classify("png"), Some(Category::Image));
/// assert_eq!(table.classify("MP3"), Some(Category::Audio));
/// assert_eq!(table.classify("rs"), None);
/// ```
use std::collections::{HashMap, HashSet};

/// One of the fixed content-type buckets files are sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Image files (JPEG, PNG, SVG, etc.)
    Image,
    /// Document files (PDF, DOCX, TXT, etc.)
    Document,
    /// Audio files (MP3, OGG, WAV, etc.)
    Audio,
    /// Video files (AVI, MP4, MKV, etc.)
    Video,
    /// Archive files (ZIP, GZ, TAR)
    Archive,
}

impl Category {
    /// All categories, in the order their folders are conventionally listed.
    pub const ALL: [Category; 5] = [
        Category::Image,
        Category::Document,
        Category::Audio,
        Category::Video,
        Category::Archive,
    ];

    /// Returns the folder name used for this category under the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidytree::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "images");
    /// assert_eq!(Category::Archive.dir_name(), "archives");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "images",
            Category::Document => "documents",
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Archive => "archives",
        }
    }
}

/// Maps file extensions to categories.
///
/// Lookups are case-insensitive; extensions are stored uppercase without the
/// leading dot. A miss is a valid outcome meaning "leave the file in place".
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    extension_map: HashMap<String, Category>,
}

impl ExtensionTable {
    /// Creates a table with the standard extension sets.
    pub fn new() -> Self {
        let mut table = Self {
            extension_map: HashMap::new(),
        };
        table.populate_standard_mappings();
        table
    }

    fn populate_standard_mappings(&mut self) {
        for ext in ["JPEG", "PNG", "JPG", "SVG"] {
            self.add_mapping(ext, Category::Image);
        }
        for ext in ["DOC", "DOCX", "TXT", "PDF", "XLSX", "PPTX"] {
            self.add_mapping(ext, Category::Document);
        }
        for ext in ["MP3", "OGG", "WAV", "AMR"] {
            self.add_mapping(ext, Category::Audio);
        }
        for ext in ["AVI", "MP4", "MOV", "MKV"] {
            self.add_mapping(ext, Category::Video);
        }
        for ext in ["ZIP", "GZ", "TAR"] {
            self.add_mapping(ext, Category::Archive);
        }
    }

    /// Adds an extension to category mapping.
    fn add_mapping(&mut self, ext: &str, category: Category) {
        self.extension_map.insert(ext.to_uppercase(), category);
    }

    /// Maps a file extension (without the leading dot) to a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidytree::file_category::{Category, ExtensionTable};
    ///
    /// let table = ExtensionTable::default();
    /// assert_eq!(table.classify("pdf"), Some(Category::Document));
    /// assert_eq!(table.classify("Mkv"), Some(Category::Video));
    /// assert_eq!(table.classify("xyz"), None);
    /// ```
    pub fn classify(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_uppercase()).copied()
    }

    /// Returns the set of category folder names the walker must not descend
    /// into. A user directory that happens to share a category name is also
    /// skipped; the table cannot tell the two apart.
    pub fn excluded_dir_names(&self) -> HashSet<String> {
        Category::ALL
            .iter()
            .map(|c| c.dir_name().to_string())
            .collect()
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Image.dir_name(), "images");
        assert_eq!(Category::Document.dir_name(), "documents");
        assert_eq!(Category::Audio.dir_name(), "audio");
        assert_eq!(Category::Video.dir_name(), "video");
        assert_eq!(Category::Archive.dir_name(), "archives");
    }

    #[test]
    fn test_classify_images() {
        let table = ExtensionTable::default();
        assert_eq!(table.classify("jpg"), Some(Category::Image));
        assert_eq!(table.classify("jpeg"), Some(Category::Image));
        assert_eq!(table.classify("png"), Some(Category::Image));
        assert_eq!(table.classify("svg"), Some(Category::Image));
    }

    #[test]
    fn test_classify_documents() {
        let table = ExtensionTable::default();
        assert_eq!(table.classify("pdf"), Some(Category::Document));
        assert_eq!(table.classify("txt"), Some(Category::Document));
        assert_eq!(table.classify("xlsx"), Some(Category::Document));
        assert_eq!(table.classify("pptx"), Some(Category::Document));
    }

    #[test]
    fn test_classify_case_insensitive() {
        let table = ExtensionTable::default();
        assert_eq!(table.classify("PNG"), Some(Category::Image));
        assert_eq!(table.classify("Mp3"), Some(Category::Audio));
        assert_eq!(table.classify("TaR"), Some(Category::Archive));
    }

    #[test]
    fn test_classify_unknown() {
        let table = ExtensionTable::default();
        assert_eq!(table.classify("rs"), None);
        assert_eq!(table.classify("json"), None);
        assert_eq!(table.classify(""), None);
    }

    #[test]
    fn test_excluded_dir_names_cover_all_categories() {
        let table = ExtensionTable::default();
        let excluded = table.excluded_dir_names();
        assert_eq!(excluded.len(), 5);
        for category in Category::ALL {
            assert!(excluded.contains(category.dir_name()));
        }
    }
}
