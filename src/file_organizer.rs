/// File relocation into category directories.
///
/// This module performs the single-file half of a sorting run: classifying a
/// file by extension, creating its category directory under the root on first
/// use, resolving destination name collisions and renaming the file into
/// place. It also owns the on-disk operation history that enables undo.
use crate::file_category::{Category, ExtensionTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the history file written at the root after each sorting run.
///
/// The `.json` extension is not in the category table, so the walker leaves
/// the file where it is on subsequent runs.
pub const HISTORY_FILE_NAME: &str = ".tidytree_history.json";

/// Errors that can occur during a sorting run.
#[derive(Debug)]
pub enum SortError {
    /// The root path is invalid or doesn't exist.
    InvalidRootPath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to enumerate a directory during the walk.
    DirectoryReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file into its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// Failed to write the history file.
    HistoryWriteFailed { source: std::io::Error },
    /// Failed to read the history file.
    HistoryReadFailed { source: std::io::Error },
    /// The history file has an invalid format.
    InvalidHistoryFormat { reason: String },
}

impl std::fmt::Display for SortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRootPath { path, source } => {
                write!(f, "Invalid root path {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::DirectoryReadFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::HistoryWriteFailed { source } => {
                write!(f, "Failed to write history file: {}", source)
            }
            Self::HistoryReadFailed { source } => {
                write!(f, "Failed to read history file: {}", source)
            }
            Self::InvalidHistoryFormat { reason } => {
                write!(f, "Invalid history file format: {}", reason)
            }
        }
    }
}

impl std::error::Error for SortError {}

/// Result type for sorting operations.
pub type SortResult<T> = Result<T, SortError>;

/// Records one successfully relocated file.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    /// The category the file was sorted into.
    pub category: Category,
    /// The filename inside the category folder, renamed form on collision.
    pub final_name: String,
    /// Where the file was found.
    pub original_path: PathBuf,
    /// Where the file ended up.
    pub new_path: PathBuf,
}

/// A single file movement persisted for undo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// The original path of the file before sorting.
    pub original_path: PathBuf,
    /// The new path of the file after sorting.
    pub new_path: PathBuf,
    /// The category folder the file was moved to.
    pub category: String,
}

/// A complete transaction of file movements, persisted to disk at the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationLog {
    /// ISO 8601 timestamp of when the sorting run occurred.
    pub timestamp: String,
    /// The root directory the run operated on.
    pub root_path: PathBuf,
    /// All movements performed in this run.
    pub operations: Vec<Operation>,
}

impl OperationLog {
    /// Creates a new operation log for a given root path.
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            root_path,
            operations: Vec::new(),
        }
    }

    /// Records a completed move in this log.
    pub fn add_record(&mut self, record: &MoveRecord) {
        self.operations.push(Operation {
            original_path: record.original_path.clone(),
            new_path: record.new_path.clone(),
            category: record.category.dir_name().to_string(),
        });
    }

    /// Returns the path to the history file for this root.
    fn history_file_path(root_path: &Path) -> PathBuf {
        root_path.join(HISTORY_FILE_NAME)
    }

    /// Saves this log to disk in JSON format.
    pub fn save(&self, root_path: &Path) -> SortResult<()> {
        let json_string = serde_json::to_string_pretty(self).map_err(|e| {
            SortError::HistoryWriteFailed {
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("JSON serialization failed: {}", e),
                ),
            }
        })?;

        fs::write(Self::history_file_path(root_path), json_string)
            .map_err(|e| SortError::HistoryWriteFailed { source: e })?;

        Ok(())
    }

    /// Loads the most recent operation log from disk, if one exists.
    pub fn load(root_path: &Path) -> SortResult<Option<Self>> {
        let history_path = Self::history_file_path(root_path);

        if !history_path.exists() {
            return Ok(None);
        }

        let json_string = fs::read_to_string(&history_path)
            .map_err(|e| SortError::HistoryReadFailed { source: e })?;

        let log = serde_json::from_str(&json_string).map_err(|e| {
            SortError::InvalidHistoryFormat {
                reason: format!("JSON parse error: {}", e),
            }
        })?;

        Ok(Some(log))
    }

    /// Deletes the history file for a given root path.
    pub fn delete(root_path: &Path) -> SortResult<()> {
        let history_path = Self::history_file_path(root_path);
        if history_path.exists() {
            fs::remove_file(&history_path)
                .map_err(|e| SortError::HistoryWriteFailed { source: e })?;
        }
        Ok(())
    }
}

/// Moves individual files into category folders under a fixed root.
///
/// The root is captured once per run and threaded through every move, so all
/// category folders are created as direct children of the root regardless of
/// how deep the file was found.
pub struct FileMover {
    root: PathBuf,
    table: ExtensionTable,
}

impl FileMover {
    /// Creates a mover for one sorting run over `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            table: ExtensionTable::default(),
        }
    }

    /// Returns the extension table used for classification.
    pub fn table(&self) -> &ExtensionTable {
        &self.table
    }

    /// Classifies a file by its extension, without touching it.
    ///
    /// Returns `None` for files with no extension or an extension outside
    /// the category table.
    pub fn classify_path(&self, file_path: &Path) -> Option<Category> {
        file_path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| self.table.classify(e))
    }

    /// Moves one file into its category folder under the root.
    ///
    /// Unclassified files are left untouched and yield `Ok(None)`. For
    /// classified files the category folder is created on first use, the
    /// destination name is resolved against existing entries, and the file
    /// is renamed into place.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tidytree::file_organizer::FileMover;
    /// use std::path::Path;
    ///
    /// let mover = FileMover::new(Path::new("/path/to/root"));
    /// match mover.move_file(Path::new("/path/to/root/nested/photo.png")) {
    ///     Ok(Some(record)) => println!("Moved to {}", record.new_path.display()),
    ///     Ok(None) => println!("Left in place"),
    ///     Err(e) => eprintln!("Move failed: {}", e),
    /// }
    /// ```
    pub fn move_file(&self, file_path: &Path) -> SortResult<Option<MoveRecord>> {
        let Some(category) = self.classify_path(file_path) else {
            return Ok(None);
        };

        let category_dir = self.root.join(category.dir_name());
        if !category_dir.exists() {
            fs::create_dir(&category_dir).map_err(|e| SortError::DirectoryCreationFailed {
                path: category_dir.clone(),
                source: e,
            })?;
        }

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SortError::FileMoveFailure {
                source: file_path.to_path_buf(),
                destination: category_dir.clone(),
                source_error: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        let final_name = resolve_collision(&category_dir, file_name);
        let destination_path = category_dir.join(&final_name);

        fs::rename(file_path, &destination_path).map_err(|e| SortError::FileMoveFailure {
            source: file_path.to_path_buf(),
            destination: destination_path.clone(),
            source_error: e,
        })?;

        Ok(Some(MoveRecord {
            category,
            final_name,
            original_path: file_path.to_path_buf(),
            new_path: destination_path,
        }))
    }
}

/// Returns a destination filename that does not clash with existing entries
/// in `category_dir`.
///
/// If `file_name` is free it is returned unchanged. Otherwise an `_edit_`
/// marker with a microsecond-resolution timestamp is inserted between stem
/// and extension, e.g. `song.mp3` becomes
/// `song_edit_2025-08-24_14-03-07.512391.mp3`. The generated name is not
/// re-checked; at microsecond granularity a repeat collision on the same stem
/// within one run is vanishingly unlikely.
pub fn resolve_collision(category_dir: &Path, file_name: &str) -> String {
    if !category_dir.join(file_name).exists() {
        return file_name.to_string();
    }

    let name_path = Path::new(file_name);
    let stem = name_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S%.6f");

    match name_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_edit_{}.{}", stem, timestamp, ext),
        None => format!("{}_edit_{}", stem, timestamp),
    }
}
