/// Undo support for reverting a sorting run.
///
/// Moves files back to their recorded original locations using the history
/// log written at the root. Because the pruner removes directories emptied
/// by the run, restoring a file may first need to recreate its original
/// parent directory.
use crate::file_category::Category;
use crate::file_organizer::{Operation, OperationLog, SortError, SortResult};
use std::fs;
use std::path::{Path, PathBuf};

/// The outcome of an undo run.
#[derive(Debug)]
pub struct UndoReport {
    /// Number of files successfully restored.
    pub restored_files: usize,
    /// Files that failed to restore, with the reason.
    pub failed_restores: Vec<(PathBuf, String)>,
    /// Files that were skipped (e.g. no longer at their sorted location).
    pub skipped_files: Vec<(PathBuf, String)>,
}

impl UndoReport {
    fn new() -> Self {
        Self {
            restored_files: 0,
            failed_restores: Vec::new(),
            skipped_files: Vec::new(),
        }
    }

    /// Returns true if every recorded operation was restored.
    pub fn is_complete_success(&self) -> bool {
        self.failed_restores.is_empty() && self.skipped_files.is_empty()
    }
}

/// Reverts the most recent sorting run recorded at a root.
pub struct UndoManager;

impl UndoManager {
    /// Undoes the most recent sorting run.
    ///
    /// Loads the history log from `root`, then reverses the recorded moves
    /// in LIFO order, calling `on_restore` after each attempt (used by the
    /// CLI to advance a progress bar).
    ///
    /// # Edge cases handled
    ///
    /// * **Pruned source directory**: recreated before the file is moved back
    /// * **File not found**: skipped with a note
    /// * **Name conflict at the original location**: the conflicting file is
    ///   backed up with a timestamp suffix
    /// * **Permission denied**: recorded as a failure with the reason
    /// * **Missing history**: returns an error, no undo is available
    ///
    /// The history file is deleted, and category folders left empty are
    /// removed, only when every operation restored cleanly.
    pub fn undo(root: &Path, on_restore: impl FnMut()) -> SortResult<UndoReport> {
        if !root.exists() {
            return Err(SortError::InvalidRootPath {
                path: root.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "root path does not exist",
                ),
            });
        }

        let log = OperationLog::load(root)?;
        let log = log.ok_or_else(|| SortError::InvalidHistoryFormat {
            reason: "No previous sorting run found to undo".to_string(),
        })?;

        Ok(Self::undo_log(root, &log, on_restore))
    }

    /// Reverses the moves of an already-loaded history log.
    ///
    /// The CLI loads the log once to size its progress bar and passes the
    /// same log here, so the count and the restored operations cannot come
    /// from two different reads of the history file.
    pub fn undo_log(
        root: &Path,
        log: &OperationLog,
        mut on_restore: impl FnMut(),
    ) -> UndoReport {
        let mut report = UndoReport::new();
        for operation in log.operations.iter().rev() {
            match Self::restore_file(operation) {
                Ok(()) => report.restored_files += 1,
                Err((path, reason)) => {
                    if reason.contains("not found") {
                        report.skipped_files.push((path, reason));
                    } else {
                        report.failed_restores.push((path, reason));
                    }
                }
            }
            on_restore();
        }

        if report.is_complete_success() {
            if let Err(e) = OperationLog::delete(root) {
                eprintln!("Warning: Could not delete history file: {}", e);
            }
            Self::remove_empty_category_dirs(root);
        }

        report
    }

    /// Restores a single file to its original location.
    fn restore_file(operation: &Operation) -> Result<(), (PathBuf, String)> {
        if !operation.new_path.exists() {
            return Err((
                operation.new_path.clone(),
                "File not found at sorted location".to_string(),
            ));
        }

        // The pruner may have removed the original parent directory.
        if let Some(parent) = operation.original_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                (
                    operation.original_path.clone(),
                    format!("Could not recreate original directory: {}", e),
                )
            })?;
        }

        if operation.original_path.exists() {
            let backup_path = Self::generate_backup_path(&operation.original_path);
            fs::rename(&operation.original_path, &backup_path).map_err(|e| {
                (
                    operation.original_path.clone(),
                    format!("Could not backup conflicting file: {}", e),
                )
            })?;
        }

        fs::rename(&operation.new_path, &operation.original_path).map_err(|e| {
            (
                operation.new_path.clone(),
                format!("Failed to restore file: {}", e),
            )
        })?;

        Ok(())
    }

    /// Removes category folders left empty once their contents moved back.
    ///
    /// Folders still holding files from earlier runs are kept.
    fn remove_empty_category_dirs(root: &Path) {
        for category in Category::ALL {
            let dir = root.join(category.dir_name());
            if dir.is_dir()
                && let Ok(mut entries) = fs::read_dir(&dir)
                && entries.next().is_none()
            {
                let _ = fs::remove_dir(&dir);
            }
        }
    }

    /// Generates a backup path for a file by appending a timestamp.
    ///
    /// Example: `file.txt` becomes `file.txt.bak.20250824-143052`
    fn generate_backup_path(original_path: &Path) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let filename = original_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file");

        let backup_name = format!("{}.bak.{}", filename, timestamp);

        if let Some(parent) = original_path.parent() {
            parent.join(backup_name)
        } else {
            PathBuf::from(backup_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_organizer::FileMover;
    use std::fs;
    use tempfile::TempDir;

    fn sort_and_log(root: &Path, files: &[&Path]) {
        let mover = FileMover::new(root);
        let mut log = OperationLog::new(root.to_path_buf());
        for file in files {
            let record = mover
                .move_file(file)
                .expect("Failed to move file")
                .expect("File should be classified");
            log.add_record(&record);
        }
        log.save(root).expect("Failed to save history");
    }

    #[test]
    fn test_undo_no_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = UndoManager::undo(temp_dir.path(), || {});
        assert!(result.is_err());
    }

    #[test]
    fn test_undo_single_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let file_path = root.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");
        sort_and_log(root, &[&file_path]);

        assert!(!file_path.exists());
        assert!(root.join("documents").join("test.txt").exists());

        let report = UndoManager::undo(root, || {}).expect("Undo failed");

        assert_eq!(report.restored_files, 1);
        assert!(report.is_complete_success());
        assert!(file_path.exists());
        // Emptied category folder and history file are cleaned up.
        assert!(!root.join("documents").exists());
        assert!(OperationLog::load(root).unwrap().is_none());
    }

    #[test]
    fn test_undo_recreates_pruned_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let subdir = root.join("x");
        fs::create_dir(&subdir).unwrap();
        let file_path = subdir.join("c.png");
        fs::write(&file_path, "c").unwrap();
        sort_and_log(root, &[&file_path]);

        // Simulate the pruner removing the emptied source directory.
        fs::remove_dir(&subdir).unwrap();

        let report = UndoManager::undo(root, || {}).expect("Undo failed");

        assert_eq!(report.restored_files, 1);
        assert!(report.is_complete_success());
        assert!(file_path.exists());
    }

    #[test]
    fn test_undo_with_file_name_conflict() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let file_path = root.join("test.txt");
        fs::write(&file_path, "original content").expect("Failed to write file");
        sort_and_log(root, &[&file_path]);

        // A new file appeared at the original location since the run.
        fs::write(&file_path, "new content").expect("Failed to create conflict");

        let report = UndoManager::undo(root, || {}).expect("Undo failed");

        assert_eq!(report.restored_files, 1);
        assert_eq!(report.failed_restores.len(), 0);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "original content");

        let backup_files: Vec<_> = fs::read_dir(root)
            .expect("Failed to read dir")
            .filter_map(|e| {
                e.ok().and_then(|entry| {
                    let path = entry.path();
                    if path.file_name()?.to_string_lossy().contains("bak") {
                        Some(path)
                    } else {
                        None
                    }
                })
            })
            .collect();
        assert_eq!(backup_files.len(), 1);
    }

    #[test]
    fn test_undo_with_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let operation = Operation {
            original_path: root.join("nonexistent.txt"),
            new_path: root.join("documents").join("nonexistent.txt"),
            category: "documents".to_string(),
        };
        let mut log = OperationLog::new(root.to_path_buf());
        log.operations.push(operation);
        log.save(root).expect("Failed to save history");

        let report = UndoManager::undo(root, || {}).expect("Undo failed");

        assert_eq!(report.restored_files, 0);
        assert_eq!(report.skipped_files.len(), 1);
        // A skip is not a complete success, so the history file stays.
        assert!(!report.is_complete_success());
        assert!(OperationLog::load(root).unwrap().is_some());
    }

    #[test]
    fn test_undo_log_restores_from_the_given_log() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let file_path = root.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");
        sort_and_log(root, &[&file_path]);

        let log = OperationLog::load(root)
            .expect("Failed to load history")
            .expect("History should exist");
        // Remove the on-disk history; the in-memory log must be the one used.
        OperationLog::delete(root).expect("Failed to delete history");

        let mut restores = 0;
        let report = UndoManager::undo_log(root, &log, || restores += 1);

        assert_eq!(report.restored_files, 1);
        assert_eq!(restores, log.operations.len());
        assert!(file_path.exists());
    }

    #[test]
    fn test_undo_keeps_category_dir_with_older_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        // A file from a previous run already lives in the category folder.
        fs::create_dir(root.join("images")).unwrap();
        fs::write(root.join("images").join("old.png"), "old").unwrap();

        let file_path = root.join("new.jpg");
        fs::write(&file_path, "new").unwrap();
        sort_and_log(root, &[&file_path]);

        let report = UndoManager::undo(root, || {}).expect("Undo failed");

        assert!(report.is_complete_success());
        assert!(file_path.exists());
        assert!(root.join("images").join("old.png").exists());
    }

    #[test]
    fn test_undo_invalid_root_path() {
        let result = UndoManager::undo(Path::new("/non/existent/path"), || {});
        assert!(result.is_err());
    }
}
