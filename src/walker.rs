/// Recursive traversal of the sorting root.
///
/// Walks the tree depth-first, hands every file to the mover and skips
/// directories named after a category so already-sorted content is never
/// re-scanned. Each directory's entry list is collected before any of its
/// files are moved, so mutation during the walk cannot skip or duplicate
/// entries.
use crate::file_category::Category;
use crate::file_organizer::{FileMover, MoveRecord, SortError};
use crate::summary::SortSummary;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything one walk produced: the rendered-summary input, the move
/// records feeding the history log, and the per-item failures.
#[derive(Debug, Default)]
pub struct WalkReport {
    /// Per-category filename lists for the textual summary.
    pub summary: SortSummary,
    /// One record per relocated file, in move order.
    pub records: Vec<MoveRecord>,
    /// Per-file and per-directory failures; the walk continues past each.
    pub failures: Vec<(PathBuf, SortError)>,
}

/// Depth-first walker that drives the mover over a directory tree.
pub struct Walker {
    root: PathBuf,
    mover: FileMover,
    excluded: HashSet<String>,
}

impl Walker {
    /// Creates a walker for one run over `root`.
    pub fn new(root: &Path) -> Self {
        let mover = FileMover::new(root);
        let excluded = mover.table().excluded_dir_names();
        Self {
            root: root.to_path_buf(),
            mover,
            excluded,
        }
    }

    /// Walks the whole tree, moving every classified file into its category
    /// folder under the root.
    ///
    /// Failures to move a single file or read a single directory are
    /// collected in the report; one bad entry never aborts the run.
    pub fn run(&self) -> WalkReport {
        let mut report = WalkReport::default();
        self.walk_dir(&self.root, &mut report);
        report
    }

    fn walk_dir(&self, dir: &Path, report: &mut WalkReport) {
        // Snapshot the entry list before mutating the directory.
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                report.failures.push((
                    dir.to_path_buf(),
                    SortError::DirectoryReadFailed {
                        path: dir.to_path_buf(),
                        source: e,
                    },
                ));
                return;
            }
        };

        let mut files: Vec<PathBuf> = Vec::new();
        let mut subdirs: Vec<PathBuf> = Vec::new();
        for entry in entries.flatten() {
            if let Ok(file_type) = entry.file_type() {
                if file_type.is_file() {
                    files.push(entry.path());
                } else if file_type.is_dir() && !self.is_excluded(&entry.path()) {
                    subdirs.push(entry.path());
                }
            }
        }

        // Files at this level first, then recurse; matches log ordering.
        for file_path in files {
            match self.mover.move_file(&file_path) {
                Ok(Some(record)) => {
                    report
                        .summary
                        .record(record.category, record.final_name.clone());
                    report.records.push(record);
                }
                Ok(None) => {}
                Err(e) => report.failures.push((file_path, e)),
            }
        }

        for subdir in subdirs {
            self.walk_dir(&subdir, report);
        }
    }

    /// Lists every classified file in the tree with its destination
    /// category, without moving anything. Used for dry runs.
    pub fn plan(&self) -> Vec<(PathBuf, Category)> {
        let mut planned = Vec::new();
        self.plan_dir(&self.root, &mut planned);
        planned
    }

    fn plan_dir(&self, dir: &Path, planned: &mut Vec<(PathBuf, Category)>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        let mut subdirs: Vec<PathBuf> = Vec::new();
        for entry in entries.flatten() {
            if let Ok(file_type) = entry.file_type() {
                if file_type.is_file() {
                    if let Some(category) = self.mover.classify_path(&entry.path()) {
                        planned.push((entry.path(), category));
                    }
                } else if file_type.is_dir() && !self.is_excluded(&entry.path()) {
                    subdirs.push(entry.path());
                }
            }
        }

        for subdir in subdirs {
            self.plan_dir(&subdir, planned);
        }
    }

    /// Category folder names are treated as already sorted at any depth.
    fn is_excluded(&self, dir: &Path) -> bool {
        dir.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.excluded.contains(name))
    }
}
