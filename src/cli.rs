//! Command-line orchestration for tidytree.
//!
//! This module wires the components of a sorting run together:
//! - root path validation
//! - the recursive walk that classifies and relocates files
//! - empty-directory pruning
//! - history recording and the activity summary
//! - dry-run analysis and undo handling

use crate::file_organizer::OperationLog;
use crate::output::OutputFormatter;
use crate::pruner::prune_empty_dirs;
use crate::undo::UndoManager;
use crate::walker::Walker;
use std::collections::HashMap;
use std::path::Path;

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy)]
pub enum SortCommand {
    /// Sort a directory tree into category folders.
    Sort {
        /// If true, simulate the run without making changes.
        dry_run: bool,
    },
    /// Undo the previous sorting run.
    Undo,
}

/// Runs the CLI application with the given command and root path.
///
/// Partial failures (a single file or directory that could not be processed)
/// are reported and never returned as errors; only the invalid-root
/// precondition and a missing undo history make this function fail.
///
/// # Examples
///
/// ```no_run
/// use tidytree::cli::{SortCommand, run_cli};
/// use std::path::Path;
///
/// let result = run_cli(SortCommand::Sort { dry_run: false }, Path::new("/path/to/tree"));
/// match result {
///     Ok(()) => println!("Done"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: SortCommand, root: &Path) -> Result<(), String> {
    match command {
        SortCommand::Sort { dry_run } => {
            if dry_run {
                sort_directory_dry_run(root)
            } else {
                sort_directory(root)
            }
        }
        SortCommand::Undo => undo_sorting(root),
    }
}

/// Validates that the root exists and is a directory.
///
/// Checked once before any mutation; a bad path aborts the run with a
/// diagnostic and no traversal occurs.
fn validate_root(root: &Path) -> Result<(), String> {
    if !root.is_dir() {
        return Err(format!("Wrong path: {}", root.display()));
    }
    Ok(())
}

/// Sorts a directory tree into category folders.
///
/// This function:
/// 1. Validates the root path
/// 2. Walks the tree, moving every classified file into `root/<category>/`
/// 3. Prunes directories left empty by the moves
/// 4. Saves the operation history for potential undo
/// 5. Prints the per-category summary
fn sort_directory(root: &Path) -> Result<(), String> {
    validate_root(root)?;

    OutputFormatter::info(&format!("Sorting contents of: {}", root.display()));

    let report = Walker::new(root).run();

    for (path, error) in &report.failures {
        OutputFormatter::error(&format!("{}: {}", path.display(), error));
    }

    let prune_failures = prune_empty_dirs(root);
    for (path, error) in &prune_failures {
        OutputFormatter::error(&format!(
            "Could not remove empty directory {}: {}",
            path.display(),
            error
        ));
    }

    // Overwrite the history only when this run actually moved something,
    // so a no-op rerun keeps the previous run undoable.
    if !report.records.is_empty() {
        let mut log = OperationLog::new(root.to_path_buf());
        for record in &report.records {
            log.add_record(record);
        }
        match log.save(root) {
            Ok(()) => OutputFormatter::success(&format!(
                "History saved. Use 'tidytree {} --undo' to revert changes.",
                root.display()
            )),
            Err(e) => OutputFormatter::warning(&format!("Could not save history: {}", e)),
        }
    }

    OutputFormatter::plain(&report.summary.render(root));

    if !report.failures.is_empty() || !prune_failures.is_empty() {
        OutputFormatter::warning("Some entries could not be processed. Please review errors above.");
    }

    Ok(())
}

/// Simulates a sorting run without making any changes.
///
/// Performs the same traversal and classification as `sort_directory` and
/// prints the planned destination for every classified file, followed by
/// per-category counts. Nothing on disk is touched.
fn sort_directory_dry_run(root: &Path) -> Result<(), String> {
    validate_root(root)?;

    OutputFormatter::info(&format!("DRY RUN: Analyzing contents of: {}", root.display()));

    let planned = Walker::new(root).plan();

    if planned.is_empty() {
        OutputFormatter::plain("No files found to sort.");
        return Ok(());
    }

    OutputFormatter::header("DRY RUN: Files would be sorted as follows:");
    let mut category_counts: HashMap<&str, usize> = HashMap::new();
    for (path, category) in &planned {
        OutputFormatter::plain(&format!(
            " - {} → {}/",
            path.display(),
            category.dir_name()
        ));
        *category_counts.entry(category.dir_name()).or_insert(0) += 1;
    }

    OutputFormatter::header("DRY RUN SUMMARY:");
    OutputFormatter::plain(&format!("Total files: {}", planned.len()));

    // Sort category names for consistent output.
    let mut categories: Vec<_> = category_counts.iter().collect();
    categories.sort_by_key(|&(name, _)| name);
    for (category, count) in categories {
        OutputFormatter::plain(&format!(
            "  {}: {} {}",
            category,
            count,
            if *count == 1 { "file" } else { "files" }
        ));
    }

    OutputFormatter::success("Dry run complete. No files were modified.");
    Ok(())
}

/// Undoes the previous sorting run.
///
/// Loads the operation history, reverses all recorded moves behind a
/// progress bar, reports skipped and failed restorations, and keeps the
/// history file when anything could not be restored.
fn undo_sorting(root: &Path) -> Result<(), String> {
    OutputFormatter::info("Undoing previous sorting run...");

    // Load the history once; the same log sizes the progress bar and feeds
    // the restore loop.
    let log = match OperationLog::load(root) {
        Ok(Some(log)) => log,
        Ok(None) => return Err("No previous sorting run found to undo".to_string()),
        Err(e) => return Err(format!("Error: {}", e)),
    };

    let pb = OutputFormatter::create_progress_bar(log.operations.len() as u64);
    let report = UndoManager::undo_log(root, &log, || pb.inc(1));
    pb.finish_and_clear();

    OutputFormatter::success("Undo complete!");
    OutputFormatter::plain(&format!("  Restored: {}", report.restored_files));

    if !report.skipped_files.is_empty() {
        OutputFormatter::plain(&format!("  Skipped: {}", report.skipped_files.len()));
        for (path, reason) in &report.skipped_files {
            OutputFormatter::plain(&format!("    - {}: {}", path.display(), reason));
        }
    }

    if !report.failed_restores.is_empty() {
        OutputFormatter::plain(&format!("  Failed: {}", report.failed_restores.len()));
        for (path, reason) in &report.failed_restores {
            OutputFormatter::error(&format!("    - {}: {}", path.display(), reason));
        }
    }

    // Skipped files also keep the history file, not just hard failures.
    if !report.is_complete_success() {
        OutputFormatter::warning(
            "History file was NOT deleted. Please fix the issues and try again.",
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_cli_invalid_root() {
        let result = run_cli(
            SortCommand::Sort { dry_run: false },
            Path::new("/non/existent/path"),
        );
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Wrong path"));
    }

    #[test]
    fn test_run_cli_root_is_a_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("not_a_dir.txt");
        fs::write(&file_path, "data").unwrap();

        let result = run_cli(SortCommand::Sort { dry_run: false }, &file_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_cli_sorts_and_prunes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        fs::write(root.join("a.jpg"), "a").unwrap();
        fs::create_dir(root.join("x")).unwrap();
        fs::write(root.join("x").join("c.png"), "c").unwrap();

        run_cli(SortCommand::Sort { dry_run: false }, root).expect("Sort failed");

        assert!(root.join("images").join("a.jpg").exists());
        assert!(root.join("images").join("c.png").exists());
        assert!(!root.join("x").exists());
    }

    #[test]
    fn test_run_cli_dry_run_moves_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        fs::write(root.join("a.jpg"), "a").unwrap();

        run_cli(SortCommand::Sort { dry_run: true }, root).expect("Dry run failed");

        assert!(root.join("a.jpg").exists());
        assert!(!root.join("images").exists());
    }

    #[test]
    fn test_run_cli_undo_without_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = run_cli(SortCommand::Undo, temp_dir.path());
        assert!(result.is_err());
    }
}
