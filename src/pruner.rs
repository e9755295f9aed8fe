/// Empty-directory pruning.
///
/// After a walk the tree is left with directories whose files have all been
/// moved out. This module removes every directory under the root that holds
/// zero entries, deepest first so that emptying a leaf can make its parent
/// eligible within the same pass. The root itself is never removed.
use std::fs;
use std::path::{Path, PathBuf};

/// Removes every empty directory under `root`, deepest first.
///
/// Category folders that ended up empty are removed under the same rule, as
/// are pre-existing empty directories unrelated to the current run. Removal
/// failures (e.g. permission denied) are collected and returned; pruning
/// continues past each.
pub fn prune_empty_dirs(root: &Path) -> Vec<(PathBuf, std::io::Error)> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    collect_dirs(root, &mut dirs);

    let mut failures = Vec::new();
    // collect_dirs records parents before children; reversed, children
    // come first and an emptied parent is still ahead in the list.
    for dir in dirs.iter().rev() {
        let is_empty = match fs::read_dir(dir) {
            Ok(mut entries) => entries.next().is_none(),
            Err(e) => {
                failures.push((dir.clone(), e));
                continue;
            }
        };
        if is_empty {
            if let Err(e) = fs::remove_dir(dir) {
                failures.push((dir.clone(), e));
            }
        }
    }
    failures
}

/// Pre-order listing of every directory strictly below `root`.
fn collect_dirs(dir: &Path, dirs: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            dirs.push(entry.path());
            collect_dirs(&entry.path(), dirs);
        }
    }
}
