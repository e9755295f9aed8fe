//! tidytree - recursive directory sorting made easy
//!
//! This library walks a directory tree, classifies files by extension into a
//! fixed set of categories (images, documents, audio, video, archives),
//! relocates them into category folders created directly under the root,
//! resolves filename collisions with a timestamp marker, prunes directories
//! left empty and renders a per-category summary. Sorting runs are recorded
//! on disk and can be undone.

pub mod cli;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod pruner;
pub mod summary;
pub mod undo;
pub mod walker;

pub use file_category::{Category, ExtensionTable};
pub use file_organizer::{FileMover, MoveRecord, OperationLog, SortError, SortResult};
pub use pruner::prune_empty_dirs;
pub use summary::SortSummary;
pub use undo::{UndoManager, UndoReport};
pub use walker::{WalkReport, Walker};

pub use cli::{SortCommand, run_cli};
