/// Per-run activity summary.
///
/// Accumulates the filenames moved into each category during one sorting run
/// and renders the human-readable report printed at the end. The summary is
/// created fresh per invocation and discarded after rendering; persistence
/// across runs is the history log's job.
use crate::file_category::Category;
use std::path::Path;

/// Ordered per-category lists of moved filenames.
///
/// Categories appear in first-use order, filenames in move order.
#[derive(Debug, Default)]
pub struct SortSummary {
    entries: Vec<(Category, Vec<String>)>,
}

impl SortSummary {
    /// Creates an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one moved file under its category.
    ///
    /// `final_name` is the filename inside the category folder, i.e. the
    /// renamed form when a collision occurred.
    pub fn record(&mut self, category: Category, final_name: String) {
        if let Some((_, names)) = self.entries.iter_mut().find(|(c, _)| *c == category) {
            names.push(final_name);
        } else {
            self.entries.push((category, vec![final_name]));
        }
    }

    /// Returns true if no files were moved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the total number of files moved.
    pub fn total_moved(&self) -> usize {
        self.entries.iter().map(|(_, names)| names.len()).sum()
    }

    /// Renders the summary: one `---<category>---` block per category used,
    /// filenames comma-joined, then the completion line naming the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidytree::file_category::Category;
    /// use tidytree::summary::SortSummary;
    /// use std::path::Path;
    ///
    /// let mut summary = SortSummary::new();
    /// summary.record(Category::Image, "a.jpg".to_string());
    /// let text = summary.render(Path::new("/tmp/photos"));
    /// assert!(text.contains("---images---"));
    /// assert!(text.contains("a.jpg"));
    /// ```
    pub fn render(&self, root: &Path) -> String {
        let mut out = String::new();
        for (category, names) in &self.entries {
            out.push_str(&format!("---{}---\n", category.dir_name()));
            out.push_str(&names.join(", "));
            out.push('\n');
        }
        out.push_str(&format!(
            "Sorting in the {} catalog has been completed successfully.",
            root.display()
        ));
        out
    }
}
