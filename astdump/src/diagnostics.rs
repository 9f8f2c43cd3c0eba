//! Per-file counters for recoverable conditions.

use std::path::Path;
use tracing::{debug, info};

/// Recoverable conditions seen while documenting one file.
///
/// None of these abort the file; they are summarized once the file is done.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    /// Null or malformed cursors skipped along with their subtrees.
    pub skipped_cursors: usize,
    /// Cursors whose kind fell outside the taxonomy.
    pub unknown_kinds: usize,
    /// Documentation that no entity range contained.
    pub unanchored_docs: usize,
    /// Conformances whose target is not in the tree.
    pub dangling_conformances: usize,
    /// Entities documented more than once; the last text wins.
    pub overwritten_docs: usize,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        *self == Diagnostics::default()
    }

    /// Summarize at `info` when anything happened, `debug` otherwise.
    pub fn log(&self, path: &Path) {
        if self.is_clean() {
            debug!(path = %path.display(), "no diagnostics");
            return;
        }
        info!(
            path = %path.display(),
            skipped_cursors = self.skipped_cursors,
            unknown_kinds = self.unknown_kinds,
            unanchored_docs = self.unanchored_docs,
            dangling_conformances = self.dangling_conformances,
            overwritten_docs = self.overwritten_docs,
            "diagnostics"
        );
    }
}
