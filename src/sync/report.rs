//! Traversal reports.

use std::fmt;

use crate::util::Error;

/// A node or prim left out of a traversal.
#[derive(Clone, Debug, PartialEq)]
pub struct Skipped {
    pub path: String,
    pub reason: String,
}

/// Outcome of an export or import.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyncReport {
    /// Prims (export) or nodes (import) created by a handler.
    pub created: usize,
    /// Nodes or prims skipped with a recoverable error.
    pub skipped: Vec<Skipped>,
    /// Variant sets expanded (export) or flattened (import).
    pub variant_sets: usize,
    /// Variant sets dropped because their parent prim was invalid.
    pub dropped_variant_sets: Vec<String>,
    /// Variants (`/prim{set=variant}`) authored by more than one host node
    /// after name sanitizing. Their contents are merged.
    pub merged_variants: Vec<String>,
}

impl SyncReport {
    pub(crate) fn skip(&mut self, path: impl Into<String>, error: &Error) {
        self.skipped.push(Skipped { path: path.into(), reason: error.to_string() });
    }

    /// Check if nothing was skipped or dropped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.dropped_variant_sets.is_empty() && self.merged_variants.is_empty()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} skipped, {} variant sets, {} dropped",
            self.created,
            self.skipped.len(),
            self.variant_sets,
            self.dropped_variant_sets.len()
        )
    }
}
