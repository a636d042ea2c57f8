//! Traversal options.

use std::collections::BTreeSet;

use crate::scene::NodeId;

/// Host paths of the default cameras every scene carries.
pub const DEFAULT_CAMERAS: [&str; 6] = ["|back", "|bottom", "|front", "|persp", "|side", "|top"];

/// Export configuration.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Export the transform children of this node instead of the whole scene.
    pub root: Option<NodeId>,
    /// Top-level host paths never exported.
    pub excluded: BTreeSet<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            root: None,
            excluded: DEFAULT_CAMERAS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the export root.
    pub fn with_root(mut self, root: NodeId) -> Self {
        self.root = Some(root);
        self
    }

    /// Exclude one more top-level path.
    pub fn with_excluded(mut self, path: impl Into<String>) -> Self {
        self.excluded.insert(path.into());
        self
    }

    /// Replace the exclusion set.
    pub fn with_exclusions<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded.contains(path)
    }
}

/// Import configuration.
#[derive(Clone, Debug, Default)]
pub struct ImportOptions {
    /// Host node the imported top-level prims are created under.
    pub parent: Option<NodeId>,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }
}
