//! Absolute prim paths.

use smallvec::SmallVec;
use std::fmt;

use crate::util::{Error, Result};

/// Path separator inside a stage.
pub const SEPARATOR: char = '/';

/// Absolute path of a prim within a stage. The empty path is the pseudo-root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimPath {
    segments: SmallVec<[String; 6]>,
}

impl PrimPath {
    /// The pseudo-root path `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse an absolute path such as `/world/geo/mesh`.
    pub fn parse(path: &str) -> Result<Self> {
        let Some(rest) = path.strip_prefix(SEPARATOR) else {
            return Err(Error::InvalidPath(format!("'{path}' is not absolute")));
        };
        let mut segments = SmallVec::new();
        if !rest.is_empty() {
            for name in rest.split(SEPARATOR) {
                if !is_valid_name(name) {
                    return Err(Error::InvalidPath(format!("'{path}' has invalid segment '{name}'")));
                }
                segments.push(name.to_string());
            }
        }
        Ok(Self { segments })
    }

    /// Append a child name. The name must be a valid identifier.
    pub fn child(&self, name: &str) -> Result<Self> {
        if !is_valid_name(name) {
            return Err(Error::InvalidPath(format!("invalid prim name '{name}'")));
        }
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// Append a name already known to be valid.
    pub(crate) fn join(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// Parent path, or `None` for the pseudo-root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    /// Last segment; empty for the pseudo-root.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Check if this is the pseudo-root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path segments from the root down.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Check if `prefix` is this path or one of its ancestors.
    pub fn has_prefix(&self, prefix: &PrimPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for PrimPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "/");
        }
        for seg in &self.segments {
            write!(f, "/{seg}")?;
        }
        Ok(())
    }
}

/// Check if `name` is a valid prim identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Turn an arbitrary host name into a valid prim identifier.
///
/// Invalid characters become `_`; a leading digit gets a `_` prefix.
pub fn sanitize_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let path = PrimPath::parse("/world/geo/mesh1").unwrap();
        assert_eq!(path.depth(), 3);
        assert_eq!(path.name(), "mesh1");
        assert_eq!(path.to_string(), "/world/geo/mesh1");
        assert_eq!(PrimPath::parse("/").unwrap(), PrimPath::root());
        assert_eq!(PrimPath::root().to_string(), "/");
    }

    #[test]
    fn test_parse_rejects_bad_paths() {
        assert!(PrimPath::parse("world").is_err());
        assert!(PrimPath::parse("/a//b").is_err());
        assert!(PrimPath::parse("/a/1b").is_err());
    }

    #[test]
    fn test_parent_child() {
        let path = PrimPath::root().child("a").unwrap().child("b").unwrap();
        assert_eq!(path.to_string(), "/a/b");
        assert_eq!(path.parent().unwrap().to_string(), "/a");
        assert_eq!(path.parent().unwrap().parent().unwrap(), PrimPath::root());
        assert!(PrimPath::root().parent().is_none());
        assert!(path.has_prefix(&PrimPath::parse("/a").unwrap()));
        assert!(path.has_prefix(&PrimPath::root()));
        assert!(!path.has_prefix(&PrimPath::parse("/b").unwrap()));
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("pCube1"), "pCube1");
        assert_eq!(sanitize_name("ns:pCube1"), "ns_pCube1");
        assert_eq!(sanitize_name("1st"), "_1st");
        assert_eq!(sanitize_name(""), "_");
        assert!(is_valid_name(&sanitize_name("a b-c")));
    }
}
