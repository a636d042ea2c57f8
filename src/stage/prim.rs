//! Composed, read-only view of a prim.

use super::path::PrimPath;
use super::spec::{PrimSpec, Specifier};
use super::stage::Stage;
use super::value::Attribute;

/// A prim as seen through composition: every spec that contributes to its
/// path, strongest first.
#[derive(Clone, Debug)]
pub struct Prim<'a> {
    stage: &'a Stage,
    path: PrimPath,
    specs: Vec<&'a PrimSpec>,
}

impl<'a> Prim<'a> {
    pub(super) fn new(stage: &'a Stage, path: PrimPath, specs: Vec<&'a PrimSpec>) -> Self {
        Self { stage, path, specs }
    }

    pub fn path(&self) -> &PrimPath {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn is_pseudo_root(&self) -> bool {
        self.path.is_root()
    }

    /// A prim is valid once some opinion defines it.
    pub fn is_valid(&self) -> bool {
        self.path.is_root() || self.specs.iter().any(|s| s.specifier == Specifier::Def)
    }

    /// Strongest authored type name; empty for the pseudo-root and pure overs.
    pub fn type_name(&self) -> &'a str {
        self.specs
            .iter()
            .copied()
            .find_map(|s| s.type_name.as_deref())
            .unwrap_or("")
    }

    /// Strongest opinion for an attribute.
    pub fn attribute(&self, name: &str) -> Option<&'a Attribute> {
        self.specs.iter().copied().find_map(|s| s.attributes.get(name))
    }

    /// Names of all authored attributes.
    pub fn attribute_names(&self) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = Vec::new();
        for spec in self.specs.iter().copied() {
            for name in spec.attributes.keys() {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        names
    }

    /// Defined children, in authored order.
    pub fn children(&self) -> Vec<PrimPath> {
        let mut names: Vec<&str> = Vec::new();
        for spec in &self.specs {
            for child in &spec.children {
                if !names.contains(&child.name.as_str()) {
                    names.push(&child.name);
                }
            }
        }
        names
            .into_iter()
            .map(|name| self.path.join(name))
            .filter(|path| self.stage.is_valid_prim(path))
            .collect()
    }

    /// Composed variant set names, in authored order.
    pub fn variant_set_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for spec in &self.specs {
            for vs in &spec.variant_sets {
                if !names.contains(&vs.name) {
                    names.push(vs.name.clone());
                }
            }
        }
        names
    }

    pub fn has_variant_sets(&self) -> bool {
        self.specs.iter().any(|s| !s.variant_sets.is_empty())
    }

    pub(super) fn specs(&self) -> &[&'a PrimSpec] {
        &self.specs
    }
}
