//! Layer data: the authored prim specs a stage composes.
//!
//! A variant is itself a [`PrimSpec`] of edits keyed by the variant name,
//! held by its [`VariantSetSpec`]. Specs are addressed from the layer root
//! by a [`SpecAddress`], a list of child and variant steps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::metadata::StageMetadata;
use super::path::is_valid_name;
use super::value::Attribute;

/// Format tag written at the top of every layer document.
pub const LAYER_FORMAT: &str = "scenebridge-stage";
/// Current layer document version.
pub const LAYER_VERSION: u32 = 1;

/// Whether a spec defines a prim or only overrides one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specifier {
    Def,
    #[default]
    Over,
}

/// Authored opinions for one prim location.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimSpec {
    pub name: String,
    #[serde(default)]
    pub specifier: Specifier,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PrimSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variant_sets: Vec<VariantSetSpec>,
}

impl PrimSpec {
    /// Create an `over` spec with no opinions.
    pub fn over(name: &str) -> Self {
        Self { name: name.to_string(), ..Default::default() }
    }

    pub fn child(&self, name: &str) -> Option<&PrimSpec> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut PrimSpec> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Get a child spec, appending an `over` if it is not authored yet.
    pub fn child_or_insert(&mut self, name: &str) -> &mut PrimSpec {
        let idx = match self.children.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.children.push(PrimSpec::over(name));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    pub fn variant_set(&self, name: &str) -> Option<&VariantSetSpec> {
        self.variant_sets.iter().find(|vs| vs.name == name)
    }

    pub fn variant_set_mut(&mut self, name: &str) -> Option<&mut VariantSetSpec> {
        self.variant_sets.iter_mut().find(|vs| vs.name == name)
    }

    /// Get a variant set spec, appending an empty one if needed.
    pub fn variant_set_or_insert(&mut self, name: &str) -> &mut VariantSetSpec {
        let idx = match self.variant_sets.iter().position(|vs| vs.name == name) {
            Some(idx) => idx,
            None => {
                self.variant_sets.push(VariantSetSpec::new(name));
                self.variant_sets.len() - 1
            }
        };
        &mut self.variant_sets[idx]
    }

    /// First name in this subtree that is not a valid identifier.
    pub(crate) fn find_invalid_name(&self, is_root: bool) -> Option<String> {
        if !is_root && !is_valid_name(&self.name) {
            return Some(self.name.clone());
        }
        for child in &self.children {
            if let Some(bad) = child.find_invalid_name(false) {
                return Some(bad);
            }
        }
        for vs in &self.variant_sets {
            if vs.name.is_empty() {
                return Some(vs.name.clone());
            }
            for variant in &vs.variants {
                // Variant contents sit at the owning prim, so skip their own name.
                if variant.name.is_empty() {
                    return Some(variant.name.clone());
                }
                if let Some(bad) = variant.find_invalid_name(true) {
                    return Some(bad);
                }
            }
        }
        None
    }
}

/// A named variant set: ordered variants plus the persisted selection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantSetSpec {
    pub name: String,
    #[serde(default)]
    pub variants: Vec<PrimSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
}

impl VariantSetSpec {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), variants: Vec::new(), selection: None }
    }

    pub fn variant(&self, name: &str) -> Option<&PrimSpec> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Get a variant's edit spec, appending an empty variant if needed.
    pub fn variant_or_insert(&mut self, name: &str) -> &mut PrimSpec {
        let idx = match self.variants.iter().position(|v| v.name == name) {
            Some(idx) => idx,
            None => {
                self.variants.push(PrimSpec::over(name));
                self.variants.len() - 1
            }
        };
        &mut self.variants[idx]
    }

    /// Spec reached by the current selection, if it names an authored variant.
    pub fn selected(&self) -> Option<&PrimSpec> {
        self.selection.as_deref().and_then(|sel| self.variant(sel))
    }
}

/// One step from a spec to a nested spec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecStep {
    Child(String),
    Variant { set: String, variant: String },
}

/// Location of a spec inside a layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpecAddress {
    steps: Vec<SpecStep>,
}

impl SpecAddress {
    /// Address of the layer's pseudo-root spec.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, name: &str) -> Self {
        let mut steps = self.steps.clone();
        steps.push(SpecStep::Child(name.to_string()));
        Self { steps }
    }

    pub fn variant(&self, set: &str, variant: &str) -> Self {
        let mut steps = self.steps.clone();
        steps.push(SpecStep::Variant { set: set.to_string(), variant: variant.to_string() });
        Self { steps }
    }

    pub fn steps(&self) -> &[SpecStep] {
        &self.steps
    }
}

/// The root layer: metadata plus the pseudo-root spec.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layer {
    pub metadata: StageMetadata,
    pub root: PrimSpec,
}

impl Layer {
    /// Empty layer with the given metadata.
    pub fn new(metadata: StageMetadata) -> Self {
        Self { metadata, root: PrimSpec::default() }
    }

    /// Resolve a spec address.
    pub fn spec(&self, address: &SpecAddress) -> Option<&PrimSpec> {
        let mut spec = &self.root;
        for step in address.steps() {
            spec = match step {
                SpecStep::Child(name) => spec.child(name)?,
                SpecStep::Variant { set, variant } => spec.variant_set(set)?.variant(variant)?,
            };
        }
        Some(spec)
    }

    /// Resolve a spec address mutably.
    pub fn spec_mut(&mut self, address: &SpecAddress) -> Option<&mut PrimSpec> {
        let mut spec = &mut self.root;
        for step in address.steps() {
            spec = match step {
                SpecStep::Child(name) => spec.child_mut(name)?,
                SpecStep::Variant { set, variant } => spec
                    .variant_set_mut(set)?
                    .variants
                    .iter_mut()
                    .find(|v| &v.name == variant)?,
            };
        }
        Some(spec)
    }
}

/// Serialized form of a [`Layer`].
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LayerDocument {
    pub format: String,
    pub version: u32,
    pub metadata: StageMetadata,
    pub root: PrimSpec,
}

impl From<&Layer> for LayerDocument {
    fn from(layer: &Layer) -> Self {
        Self {
            format: LAYER_FORMAT.to_string(),
            version: LAYER_VERSION,
            metadata: layer.metadata.clone(),
            root: layer.root.clone(),
        }
    }
}
