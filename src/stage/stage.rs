//! The interchange stage: lifecycle, composition and prim authoring.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::metadata::StageMetadata;
use super::path::PrimPath;
use super::prim::Prim;
use super::spec::{
    Layer, LayerDocument, PrimSpec, SpecAddress, Specifier, LAYER_FORMAT, LAYER_VERSION,
};
use super::value::Attribute;
use crate::util::{Error, Result};

/// Variant selected as the destination of authoring on a prim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantEditTarget {
    pub prim: PrimPath,
    pub set: String,
    pub variant: String,
}

/// A composed view over a single root layer.
///
/// All authoring mutates the in-memory layer; [`Stage::save`] is the only
/// write to disk.
#[derive(Debug)]
pub struct Stage {
    path: Option<PathBuf>,
    layer: Layer,
    read_only: bool,
    pub(super) edit_targets: Vec<VariantEditTarget>,
}

impl Stage {
    /// Create a fresh stage bound to `path`, removing any file already there.
    pub fn create_new(path: impl AsRef<Path>, metadata: StageMetadata) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            debug!("Removing existing stage at {}", path.display());
            fs::remove_file(path)?;
        }
        info!(
            "Created stage {} (upAxis={}, metersPerUnit={})",
            path.display(),
            metadata.up_axis.as_str(),
            metadata.meters_per_unit
        );
        Ok(Self {
            path: Some(path.to_path_buf()),
            layer: Layer::new(metadata),
            read_only: false,
            edit_targets: Vec::new(),
        })
    }

    /// Create a stage that lives only in memory and cannot be saved.
    pub fn new_anonymous(metadata: StageMetadata) -> Self {
        Self { path: None, layer: Layer::new(metadata), read_only: false, edit_targets: Vec::new() }
    }

    /// Open an existing stage for reading.
    ///
    /// Variant selections may still be changed in memory; authoring and
    /// saving fail with [`Error::ReadOnly`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::open(path, e.to_string()))?;
        let doc: LayerDocument =
            serde_json::from_str(&text).map_err(|e| Error::open(path, e.to_string()))?;

        if doc.format != LAYER_FORMAT {
            return Err(Error::open(path, format!("unknown format '{}'", doc.format)));
        }
        if doc.version > LAYER_VERSION {
            return Err(Error::open(path, format!("unsupported version {}", doc.version)));
        }
        if let Some(bad) = doc.root.find_invalid_name(true) {
            return Err(Error::open(path, format!("invalid prim name '{bad}'")));
        }

        debug!("Opened stage {}", path.display());
        Ok(Self {
            path: Some(path.to_path_buf()),
            layer: Layer { metadata: doc.metadata, root: doc.root },
            read_only: true,
            edit_targets: Vec::new(),
        })
    }

    /// Serialize the root layer to the stage path.
    pub fn save(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnly);
        }
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| Error::other("anonymous stage has no file path"))?;
        let text = serde_json::to_string_pretty(&LayerDocument::from(&self.layer))?;
        fs::write(path, text)?;
        info!("Saved stage {}", path.display());
        Ok(())
    }

    /// File path backing this stage, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn metadata(&self) -> &StageMetadata {
        &self.layer.metadata
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The root layer.
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub(super) fn layer_mut(&mut self) -> &mut Layer {
        &mut self.layer
    }

    /// Variant edit targets currently in effect, outermost first.
    pub fn edit_targets(&self) -> &[VariantEditTarget] {
        &self.edit_targets
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// The pseudo-root prim.
    pub fn pseudo_root(&self) -> Prim<'_> {
        Prim::new(self, PrimPath::root(), vec![&self.layer.root])
    }

    /// Composed prim at `path`, or `None` if no spec contributes to it.
    pub fn prim(&self, path: &PrimPath) -> Option<Prim<'_>> {
        let addresses = self.opinions(path);
        if addresses.is_empty() {
            return None;
        }
        let specs = addresses.iter().filter_map(|a| self.layer.spec(a)).collect();
        Some(Prim::new(self, path.clone(), specs))
    }

    /// Check if `path` names a defined prim.
    pub fn is_valid_prim(&self, path: &PrimPath) -> bool {
        self.prim(path).is_some_and(|p| p.is_valid())
    }

    /// Spec addresses contributing to `path`, strongest first.
    ///
    /// Local opinions come before the contents of selected variants.
    pub(super) fn opinions(&self, path: &PrimPath) -> Vec<SpecAddress> {
        let mut current = self.expand_variants(SpecAddress::root());
        for name in path.segments() {
            let mut next = Vec::new();
            for address in &current {
                let has_child = self.layer.spec(address).is_some_and(|s| s.child(name).is_some());
                if has_child {
                    next.extend(self.expand_variants(address.child(name)));
                }
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }
        current
    }

    /// A spec followed by the specs of its selected variants, recursively.
    fn expand_variants(&self, address: SpecAddress) -> Vec<SpecAddress> {
        let Some(spec) = self.layer.spec(&address) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for vs in &spec.variant_sets {
            if let Some(selected) = vs.selected() {
                out.extend(self.expand_variants(address.variant(&vs.name, &selected.name)));
            }
        }
        out.insert(0, address);
        out
    }

    /// Every defined prim below the pseudo-root, depth-first in child order.
    pub fn traverse(&self) -> Vec<PrimPath> {
        let mut out = Vec::new();
        let mut stack: Vec<PrimPath> = self.pseudo_root().children().into_iter().rev().collect();
        while let Some(path) = stack.pop() {
            if let Some(prim) = self.prim(&path) {
                stack.extend(prim.children().into_iter().rev());
            }
            out.push(path);
        }
        out
    }

    // ========================================================================
    // Authoring
    // ========================================================================

    pub(super) fn ensure_writable(&self) -> Result<()> {
        if self.read_only {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Define a typed prim at `path` in the current edit target.
    ///
    /// The parent must already be a defined prim; otherwise this returns
    /// [`Error::InvalidParent`] and nothing is authored.
    pub fn define_prim(&mut self, path: &PrimPath, type_name: &str) -> Result<PrimPath> {
        self.ensure_writable()?;
        let parent = path
            .parent()
            .ok_or_else(|| Error::InvalidPath("cannot define the pseudo-root".into()))?;
        if !self.is_valid_prim(&parent) {
            return Err(Error::InvalidParent(path.to_string()));
        }
        let spec = self.edit_spec_mut(path)?;
        spec.specifier = Specifier::Def;
        spec.type_name = Some(type_name.to_string());
        Ok(path.clone())
    }

    /// Author an attribute on an existing prim in the current edit target.
    pub fn set_attribute(&mut self, path: &PrimPath, name: &str, attribute: Attribute) -> Result<()> {
        self.ensure_writable()?;
        if !self.is_valid_prim(path) {
            return Err(Error::PrimNotFound(path.to_string()));
        }
        self.edit_spec_mut(path)?.attributes.insert(name.to_string(), attribute);
        Ok(())
    }

    /// Spec for `path` at the current edit target, creating `over`s on the way.
    pub(super) fn edit_spec_mut(&mut self, path: &PrimPath) -> Result<&mut PrimSpec> {
        if let Some(target) = self.edit_targets.iter().find(|t| !path.has_prefix(&t.prim)) {
            return Err(Error::InvalidPath(format!(
                "{path} is outside the variant edit target on {}",
                target.prim
            )));
        }
        let targets = &self.edit_targets;
        let mut prefix = PrimPath::root();
        let mut spec = enter_variants(&mut self.layer.root, &prefix, targets);
        for name in path.segments() {
            prefix = prefix.join(name);
            spec = enter_variants(spec.child_or_insert(name), &prefix, targets);
        }
        Ok(spec)
    }
}

/// Descend into the variant edit targets that sit on `prefix`.
fn enter_variants<'a>(
    mut spec: &'a mut PrimSpec,
    prefix: &PrimPath,
    targets: &[VariantEditTarget],
) -> &'a mut PrimSpec {
    for target in targets.iter().filter(|t| &t.prim == prefix) {
        spec = spec.variant_set_or_insert(&target.set).variant_or_insert(&target.variant);
    }
    spec
}
