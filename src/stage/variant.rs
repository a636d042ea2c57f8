//! Variant sets: authoring, selection and scoped edits.
//!
//! Selections are stage-global state. Anything that switches a selection to
//! look at a variant goes through [`Stage::preserve_variant_selection`], which
//! puts the prior selection back on every exit path, panics included.

use std::panic::{self, AssertUnwindSafe};

use tracing::trace;

use super::path::{is_valid_name, PrimPath};
use super::stage::{Stage, VariantEditTarget};
use crate::util::{Error, Result};

impl Stage {
    /// Add (or reuse) a variant set on a defined prim, in the current edit target.
    pub fn add_variant_set(&mut self, prim: &PrimPath, set: &str) -> Result<()> {
        self.ensure_writable()?;
        if !is_valid_name(set) {
            return Err(Error::InvalidPath(format!("invalid variant set name '{set}'")));
        }
        if prim.is_root() || !self.is_valid_prim(prim) {
            return Err(Error::InvalidParent(format!("{prim}{{{set}}}")));
        }
        self.edit_spec_mut(prim)?.variant_set_or_insert(set);
        Ok(())
    }

    /// Add (or reuse) a variant, creating its set on first use.
    pub fn add_variant(&mut self, prim: &PrimPath, set: &str, variant: &str) -> Result<()> {
        self.ensure_writable()?;
        if !is_valid_name(set) || !is_valid_name(variant) {
            return Err(Error::InvalidPath(format!("invalid variant name '{set}={variant}'")));
        }
        if prim.is_root() || !self.is_valid_prim(prim) {
            return Err(Error::InvalidParent(format!("{prim}{{{set}={variant}}}")));
        }
        self.edit_spec_mut(prim)?
            .variant_set_or_insert(set)
            .variant_or_insert(variant);
        Ok(())
    }

    /// Composed variant set names on a prim, in authored order.
    pub fn variant_sets(&self, prim: &PrimPath) -> Vec<String> {
        self.prim(prim).map(|p| p.variant_set_names()).unwrap_or_default()
    }

    /// Composed variant names of a set, in authored order.
    pub fn variant_names(&self, prim: &PrimPath, set: &str) -> Vec<String> {
        let Some(view) = self.prim(prim) else {
            return Vec::new();
        };
        let mut names: Vec<String> = Vec::new();
        for spec in view.specs() {
            if let Some(vs) = spec.variant_set(set) {
                for variant in &vs.variants {
                    if !names.contains(&variant.name) {
                        names.push(variant.name.clone());
                    }
                }
            }
        }
        names
    }

    /// Current selection of a variant set, if any.
    pub fn variant_selection(&self, prim: &PrimPath, set: &str) -> Option<String> {
        let view = self.prim(prim)?;
        view.specs()
            .iter()
            .filter_map(|spec| spec.variant_set(set))
            .find_map(|vs| vs.selection.clone())
    }

    /// Select a variant (or clear the selection with `None`).
    ///
    /// Allowed on read-only stages: selection changes never reach disk
    /// unless the stage is saved.
    pub fn set_variant_selection(&mut self, prim: &PrimPath, set: &str, variant: Option<&str>) -> Result<()> {
        let addresses = self.opinions(prim);
        if addresses.is_empty() {
            return Err(Error::PrimNotFound(prim.to_string()));
        }
        if !self.variant_sets(prim).iter().any(|s| s == set) {
            return Err(Error::VariantSetNotFound { prim: prim.to_string(), set: set.to_string() });
        }
        if let Some(name) = variant {
            if !self.variant_names(prim, set).iter().any(|v| v == name) {
                return Err(Error::VariantNotFound {
                    prim: prim.to_string(),
                    set: set.to_string(),
                    variant: name.to_string(),
                });
            }
        }

        self.write_selection(prim, set, variant);
        Ok(())
    }

    /// Write a selection to every contributing spec without validating it.
    ///
    /// Persisted selections may name variants that are not authored; this
    /// puts such a value back verbatim.
    fn write_selection(&mut self, prim: &PrimPath, set: &str, variant: Option<&str>) {
        trace!("{prim}: {set} = {:?}", variant);
        let addresses = self.opinions(prim);
        let layer = self.layer_mut();
        for address in &addresses {
            if let Some(vs) = layer.spec_mut(address).and_then(|s| s.variant_set_mut(set)) {
                vs.selection = variant.map(str::to_string);
            }
        }
    }

    /// Run `f` with authoring redirected into one variant of a set on `prim`.
    ///
    /// The variant must already exist. Edit targets nest; the target is popped
    /// on every exit path.
    pub fn with_variant_edit<R>(
        &mut self,
        prim: &PrimPath,
        set: &str,
        variant: &str,
        f: impl FnOnce(&mut Stage) -> Result<R>,
    ) -> Result<R> {
        if !self.variant_names(prim, set).iter().any(|v| v == variant) {
            return Err(Error::VariantNotFound {
                prim: prim.to_string(),
                set: set.to_string(),
                variant: variant.to_string(),
            });
        }
        let depth = self.edit_targets.len();
        self.edit_targets.push(VariantEditTarget {
            prim: prim.clone(),
            set: set.to_string(),
            variant: variant.to_string(),
        });

        let result = panic::catch_unwind(AssertUnwindSafe(|| f(self)));
        self.edit_targets.truncate(depth);

        match result {
            Ok(r) => r,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Run `f`, then restore the selection `set` had before the call.
    ///
    /// The recorded value is written back as-is, even when it names a
    /// variant that is not authored.
    pub fn preserve_variant_selection<R>(
        &mut self,
        prim: &PrimPath,
        set: &str,
        f: impl FnOnce(&mut Stage) -> Result<R>,
    ) -> Result<R> {
        let original = self.variant_selection(prim, set);
        let result = panic::catch_unwind(AssertUnwindSafe(|| f(self)));
        self.write_selection(prim, set, original.as_deref());

        match result {
            Ok(r) => r,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}
