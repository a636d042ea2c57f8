//! Import traversal: stage to host scene.
//!
//! Variant sets are flattened. For a prim with variant sets, every variant
//! of the first unhandled set gets its own group pair on the host,
//! `<set>` (override `VariantSet`) holding `<variant>` (override `Variant`),
//! and the prim's children are imported into that group with the variant
//! selected. The remaining sets are flattened inside each of those groups,
//! so k sets of sizes n1..nk materialize n1 * ... * nk copies of the
//! children. Selections are restored before returning, on error too.

use std::path::Path;

use tracing::{debug, info, warn};

use super::options::ImportOptions;
use super::report::SyncReport;
use crate::prims::Registry;
use crate::scene::{NodeId, PrimTypeOverride, SceneHost};
use crate::stage::{PrimPath, Stage};
use crate::util::Result;

/// Result of [`import_scene`].
#[derive(Clone, Debug)]
pub struct ImportResult {
    /// Host nodes created for the top-level prims.
    pub roots: Vec<NodeId>,
    pub report: SyncReport,
}

/// Depth-first importer onto a host scene.
pub struct Importer<'a, H: SceneHost + ?Sized> {
    host: &'a mut H,
    registry: Registry,
    report: SyncReport,
}

impl<'a, H: SceneHost + ?Sized> Importer<'a, H> {
    pub fn new(host: &'a mut H) -> Self {
        Self { host, registry: Registry::default(), report: SyncReport::default() }
    }

    /// Use a custom tag registry.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn report(&self) -> &SyncReport {
        &self.report
    }

    pub fn into_report(self) -> SyncReport {
        self.report
    }

    /// Import every top-level prim of `stage` under `parent`.
    ///
    /// Selections on `stage` are changed while flattening and put back
    /// before this returns.
    pub fn import_stage(&mut self, stage: &mut Stage, parent: Option<NodeId>) -> Result<Vec<NodeId>> {
        let mut roots = Vec::new();
        for path in stage.pseudo_root().children() {
            if let Some(node) = self.import_prim(stage, &path, parent)? {
                roots.push(node);
            }
        }
        Ok(roots)
    }

    /// Import one prim, then its children (flattening variant sets).
    fn import_prim(&mut self, stage: &mut Stage, path: &PrimPath, parent: Option<NodeId>) -> Result<Option<NodeId>> {
        let created = {
            let Some(prim) = stage.prim(path).filter(|p| p.is_valid()) else {
                return Ok(None);
            };
            let type_name = prim.type_name();
            debug!("visit {path} ({type_name})");

            let imported = self
                .registry
                .resolve_prim_type(type_name)
                .and_then(|kind| kind.import(&prim, &mut *self.host, parent).map(|node| (kind, node)));
            match imported {
                Ok((kind, node)) => {
                    info!("created {kind} node {node} for {path}");
                    self.report.created += 1;
                    Some(node)
                }
                Err(e) if e.is_recoverable() => {
                    warn!("skipping {path}: {e}");
                    self.report.skip(path.to_string(), &e);
                    None
                }
                Err(e) => return Err(e),
            }
        };

        let mut handled = Vec::new();
        self.flatten(stage, path, &mut handled, created.or(parent))?;
        Ok(created)
    }

    /// Import the children of `path`, expanding each variant set not yet in `handled`.
    fn flatten(
        &mut self,
        stage: &mut Stage,
        path: &PrimPath,
        handled: &mut Vec<String>,
        parent: Option<NodeId>,
    ) -> Result<()> {
        let pending = stage
            .variant_sets(path)
            .into_iter()
            .find(|set| !handled.contains(set));

        let Some(set) = pending else {
            let children = stage.prim(path).map(|p| p.children()).unwrap_or_default();
            for child in children {
                self.import_prim(stage, &child, parent)?;
            }
            return Ok(());
        };

        self.report.variant_sets += 1;
        stage.preserve_variant_selection(path, &set, |stage| {
            for variant in stage.variant_names(path, &set) {
                debug!("flatten {path}{{{set}={variant}}}");
                stage.set_variant_selection(path, &set, Some(variant.as_str()))?;
                let group = self.variant_group(parent, &set, &variant)?;

                handled.push(set.clone());
                let result = self.flatten(stage, path, handled, Some(group));
                handled.pop();
                result?;
            }
            Ok(())
        })
    }

    /// The `<set>|<variant>` group pair under `parent`, reusing existing groups.
    fn variant_group(&mut self, parent: Option<NodeId>, set: &str, variant: &str) -> Result<NodeId> {
        let set_node = self.find_or_create_group(parent, set, PrimTypeOverride::VariantSet)?;
        self.find_or_create_group(Some(set_node), variant, PrimTypeOverride::Variant)
    }

    fn find_or_create_group(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        kind: PrimTypeOverride,
    ) -> Result<NodeId> {
        let siblings = match parent {
            Some(p) => self.host.children(p),
            None => self.host.top_level_nodes(),
        };
        let existing = siblings.into_iter().find(|&n| {
            self.host.name(n).as_deref() == Some(name) && self.host.type_override(n) == Some(kind.as_i32())
        });
        if let Some(node) = existing {
            return Ok(node);
        }

        let group = self.host.create_transform(name, parent)?;
        self.host.set_type_override(group, kind.as_i32())?;
        Ok(group)
    }
}

/// Open the stage at `source` read-only and rebuild it on `host`.
pub fn import_scene<H: SceneHost + ?Sized>(
    host: &mut H,
    source: impl AsRef<Path>,
    options: ImportOptions,
) -> Result<ImportResult> {
    let source = source.as_ref();
    let mut stage = Stage::open(source)?;

    let mut importer = Importer::new(host);
    let roots = importer.import_stage(&mut stage, options.parent)?;
    let report = importer.into_report();
    info!("imported {}: {report}", source.display());
    Ok(ImportResult { roots, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{resolve_type_tag, SceneGraph};
    use crate::stage::StageMetadata;

    fn path(s: &str) -> PrimPath {
        PrimPath::parse(s).unwrap()
    }

    /// Names of the children of `node`, in creation order.
    fn child_names(scene: &SceneGraph, node: NodeId) -> Vec<String> {
        scene.children(node).into_iter().filter_map(|c| scene.name(c)).collect()
    }

    /// `/model` with a `look` set (red, blue); red nests a `size` set (small, big).
    fn nested_stage() -> Stage {
        let mut stage = Stage::new_anonymous(StageMetadata::default());
        let model = path("/model");
        stage.define_prim(&model, "Xform").unwrap();
        stage.define_prim(&path("/model/base"), "Xform").unwrap();

        for look in ["red", "blue"] {
            stage.add_variant(&model, "look", look).unwrap();
            stage.set_variant_selection(&model, "look", Some(look)).unwrap();
            stage
                .with_variant_edit(&model, "look", look, |stage| {
                    stage.define_prim(&model.child(&format!("{look}_shell"))?, "Xform")?;
                    if look == "red" {
                        for size in ["small", "big"] {
                            stage.add_variant(&model, "size", size)?;
                            stage.set_variant_selection(&model, "size", Some(size))?;
                            stage.with_variant_edit(&model, "size", size, |stage| {
                                stage.define_prim(&model.child(size)?, "Scope").map(|_| ())
                            })?;
                        }
                        stage.set_variant_selection(&model, "size", Some("small"))?;
                    }
                    Ok(())
                })
                .unwrap();
        }
        stage.set_variant_selection(&model, "look", Some("blue")).unwrap();
        stage
    }

    #[test]
    fn test_import_plain_hierarchy() {
        let mut stage = Stage::new_anonymous(StageMetadata::default());
        stage.define_prim(&path("/world"), "Xform").unwrap();
        stage.define_prim(&path("/world/geo"), "Scope").unwrap();
        stage.define_prim(&path("/other"), "Xform").unwrap();

        let mut scene = SceneGraph::new();
        let mut importer = Importer::new(&mut scene);
        let roots = importer.import_stage(&mut stage, None).unwrap();
        assert_eq!(importer.report().created, 3);
        assert_eq!(roots.len(), 2);

        let geo = scene.find("|world|geo").unwrap();
        assert_eq!(resolve_type_tag(&scene, geo).as_deref(), Some("Scope"));
        assert!(scene.find("|other").is_some());
    }

    #[test]
    fn test_nested_variants_flattened() {
        let mut stage = nested_stage();
        let mut scene = SceneGraph::new();
        let mut importer = Importer::new(&mut scene);
        importer.import_stage(&mut stage, None).unwrap();
        let report = importer.into_report();
        // look on /model, then size inside red.
        assert_eq!(report.variant_sets, 2);

        let model = scene.find("|model").unwrap();
        assert_eq!(child_names(&scene, model), vec!["look"]);
        let red = scene.find("|model|look|red").unwrap();
        assert_eq!(child_names(&scene, red), vec!["size"]);
        assert!(scene.find("|model|look|red|size|small|base").is_some());
        assert!(scene.find("|model|look|red|size|small|red_shell").is_some());
        assert!(scene.find("|model|look|red|size|small|small").is_some());
        assert!(scene.find("|model|look|red|size|big|big").is_some());
        assert!(scene.find("|model|look|blue|blue_shell").is_some());
        assert!(scene.find("|model|look|blue|size").is_none());

        let look = scene.find("|model|look").unwrap();
        assert_eq!(scene.type_override(look), Some(PrimTypeOverride::VariantSet.as_i32()));
        assert_eq!(scene.type_override(red), Some(PrimTypeOverride::Variant.as_i32()));

        let model_path = path("/model");
        assert_eq!(stage.variant_selection(&model_path, "look").as_deref(), Some("blue"));
        stage.set_variant_selection(&model_path, "look", Some("red")).unwrap();
        assert_eq!(stage.variant_selection(&model_path, "size").as_deref(), Some("small"));
    }

    #[test]
    fn test_unresolved_prim_children_imported() {
        let mut stage = Stage::new_anonymous(StageMetadata::default());
        stage.define_prim(&path("/world"), "Xform").unwrap();
        stage.define_prim(&path("/world/cam"), "Camera").unwrap();
        stage.define_prim(&path("/world/cam/rig"), "Xform").unwrap();

        let mut scene = SceneGraph::new();
        let mut importer = Importer::new(&mut scene);
        importer.import_stage(&mut stage, None).unwrap();
        let report = importer.into_report();
        assert_eq!(report.created, 2);
        assert_eq!(report.skipped[0].path, "/world/cam");
        assert!(scene.find("|world|rig").is_some());
    }
}
