//! Export traversal: host scene to stage.

use std::path::Path;

use tracing::{debug, info, warn};

use super::options::ExportOptions;
use super::report::SyncReport;
use crate::prims::Registry;
use crate::scene::{resolve_type_tag, NodeId, SceneHost, TRANSFORM, VARIANT_SET_TAG};
use crate::stage::{sanitize_name, PrimPath, Stage, StageMetadata};
use crate::util::{Error, Result};

/// Depth-first exporter over a host scene.
pub struct Exporter<'a, H: SceneHost + ?Sized> {
    host: &'a H,
    registry: Registry,
    options: ExportOptions,
    report: SyncReport,
}

impl<'a, H: SceneHost + ?Sized> Exporter<'a, H> {
    pub fn new(host: &'a H, options: ExportOptions) -> Self {
        Self {
            host,
            registry: Registry::default(),
            options,
            report: SyncReport::default(),
        }
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

    /// Nodes that become top-level prims.
    pub fn start_nodes(&self) -> Vec<NodeId> {
        let host = self.host;
        match self.options.root {
            Some(root) => host
                .children(root)
                .into_iter()
                .filter(|&c| host.node_type(c).as_deref() == Some(TRANSFORM))
                .collect(),
            None => host
                .top_level_nodes()
                .into_iter()
                .filter(|&n| !host.is_shape(n))
                .filter(|&n| host.full_path(n).is_some_and(|p| !self.options.is_excluded(&p)))
                .collect(),
        }
    }

    /// Export every start node into `stage`.
    pub fn export_stage(&mut self, stage: &mut Stage) -> Result<()> {
        let root = PrimPath::root();
        for node in self.start_nodes() {
            self.export_node(stage, node, &root)?;
        }
        Ok(())
    }

    /// Export `node` as a child of `parent`, then its subtree.
    fn export_node(&mut self, stage: &mut Stage, node: NodeId, parent: &PrimPath) -> Result<()> {
        let raw_name = self
            .host
            .name(node)
            .ok_or_else(|| Error::NodeNotFound(node.to_string()))?;
        let name = sanitize_name(&raw_name);
        let target = parent.child(&name)?;
        let tag = resolve_type_tag(self.host, node).unwrap_or_default();
        debug!("visit {target} ({tag})");

        if tag == VARIANT_SET_TAG {
            return self.expand_variant_set(stage, node, parent, &name);
        }

        let exported = self
            .registry
            .resolve_node_type(&tag)
            .and_then(|kind| kind.export(stage, self.host, node, &target).map(|_| kind));

        let next_parent = match exported {
            Ok(kind) => {
                info!("created {kind} {target}");
                self.report.created += 1;
                if !kind.is_container() {
                    return Ok(());
                }
                target
            }
            Err(e @ Error::UnresolvedType(_)) => {
                warn!("skipping {target}: {e}");
                self.report.skip(target.to_string(), &e);
                parent.clone()
            }
            Err(e) if e.is_recoverable() => {
                warn!("skipping {target}: {e}");
                self.report.skip(target.to_string(), &e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        for child in self.child_transforms(node) {
            self.export_node(stage, child, &next_parent)?;
        }
        Ok(())
    }

    /// Turn a `VariantSet` node into a variant set on the parent prim.
    ///
    /// Each child is one variant; its children are authored onto `parent`
    /// itself inside that variant. The first variant ends up selected.
    fn expand_variant_set(&mut self, stage: &mut Stage, node: NodeId, parent: &PrimPath, set: &str) -> Result<()> {
        if parent.is_root() || !stage.is_valid_prim(parent) {
            let key = format!("{parent}{{{set}}}");
            debug!("dropping variant set {key}: no prim to attach to");
            self.report.dropped_variant_sets.push(key);
            return Ok(());
        }

        let mut variants: Vec<(NodeId, String)> = Vec::new();
        for child in self.child_transforms(node) {
            let name = self
                .host
                .name(child)
                .ok_or_else(|| Error::NodeNotFound(child.to_string()))?;
            let variant = sanitize_name(&name);
            if variants.iter().any(|(_, v)| *v == variant) {
                let key = format!("{parent}{{{set}={variant}}}");
                warn!("variant {key} repeats after sanitizing '{name}', merging contents");
                self.report.merged_variants.push(key);
            }
            variants.push((child, variant));
        }

        stage.add_variant_set(parent, set)?;
        for (variant_node, variant) in &variants {
            stage.add_variant(parent, set, variant)?;
            stage.set_variant_selection(parent, set, Some(variant.as_str()))?;
            stage.with_variant_edit(parent, set, variant, |stage| {
                for content in self.child_transforms(*variant_node) {
                    self.export_node(stage, content, parent)?;
                }
                Ok(())
            })?;
        }
        if let Some((_, first)) = variants.first() {
            stage.set_variant_selection(parent, set, Some(first.as_str()))?;
        }

        info!("created variant set {parent}{{{set}}} with {} variants", variants.len());
        self.report.variant_sets += 1;
        Ok(())
    }

    /// Non-shape children in discovery order.
    fn child_transforms(&self, node: NodeId) -> Vec<NodeId> {
        self.host
            .children(node)
            .into_iter()
            .filter(|&c| !self.host.is_shape(c))
            .collect()
    }
}

/// Export a host scene to a new stage file at `destination`.
///
/// Any existing file at `destination` is replaced. Stage metadata comes from
/// the host's up axis and linear unit.
pub fn export_scene<H: SceneHost + ?Sized>(
    host: &H,
    destination: impl AsRef<Path>,
    options: ExportOptions,
) -> Result<SyncReport> {
    let destination = destination.as_ref();
    let metadata = StageMetadata::new(host.up_axis(), host.linear_unit());
    let mut stage = Stage::create_new(destination, metadata)?;

    let mut exporter = Exporter::new(host, options);
    exporter.export_stage(&mut stage)?;
    stage.save()?;

    let report = exporter.into_report();
    info!("exported {}: {report}", destination.display());
    Ok(report)
}
