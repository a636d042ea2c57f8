//! Xform: a plain grouping transform.
//!
//! Points are exported in world space, so no transform ops are authored.

use crate::scene::{NodeId, SceneHost};
use crate::stage::{Prim, PrimPath, Stage};
use crate::util::Result;

/// Xform prim type name.
pub const XFORM_TYPE: &str = "Xform";

pub fn export<H: SceneHost + ?Sized>(
    stage: &mut Stage,
    _host: &H,
    _node: NodeId,
    target: &PrimPath,
) -> Result<()> {
    stage.define_prim(target, XFORM_TYPE)?;
    Ok(())
}

pub fn import<H: SceneHost + ?Sized>(
    prim: &Prim<'_>,
    host: &mut H,
    parent: Option<NodeId>,
) -> Result<NodeId> {
    super::create_group(prim, host, parent)
}
