//! Scope: a grouping prim with no transform.
//!
//! On the host a scope is a transform carrying the `Scope` type override,
//! which is what sends it back out as a `Scope`.

use crate::scene::{NodeId, PrimTypeOverride, SceneHost};
use crate::stage::{Prim, PrimPath, Stage};
use crate::util::Result;

/// Scope prim type name.
pub const SCOPE_TYPE: &str = "Scope";

pub fn export<H: SceneHost + ?Sized>(
    stage: &mut Stage,
    _host: &H,
    _node: NodeId,
    target: &PrimPath,
) -> Result<()> {
    stage.define_prim(target, SCOPE_TYPE)?;
    Ok(())
}

pub fn import<H: SceneHost + ?Sized>(
    prim: &Prim<'_>,
    host: &mut H,
    parent: Option<NodeId>,
) -> Result<NodeId> {
    let group = super::create_group(prim, host, parent)?;
    host.set_type_override(group, PrimTypeOverride::Scope.as_i32())?;
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{resolve_type_tag, SceneGraph};
    use crate::stage::StageMetadata;

    #[test]
    fn test_scope_import_sets_override() {
        let mut stage = Stage::new_anonymous(StageMetadata::default());
        let path = PrimPath::parse("/geo").unwrap();
        stage.define_prim(&path, SCOPE_TYPE).unwrap();

        let mut scene = SceneGraph::new();
        let node = import(&stage.prim(&path).unwrap(), &mut scene, None).unwrap();
        assert_eq!(scene.type_override(node), Some(PrimTypeOverride::Scope.as_i32()));
        assert_eq!(resolve_type_tag(&scene, node).as_deref(), Some(SCOPE_TYPE));
    }
}
