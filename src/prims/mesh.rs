//! Mesh: polygon geometry under a transform.

use tracing::debug;

use crate::geom::{MeshSample, MESH_TYPE, POINTS};
use crate::scene::{NodeId, SceneHost, Space, MESH};
use crate::stage::{Prim, PrimPath, Stage};
use crate::util::{Error, Result};

/// Encode the first mesh shape of `node` in world space.
pub fn export<H: SceneHost + ?Sized>(
    stage: &mut Stage,
    host: &H,
    node: NodeId,
    target: &PrimPath,
) -> Result<()> {
    let path = target.to_string();
    let mesh = host
        .shapes(node)
        .into_iter()
        .filter(|&s| host.node_type(s).as_deref() == Some(MESH))
        .find_map(|s| host.mesh(s, Space::World))
        .ok_or_else(|| Error::EmptyGeometry { path: path.clone(), missing: POINTS })?;

    let sample = MeshSample::encode(&mesh, &path)?;
    stage.define_prim(target, MESH_TYPE)?;
    sample.write(stage, target)?;
    debug!("{path}: {} points, {} faces", sample.num_points(), sample.num_faces());
    Ok(())
}

/// Create a transform with a mesh shape, then reset the transform to identity.
pub fn import<H: SceneHost + ?Sized>(
    prim: &Prim<'_>,
    host: &mut H,
    parent: Option<NodeId>,
) -> Result<NodeId> {
    let path = prim.path().to_string();
    let mesh = MeshSample::read(prim)?.decode(&path)?;
    let points = mesh.points.clone();

    let transform = super::create_group(prim, host, parent)?;
    let shape = host.create_mesh(transform, mesh)?;
    super::bake_local_matrix(host, transform, vec![(shape, points)])?;
    Ok(transform)
}
