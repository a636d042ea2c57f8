//! NurbsCurves: every curve shape under a transform, packed into one prim.

use crate::geom::{CurvesSample, NURBS_CURVES_TYPE, POINTS};
use crate::scene::{NodeId, SceneHost, Space, NURBS_CURVE};
use crate::stage::{Prim, PrimPath, Stage};
use crate::util::{Error, Result};

pub fn export<H: SceneHost + ?Sized>(
    stage: &mut Stage,
    host: &H,
    node: NodeId,
    target: &PrimPath,
) -> Result<()> {
    let path = target.to_string();
    let curves: Vec<_> = host
        .shapes(node)
        .into_iter()
        .filter(|&s| host.node_type(s).as_deref() == Some(NURBS_CURVE))
        .filter_map(|s| host.curve(s, Space::World))
        .collect();
    if curves.is_empty() {
        return Err(Error::EmptyGeometry { path, missing: POINTS });
    }

    let sample = CurvesSample::encode(&curves, &path)?;
    stage.define_prim(target, NURBS_CURVES_TYPE)?;
    sample.write(stage, target)
}

/// Create a transform with one curve shape per packed curve.
pub fn import<H: SceneHost + ?Sized>(
    prim: &Prim<'_>,
    host: &mut H,
    parent: Option<NodeId>,
) -> Result<NodeId> {
    let path = prim.path().to_string();
    let curves = CurvesSample::read(prim)?.decode(&path)?;

    let transform = super::create_group(prim, host, parent)?;
    let mut shapes = Vec::with_capacity(curves.len());
    for curve in curves {
        let cvs = curve.cvs.clone();
        shapes.push((host.create_curve(transform, curve)?, cvs));
    }
    super::bake_local_matrix(host, transform, shapes)?;
    Ok(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CurveData, SceneGraph};
    use crate::stage::StageMetadata;
    use glam::Vec3;

    fn line(y: f32) -> CurveData {
        CurveData::new(vec![Vec3::new(0.0, y, 0.0), Vec3::new(1.0, y, 0.0)], vec![0.0, 1.0], 1)
    }

    #[test]
    fn test_multi_curve_export_import() {
        let mut scene = SceneGraph::new();
        let node = scene.add_curves("wires", None, vec![line(0.0), line(1.0)]);

        let mut stage = Stage::new_anonymous(StageMetadata::default());
        let target = PrimPath::parse("/wires").unwrap();
        export(&mut stage, &scene, node, &target).unwrap();

        let prim = stage.prim(&target).unwrap();
        assert_eq!(prim.type_name(), NURBS_CURVES_TYPE);
        let sample = CurvesSample::read(&prim).unwrap();
        assert_eq!(sample.curve_vertex_counts, vec![2, 2]);

        let mut target_scene = SceneGraph::new();
        let imported = import(&prim, &mut target_scene, None).unwrap();
        let shapes = target_scene.shapes(imported);
        assert_eq!(shapes.len(), 2);
        assert_eq!(target_scene.curve(shapes[1], Space::Local).unwrap(), line(1.0));
    }

    #[test]
    fn test_export_without_curves() {
        let mut scene = SceneGraph::new();
        let node = scene.add_transform("nothing", None);
        let mut stage = Stage::new_anonymous(StageMetadata::default());
        let err = export(&mut stage, &scene, node, &PrimPath::parse("/nothing").unwrap()).unwrap_err();
        assert!(matches!(err, Error::EmptyGeometry { .. }));
    }
}
