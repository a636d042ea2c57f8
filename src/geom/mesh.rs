//! Mesh schema codec.
//!
//! Converts between the host's [`MeshData`] and the stage's `Mesh` prim
//! attributes: points, face topology, the `st` UV primvar, display color,
//! extent and subdivision scheme.

use glam::{Vec2, Vec3};
use tracing::warn;

use super::primvar::{DisplayColor, IndexedUvs};
use crate::scene::{MeshData, UvSet};
use crate::stage::{Attribute, Interpolation, Prim, PrimPath, Stage, Value};
use crate::util::{BBox3f, Error, Result};

/// Mesh prim type name.
pub const MESH_TYPE: &str = "Mesh";

pub const POINTS: &str = "points";
pub const FACE_VERTEX_COUNTS: &str = "faceVertexCounts";
pub const FACE_VERTEX_INDICES: &str = "faceVertexIndices";
pub const UV_PRIMVAR: &str = "primvars:st";
pub const DISPLAY_COLOR: &str = "primvars:displayColor";
pub const EXTENT: &str = "extent";
pub const SUBDIVISION_SCHEME: &str = "subdivisionScheme";

/// Subdivision scheme written on every exported mesh.
pub const CATMULL_CLARK: &str = "catmullClark";

/// Mesh payload in stage layout.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshSample {
    pub points: Vec<Vec3>,
    pub face_vertex_counts: Vec<i32>,
    pub face_vertex_indices: Vec<i32>,
    pub uvs: Option<IndexedUvs>,
    pub display_color: Option<DisplayColor>,
    pub extent: BBox3f,
    pub subdivision_scheme: String,
}

impl MeshSample {
    /// Flatten host topology, dedupe UVs, classify colors and compute extent.
    pub fn encode(mesh: &MeshData, path: &str) -> Result<Self> {
        if mesh.points.is_empty() {
            return Err(Error::EmptyGeometry { path: path.to_string(), missing: POINTS });
        }
        if mesh.polygons.is_empty() {
            return Err(Error::EmptyGeometry { path: path.to_string(), missing: FACE_VERTEX_COUNTS });
        }

        let mut face_vertex_counts = Vec::with_capacity(mesh.polygons.len());
        let mut face_vertex_indices = Vec::with_capacity(mesh.num_face_vertices());
        for polygon in &mesh.polygons {
            face_vertex_counts.push(polygon.len() as i32);
            for &vertex in polygon {
                if vertex as usize >= mesh.points.len() {
                    return Err(Error::invalid_geometry(path, format!("vertex index {vertex} out of range")));
                }
                face_vertex_indices.push(vertex as i32);
            }
        }

        let uvs = match &mesh.uvs {
            Some(set) if !set.indices.is_empty() => {
                let per_corner = set
                    .expand()
                    .ok_or_else(|| Error::invalid_geometry(path, "uv index out of range"))?;
                if per_corner.len() != face_vertex_indices.len() {
                    return Err(Error::invalid_geometry(
                        path,
                        format!("{} uvs for {} face-vertices", per_corner.len(), face_vertex_indices.len()),
                    ));
                }
                Some(IndexedUvs::from_face_varying(&per_corner))
            }
            _ => None,
        };

        let display_color = match &mesh.colors {
            Some(colors) if colors.len() != mesh.points.len() => {
                return Err(Error::invalid_geometry(
                    path,
                    format!("{} colors for {} points", colors.len(), mesh.points.len()),
                ));
            }
            Some(colors) => DisplayColor::classify(colors),
            None => None,
        };

        Ok(Self {
            extent: BBox3f::from_points(&mesh.points),
            points: mesh.points.clone(),
            face_vertex_counts,
            face_vertex_indices,
            uvs,
            display_color,
            subdivision_scheme: CATMULL_CLARK.to_string(),
        })
    }

    /// Rebuild host mesh data.
    pub fn decode(&self, path: &str) -> Result<MeshData> {
        let total: i64 = self.face_vertex_counts.iter().map(|&c| i64::from(c)).sum();
        if self.face_vertex_counts.iter().any(|&c| c < 0) || total != self.face_vertex_indices.len() as i64 {
            return Err(Error::invalid_geometry(path, "face counts do not match face indices"));
        }

        let mut polygons = Vec::with_capacity(self.face_vertex_counts.len());
        let mut cursor = 0usize;
        for &count in &self.face_vertex_counts {
            let face = &self.face_vertex_indices[cursor..cursor + count as usize];
            cursor += count as usize;
            let mut polygon = Vec::with_capacity(face.len());
            for &vertex in face {
                if vertex < 0 || vertex as usize >= self.points.len() {
                    return Err(Error::invalid_geometry(path, format!("vertex index {vertex} out of range")));
                }
                polygon.push(vertex as u32);
            }
            polygons.push(polygon);
        }

        let mut mesh = MeshData::new(self.points.clone(), polygons);

        if let Some(uvs) = &self.uvs {
            if uvs.len() == self.face_vertex_indices.len() && uvs.is_consistent() {
                mesh.uvs = Some(UvSet {
                    values: uvs.values.clone(),
                    indices: uvs.indices.iter().map(|&i| i as u32).collect(),
                });
            } else {
                warn!("{path}: dropping inconsistent uv primvar");
            }
        }

        if let Some(color) = &self.display_color {
            let colors = color.per_vertex(self.points.len());
            if colors.len() == self.points.len() {
                mesh.colors = Some(colors);
            } else {
                warn!("{path}: dropping display color with {} values for {} points", colors.len(), self.points.len());
            }
        }

        Ok(mesh)
    }

    /// Author this sample onto an existing prim.
    pub fn write(&self, stage: &mut Stage, prim: &PrimPath) -> Result<()> {
        stage.set_attribute(prim, POINTS, Value::Point3fArray(self.points.clone()).into())?;
        stage.set_attribute(prim, FACE_VERTEX_COUNTS, Value::IntArray(self.face_vertex_counts.clone()).into())?;
        stage.set_attribute(prim, FACE_VERTEX_INDICES, Value::IntArray(self.face_vertex_indices.clone()).into())?;

        if let Some(uvs) = &self.uvs {
            let attr = Attribute::primvar(Value::TexCoord2fArray(uvs.values.clone()), Interpolation::FaceVarying)
                .with_indices(uvs.indices.clone());
            stage.set_attribute(prim, UV_PRIMVAR, attr)?;
        }

        if let Some(color) = &self.display_color {
            let attr = Attribute::primvar(Value::Color3fArray(color.values()), color.interpolation());
            stage.set_attribute(prim, DISPLAY_COLOR, attr)?;
        }

        stage.set_attribute(prim, EXTENT, Value::Float3Array(self.extent.corners().to_vec()).into())?;
        stage.set_attribute(prim, SUBDIVISION_SCHEME, Value::Token(self.subdivision_scheme.clone()).into())?;
        Ok(())
    }

    /// Read a sample from a composed prim.
    pub fn read(prim: &Prim<'_>) -> Result<Self> {
        let path = prim.path().to_string();
        let points = read_vec3(prim, POINTS, &path)?;
        let face_vertex_counts = read_ints(prim, FACE_VERTEX_COUNTS, &path)?;
        let face_vertex_indices = read_ints(prim, FACE_VERTEX_INDICES, &path)?;

        let uvs = prim.attribute(UV_PRIMVAR).and_then(|attr| {
            let values: Vec<Vec2> = attr.value.as_vec2_array()?.to_vec();
            Some(match &attr.indices {
                Some(indices) => IndexedUvs { values, indices: indices.clone() },
                None => IndexedUvs::identity(values, face_vertex_indices.len()),
            })
        });

        let display_color = prim.attribute(DISPLAY_COLOR).and_then(|attr| {
            let values = attr.value.as_vec3_array()?;
            match attr.interpolation {
                Some(Interpolation::Constant) | None if values.len() == 1 => {
                    Some(DisplayColor::Constant(values[0]))
                }
                Some(Interpolation::Vertex) => Some(DisplayColor::Vertex(values.to_vec())),
                other => {
                    warn!("{path}: unsupported displayColor interpolation {other:?}");
                    None
                }
            }
        });

        let extent = prim
            .attribute(EXTENT)
            .and_then(|attr| attr.value.as_vec3_array())
            .filter(|corners| corners.len() == 2)
            .map(|corners| BBox3f::new(corners[0], corners[1]))
            .unwrap_or_else(|| BBox3f::from_points(&points));

        let subdivision_scheme = prim
            .attribute(SUBDIVISION_SCHEME)
            .and_then(|attr| attr.value.as_token())
            .unwrap_or(CATMULL_CLARK)
            .to_string();

        Ok(Self {
            points,
            face_vertex_counts,
            face_vertex_indices,
            uvs,
            display_color,
            extent,
            subdivision_scheme,
        })
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_faces(&self) -> usize {
        self.face_vertex_counts.len()
    }
}

/// Required, non-empty 3-vector array attribute.
pub(crate) fn read_vec3(prim: &Prim<'_>, name: &'static str, path: &str) -> Result<Vec<Vec3>> {
    prim.attribute(name)
        .and_then(|attr| attr.value.as_vec3_array())
        .filter(|v| !v.is_empty())
        .map(<[Vec3]>::to_vec)
        .ok_or_else(|| Error::EmptyGeometry { path: path.to_string(), missing: name })
}

/// Required, non-empty int array attribute.
pub(crate) fn read_ints(prim: &Prim<'_>, name: &'static str, path: &str) -> Result<Vec<i32>> {
    prim.attribute(name)
        .and_then(|attr| attr.value.as_int_array())
        .filter(|v| !v.is_empty())
        .map(<[i32]>::to_vec)
        .ok_or_else(|| Error::EmptyGeometry { path: path.to_string(), missing: name })
}
