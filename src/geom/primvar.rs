//! Primvar encodings shared by the geometry schemas.
//!
//! UVs are stored indexed and face-varying: a deduplicated value array and
//! one index per face-vertex. Display color is either one constant color or
//! one color per vertex.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use crate::stage::Interpolation;
use crate::util::round_to;

/// Decimal places compared when deciding if all colors are equal.
pub const COLOR_PRECISION: i32 = 4;

/// Indexed face-varying UVs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexedUvs {
    /// Unique UV values, first-seen order.
    pub values: Vec<Vec2>,
    /// One index into `values` per face-vertex.
    pub indices: Vec<i32>,
}

impl IndexedUvs {
    /// Deduplicate one-UV-per-face-vertex data. Values compare bit-exact.
    pub fn from_face_varying(uvs: &[Vec2]) -> Self {
        let mut lookup: HashMap<[u32; 2], i32> = HashMap::with_capacity(uvs.len());
        let mut values = Vec::new();
        let indices: Vec<i32> = uvs
            .iter()
            .map(|uv| {
                *lookup.entry([uv.x.to_bits(), uv.y.to_bits()]).or_insert_with(|| {
                    values.push(*uv);
                    (values.len() - 1) as i32
                })
            })
            .collect();
        Self { values, indices }
    }

    /// Indices `0..n`, used when a primvar carries no index array.
    pub fn identity(values: Vec<Vec2>, n: usize) -> Self {
        Self { values, indices: (0..n as i32).collect() }
    }

    /// Number of face-vertices covered.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Check every index points into `values`.
    pub fn is_consistent(&self) -> bool {
        self.indices
            .iter()
            .all(|&i| i >= 0 && (i as usize) < self.values.len())
    }

    /// One UV per face-vertex. `None` if an index is out of range.
    pub fn expand(&self) -> Option<Vec<Vec2>> {
        self.indices
            .iter()
            .map(|&i| usize::try_from(i).ok().and_then(|i| self.values.get(i).copied()))
            .collect()
    }
}

/// Display color primvar.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayColor {
    /// One color for the whole mesh.
    Constant(Vec3),
    /// One color per vertex.
    Vertex(Vec<Vec3>),
}

impl DisplayColor {
    /// Pick constant when every color matches the first after rounding,
    /// vertex otherwise. Empty input has no display color.
    pub fn classify(colors: &[Vec3]) -> Option<Self> {
        let first = *colors.first()?;
        let key = |c: Vec3| {
            [
                round_to(c.x, COLOR_PRECISION),
                round_to(c.y, COLOR_PRECISION),
                round_to(c.z, COLOR_PRECISION),
            ]
        };
        let first_key = key(first);
        if colors.iter().all(|&c| key(c) == first_key) {
            Some(DisplayColor::Constant(first))
        } else {
            Some(DisplayColor::Vertex(colors.to_vec()))
        }
    }

    pub fn interpolation(&self) -> Interpolation {
        match self {
            DisplayColor::Constant(_) => Interpolation::Constant,
            DisplayColor::Vertex(_) => Interpolation::Vertex,
        }
    }

    /// Values as stored in the primvar.
    pub fn values(&self) -> Vec<Vec3> {
        match self {
            DisplayColor::Constant(c) => vec![*c],
            DisplayColor::Vertex(v) => v.clone(),
        }
    }

    /// One color per vertex for `num_points` vertices.
    pub fn per_vertex(&self, num_points: usize) -> Vec<Vec3> {
        match self {
            DisplayColor::Constant(c) => vec![*c; num_points],
            DisplayColor::Vertex(v) => v.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_dedup() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        let c = Vec2::new(1.0, 1.0);
        let uvs = IndexedUvs::from_face_varying(&[a, b, c, a, c, b]);
        assert_eq!(uvs.values, vec![a, b, c]);
        assert_eq!(uvs.indices, vec![0, 1, 2, 0, 2, 1]);
        assert!(uvs.is_consistent());
        assert_eq!(uvs.expand().unwrap(), vec![a, b, c, a, c, b]);
    }

    #[test]
    fn test_uv_identity_and_bad_index() {
        let uvs = IndexedUvs::identity(vec![Vec2::ZERO, Vec2::ONE], 2);
        assert_eq!(uvs.indices, vec![0, 1]);

        let bad = IndexedUvs { values: vec![Vec2::ZERO], indices: vec![0, 3] };
        assert!(!bad.is_consistent());
        assert!(bad.expand().is_none());
    }

    #[test]
    fn test_color_constant() {
        let red = Vec3::new(1.0, 0.0, 0.0);
        let colors = vec![red, Vec3::new(1.00001, 0.0, 0.00002), red];
        let color = DisplayColor::classify(&colors).unwrap();
        assert_eq!(color, DisplayColor::Constant(red));
        assert_eq!(color.values().len(), 1);
        assert_eq!(color.interpolation(), Interpolation::Constant);
        assert_eq!(color.per_vertex(3), vec![red; 3]);
    }

    #[test]
    fn test_color_vertex() {
        let colors = vec![Vec3::X, Vec3::Y, Vec3::X];
        let color = DisplayColor::classify(&colors).unwrap();
        assert_eq!(color.interpolation(), Interpolation::Vertex);
        assert_eq!(color.values().len(), 3);
        assert!(DisplayColor::classify(&[]).is_none());
    }
}
