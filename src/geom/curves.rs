//! NURBS curves schema codec.
//!
//! A `NurbsCurves` prim packs any number of open curves: control points are
//! concatenated in `points`, with one `curveVertexCounts` and one `order`
//! entry per curve. Stage knot vectors carry `count + order` values per curve,
//! which is the host's span knot vector with its end knots repeated once.

use glam::Vec3;
use tracing::warn;

use super::mesh::{read_ints, read_vec3, EXTENT, POINTS};
use crate::scene::{CurveData, CurveForm};
use crate::stage::{Prim, PrimPath, Stage, Value};
use crate::util::{BBox3f, Error, Result};

/// Curves prim type name.
pub const NURBS_CURVES_TYPE: &str = "NurbsCurves";

pub const CURVE_VERTEX_COUNTS: &str = "curveVertexCounts";
pub const ORDER: &str = "order";
pub const KNOTS: &str = "knots";

/// Curves payload in stage layout.
#[derive(Clone, Debug, PartialEq)]
pub struct CurvesSample {
    pub points: Vec<Vec3>,
    pub curve_vertex_counts: Vec<i32>,
    pub order: Vec<i32>,
    pub knots: Vec<f64>,
    pub extent: BBox3f,
}

impl CurvesSample {
    /// Pack host curves. Every curve is written open and non-rational.
    pub fn encode(curves: &[CurveData], path: &str) -> Result<Self> {
        if curves.is_empty() {
            return Err(Error::EmptyGeometry { path: path.to_string(), missing: POINTS });
        }

        let mut sample = Self {
            points: Vec::new(),
            curve_vertex_counts: Vec::with_capacity(curves.len()),
            order: Vec::with_capacity(curves.len()),
            knots: Vec::new(),
            extent: BBox3f::EMPTY,
        };

        for (i, curve) in curves.iter().enumerate() {
            if curve.cvs.is_empty() {
                return Err(Error::EmptyGeometry { path: path.to_string(), missing: POINTS });
            }
            if curve.cvs.len() <= curve.degree as usize {
                return Err(Error::invalid_geometry(
                    path,
                    format!("curve {i}: {} cvs for degree {}", curve.cvs.len(), curve.degree),
                ));
            }
            if curve.knots.len() != curve.expected_knots() {
                return Err(Error::invalid_geometry(
                    path,
                    format!("curve {i}: {} knots, expected {}", curve.knots.len(), curve.expected_knots()),
                ));
            }
            if curve.form != CurveForm::Open {
                warn!("{path}: curve {i} is {:?}, writing it open", curve.form);
            }

            sample.points.extend_from_slice(&curve.cvs);
            sample.curve_vertex_counts.push(curve.cvs.len() as i32);
            sample.order.push(curve.degree as i32 + 1);
            sample.knots.extend(pad_knots(&curve.knots));
        }

        sample.extent = BBox3f::from_points(&sample.points);
        Ok(sample)
    }

    /// Split back into host curves.
    pub fn decode(&self, path: &str) -> Result<Vec<CurveData>> {
        if self.curve_vertex_counts.len() != self.order.len() {
            return Err(Error::invalid_geometry(
                path,
                format!("{} curve counts but {} orders", self.curve_vertex_counts.len(), self.order.len()),
            ));
        }

        let mut curves = Vec::with_capacity(self.curve_vertex_counts.len());
        let mut point_cursor = 0usize;
        let mut knot_cursor = 0usize;
        for (i, (&count, &order)) in self.curve_vertex_counts.iter().zip(&self.order).enumerate() {
            if count <= 0 || order <= 0 || order > count {
                return Err(Error::invalid_geometry(path, format!("curve {i}: count {count}, order {order}")));
            }
            let (count, order) = (count as usize, order as usize);

            let cvs = self
                .points
                .get(point_cursor..point_cursor + count)
                .ok_or_else(|| Error::invalid_geometry(path, format!("curve {i}: points exhausted")))?;
            let knots = self
                .knots
                .get(knot_cursor..knot_cursor + count + order)
                .ok_or_else(|| Error::invalid_geometry(path, format!("curve {i}: knots exhausted")))?;
            point_cursor += count;
            knot_cursor += count + order;

            curves.push(CurveData::new(cvs.to_vec(), strip_knots(knots), order as u32 - 1));
        }

        if point_cursor != self.points.len() || knot_cursor != self.knots.len() {
            warn!("{path}: ignoring trailing curve data");
        }
        Ok(curves)
    }

    /// Author this sample onto an existing prim.
    pub fn write(&self, stage: &mut Stage, prim: &PrimPath) -> Result<()> {
        stage.set_attribute(prim, POINTS, Value::Point3fArray(self.points.clone()).into())?;
        stage.set_attribute(prim, CURVE_VERTEX_COUNTS, Value::IntArray(self.curve_vertex_counts.clone()).into())?;
        stage.set_attribute(prim, ORDER, Value::IntArray(self.order.clone()).into())?;
        stage.set_attribute(prim, KNOTS, Value::DoubleArray(self.knots.clone()).into())?;
        stage.set_attribute(prim, EXTENT, Value::Float3Array(self.extent.corners().to_vec()).into())?;
        Ok(())
    }

    /// Read a sample from a composed prim.
    pub fn read(prim: &Prim<'_>) -> Result<Self> {
        let path = prim.path().to_string();
        let points = read_vec3(prim, POINTS, &path)?;
        let curve_vertex_counts = read_ints(prim, CURVE_VERTEX_COUNTS, &path)?;
        let order = read_ints(prim, ORDER, &path)?;
        let knots = prim
            .attribute(KNOTS)
            .and_then(|attr| attr.value.as_double_array())
            .filter(|k| !k.is_empty())
            .map(<[f64]>::to_vec)
            .ok_or_else(|| Error::EmptyGeometry { path: path.clone(), missing: KNOTS })?;

        let extent = prim
            .attribute(EXTENT)
            .and_then(|attr| attr.value.as_vec3_array())
            .filter(|corners| corners.len() == 2)
            .map(|corners| BBox3f::new(corners[0], corners[1]))
            .unwrap_or_else(|| BBox3f::from_points(&points));

        Ok(Self { points, curve_vertex_counts, order, knots, extent })
    }

    pub fn num_curves(&self) -> usize {
        self.curve_vertex_counts.len()
    }
}

/// Span knots to full knots: repeat the first and last value once.
pub fn pad_knots(knots: &[f64]) -> Vec<f64> {
    let (Some(&first), Some(&last)) = (knots.first(), knots.last()) else {
        return Vec::new();
    };
    let mut full = Vec::with_capacity(knots.len() + 2);
    full.push(first);
    full.extend_from_slice(knots);
    full.push(last);
    full
}

/// Full knots to span knots: drop the outermost value on each side.
pub fn strip_knots(knots: &[f64]) -> Vec<f64> {
    if knots.len() < 2 {
        return Vec::new();
    }
    knots[1..knots.len() - 1].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::StageMetadata;

    /// Degree-3 curve with 4 cvs: span knots [0,0,0,1,1,1].
    fn cubic(offset: f32) -> CurveData {
        let cvs = (0..4).map(|i| Vec3::new(i as f32, offset, 0.0)).collect();
        CurveData::new(cvs, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0], 3)
    }

    #[test]
    fn test_knot_padding() {
        let span = [0.0, 0.0, 1.0, 2.0, 2.0];
        let full = pad_knots(&span);
        assert_eq!(full, vec![0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 2.0]);
        assert_eq!(strip_knots(&full), span.to_vec());
        assert!(pad_knots(&[]).is_empty());
        assert!(strip_knots(&[1.0]).is_empty());
    }

    #[test]
    fn test_encode_single() {
        let sample = CurvesSample::encode(&[cubic(0.0)], "/c").unwrap();
        assert_eq!(sample.num_curves(), 1);
        assert_eq!(sample.curve_vertex_counts, vec![4]);
        assert_eq!(sample.order, vec![4]);
        assert_eq!(sample.knots.len(), 8);
        assert_eq!(sample.extent.max, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_encode_errors() {
        assert!(matches!(CurvesSample::encode(&[], "/c"), Err(Error::EmptyGeometry { .. })));

        let mut bad = cubic(0.0);
        bad.knots.pop();
        assert!(matches!(CurvesSample::encode(&[bad], "/c"), Err(Error::InvalidGeometry { .. })));

        let short = CurveData::new(vec![Vec3::ZERO, Vec3::X], vec![0.0, 0.0, 1.0, 1.0], 3);
        assert!(matches!(CurvesSample::encode(&[short], "/c"), Err(Error::InvalidGeometry { .. })));
    }

    #[test]
    fn test_multi_curve_roundtrip() {
        let linear = CurveData::new(vec![Vec3::ZERO, Vec3::Y, Vec3::Z], vec![0.0, 1.0, 2.0], 1);
        let curves = vec![cubic(0.0), linear, cubic(5.0)];

        let mut stage = Stage::new_anonymous(StageMetadata::default());
        let path = PrimPath::parse("/curves").unwrap();
        stage.define_prim(&path, NURBS_CURVES_TYPE).unwrap();
        let sample = CurvesSample::encode(&curves, "/curves").unwrap();
        assert_eq!(sample.curve_vertex_counts, vec![4, 3, 4]);
        assert_eq!(sample.order, vec![4, 2, 4]);
        sample.write(&mut stage, &path).unwrap();

        let read = CurvesSample::read(&stage.prim(&path).unwrap()).unwrap();
        assert_eq!(read, sample);
        assert_eq!(read.decode("/curves").unwrap(), curves);
    }

    #[test]
    fn test_decode_rejects_mismatch() {
        let mut sample = CurvesSample::encode(&[cubic(0.0)], "/c").unwrap();
        sample.knots.truncate(5);
        assert!(matches!(sample.decode("/c"), Err(Error::InvalidGeometry { .. })));

        let mut sample = CurvesSample::encode(&[cubic(0.0)], "/c").unwrap();
        sample.order.push(2);
        assert!(matches!(sample.decode("/c"), Err(Error::InvalidGeometry { .. })));
    }
}
