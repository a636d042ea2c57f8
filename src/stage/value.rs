//! Attribute values and primvar interpolation.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Typed attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    #[serde(rename = "token")]
    Token(String),
    #[serde(rename = "int")]
    Int(i32),
    #[serde(rename = "double")]
    Double(f64),
    #[serde(rename = "int[]")]
    IntArray(Vec<i32>),
    #[serde(rename = "double[]")]
    DoubleArray(Vec<f64>),
    #[serde(rename = "texCoord2f[]")]
    TexCoord2fArray(Vec<Vec2>),
    #[serde(rename = "point3f[]")]
    Point3fArray(Vec<Vec3>),
    #[serde(rename = "color3f[]")]
    Color3fArray(Vec<Vec3>),
    #[serde(rename = "float3[]")]
    Float3Array(Vec<Vec3>),
}

impl Value {
    /// Type name as written in the layer.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Token(_) => "token",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::IntArray(_) => "int[]",
            Value::DoubleArray(_) => "double[]",
            Value::TexCoord2fArray(_) => "texCoord2f[]",
            Value::Point3fArray(_) => "point3f[]",
            Value::Color3fArray(_) => "color3f[]",
            Value::Float3Array(_) => "float3[]",
        }
    }

    pub fn as_token(&self) -> Option<&str> {
        match self {
            Value::Token(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Value::IntArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double_array(&self) -> Option<&[f64]> {
        match self {
            Value::DoubleArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec2_array(&self) -> Option<&[Vec2]> {
        match self {
            Value::TexCoord2fArray(v) => Some(v),
            _ => None,
        }
    }

    /// Any of the 3-vector array roles (points, colors, plain float3).
    pub fn as_vec3_array(&self) -> Option<&[Vec3]> {
        match self {
            Value::Point3fArray(v) | Value::Color3fArray(v) | Value::Float3Array(v) => Some(v),
            _ => None,
        }
    }
}

/// Primvar interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interpolation {
    /// One value for the whole primitive.
    Constant,
    /// One value per face.
    Uniform,
    /// One value per point.
    Vertex,
    /// One value per face corner.
    FaceVarying,
}

impl Interpolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interpolation::Constant => "constant",
            Interpolation::Uniform => "uniform",
            Interpolation::Vertex => "vertex",
            Interpolation::FaceVarying => "faceVarying",
        }
    }
}

/// An authored attribute: a value plus optional primvar decoration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<Interpolation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<i32>>,
}

impl Attribute {
    /// Plain attribute.
    pub fn new(value: Value) -> Self {
        Self { value, interpolation: None, indices: None }
    }

    /// Primvar with an interpolation mode.
    pub fn primvar(value: Value, interpolation: Interpolation) -> Self {
        Self { value, interpolation: Some(interpolation), indices: None }
    }

    /// Attach an index array (indexed primvar).
    pub fn with_indices(mut self, indices: Vec<i32>) -> Self {
        self.indices = Some(indices);
        self
    }
}

impl From<Value> for Attribute {
    fn from(value: Value) -> Self {
        Attribute::new(value)
    }
}
