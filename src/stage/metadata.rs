//! Stage-level metadata: up axis and linear units.

use serde::{Deserialize, Serialize};

/// Stage up axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpAxis {
    #[default]
    Y,
    Z,
}

impl UpAxis {
    /// Parse the host's axis letter. Anything other than `z`/`Z` is Y.
    pub fn from_letter(letter: &str) -> Self {
        if letter.eq_ignore_ascii_case("z") {
            UpAxis::Z
        } else {
            UpAxis::Y
        }
    }

    /// Axis letter as stored in the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpAxis::Y => "Y",
            UpAxis::Z => "Z",
        }
    }
}

/// Host linear unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinearUnit {
    Millimeter,
    Centimeter,
    #[default]
    Meter,
    Inch,
    Foot,
    Yard,
}

impl LinearUnit {
    /// Parse a host unit name (`mm`, `cm`, `m`, `in`, `ft`, `yd`).
    /// Unknown names map to meters.
    pub fn from_name(name: &str) -> Self {
        match name {
            "mm" | "millimeter" => LinearUnit::Millimeter,
            "cm" | "centimeter" => LinearUnit::Centimeter,
            "in" | "inch" => LinearUnit::Inch,
            "ft" | "foot" => LinearUnit::Foot,
            "yd" | "yard" => LinearUnit::Yard,
            _ => LinearUnit::Meter,
        }
    }

    /// Short unit name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinearUnit::Millimeter => "mm",
            LinearUnit::Centimeter => "cm",
            LinearUnit::Meter => "m",
            LinearUnit::Inch => "in",
            LinearUnit::Foot => "ft",
            LinearUnit::Yard => "yd",
        }
    }

    /// Meters per unit.
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            LinearUnit::Millimeter => 0.001,
            LinearUnit::Centimeter => 0.01,
            LinearUnit::Meter => 1.0,
            LinearUnit::Inch => 0.0254,
            LinearUnit::Foot => 0.3048,
            LinearUnit::Yard => 0.9144,
        }
    }
}

/// Metadata stored on the root layer. Written once at stage creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageMetadata {
    pub up_axis: UpAxis,
    pub meters_per_unit: f64,
}

impl Default for StageMetadata {
    fn default() -> Self {
        Self { up_axis: UpAxis::Y, meters_per_unit: 1.0 }
    }
}

impl StageMetadata {
    /// Metadata for a host's axis and unit.
    pub fn new(up_axis: UpAxis, unit: LinearUnit) -> Self {
        Self { up_axis, meters_per_unit: unit.meters_per_unit() }
    }
}
