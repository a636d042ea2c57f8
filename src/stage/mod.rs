//! Interchange stage.
//!
//! A [`Stage`] composes one root [`Layer`] of [`PrimSpec`]s into a tree of
//! [`Prim`]s. Variant sets layer alternative edits onto a single prim path;
//! the selected variant of each set contributes to composition.

mod path;
mod value;
mod metadata;
mod spec;
mod stage;
mod prim;
mod variant;

pub use path::{PrimPath, SEPARATOR, is_valid_name, sanitize_name};
pub use value::{Value, Attribute, Interpolation};
pub use metadata::{UpAxis, LinearUnit, StageMetadata};
pub use spec::{Layer, PrimSpec, VariantSetSpec, Specifier, SpecAddress, SpecStep, LAYER_FORMAT, LAYER_VERSION};
pub use stage::{Stage, VariantEditTarget};
pub use prim::Prim;
