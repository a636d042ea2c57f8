//! # scenebridge
//!
//! Bidirectional synchronization between a live, mutable scene graph and a
//! persisted interchange stage with variant-set composition.
//!
//! ## Modules
//!
//! - [`util`] - Errors, math types, logging bootstrap
//! - [`stage`] - Interchange stage (prims, attributes, variant sets, save/open)
//! - [`scene`] - Source scene graph seam ([`scene::SceneHost`]) and an in-memory host
//! - [`geom`] - Geometry codec for mesh and curve payloads
//! - [`prims`] - Type-dispatch registry and per-kind handlers
//! - [`sync`] - Export and import traversals
//!
//! ## Example
//!
//! ```ignore
//! use scenebridge::prelude::*;
//!
//! let mut scene = SceneGraph::with_default_cameras();
//! let group = scene.create_transform("group1", None)?;
//! export_scene(&scene, "out.stage.json", ExportOptions::default())?;
//!
//! let mut target = SceneGraph::new();
//! let imported = import_scene(&mut target, "out.stage.json", ImportOptions::default())?;
//! println!("{} nodes created", imported.report.created);
//! ```

pub mod util;
pub mod stage;
pub mod scene;
pub mod geom;
pub mod prims;
pub mod sync;

// Re-export commonly used types
pub use util::{Error, Result};
pub use sync::{export_scene, import_scene};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, BBox3f, Vec2, Vec3, Mat4};
    pub use crate::stage::{Stage, Prim, PrimPath, LinearUnit, UpAxis, Value, Attribute, Interpolation};
    pub use crate::scene::{SceneHost, SceneGraph, NodeId, MeshData, UvSet, CurveData, Space};
    pub use crate::prims::{PrimKind, Registry};
    pub use crate::sync::{
        export_scene, import_scene, Exporter, Importer,
        ExportOptions, ImportOptions, ImportResult, SyncReport,
    };
}
