//! Scene graph / stage synchronization.
//!
//! [`export_scene`] walks a host scene and writes a stage file;
//! [`import_scene`] reads a stage file and rebuilds the hierarchy on a host.

mod export;
mod import;
mod options;
mod report;

pub use export::{export_scene, Exporter};
pub use import::{import_scene, ImportResult, Importer};
pub use options::{ExportOptions, ImportOptions, DEFAULT_CAMERAS};
pub use report::{Skipped, SyncReport};
