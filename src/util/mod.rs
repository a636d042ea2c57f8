//! Utility types and functions.
//!
//! This module contains fundamental types used throughout the library:
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam plus [`BBox3f`]
//! - [`logging`] - tracing subscriber bootstrap

mod error;
mod math;
pub mod logging;

pub use error::*;
pub use math::*;
