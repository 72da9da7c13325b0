//! Host scene primitives
//!
//! The renderer and zones treat the host's scene graph as opaque: nodes with
//! settable transform and material fields that can be added to and removed
//! from a container. This module models exactly that boundary as plain data,
//! which is enough for a backend to mirror into its own scene and for the
//! engine to be driven headless.

pub mod container;
pub mod geometry;
pub mod material;

pub use container::{Group, SceneContainer, TargetKey};
pub use geometry::{Geometry, Mesh, SceneObject};
pub use material::{Color, Material, Shading};
