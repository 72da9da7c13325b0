//! Spatial zones
//!
//! A zone is a region emitters sample spawn positions from and that can
//! constrain particles at its boundary. Not every zone supports every
//! boundary behaviour; [`ZoneCapabilities`] advertises what a zone
//! implements, and calling an unsupported behaviour logs a warning and
//! leaves the particle untouched.

pub mod mesh;
pub mod sphere;

use std::fmt;

use bitflags::bitflags;
use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::foundation::random::MathRandom;
use crate::particle::Particle;

pub use mesh::{MeshZone, ZoneBounds};
pub use sphere::SphereZone;

bitflags! {
    /// Behaviours a zone implements
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ZoneCapabilities: u8 {
        /// `get_position` samples the region
        const SAMPLING = 1;
        /// `contain` kills particles that leave the region
        const CONTAINMENT = 1 << 1;
        /// `bound` reflects particles off the boundary
        const BOUNDARY = 1 << 2;
        /// `cross` reports boundary crossings
        const CROSSING = 1 << 3;
    }
}

/// Zone variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    /// Ball around a center point
    Sphere,
    /// Vertices of a host geometry
    Mesh,
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sphere => "SphereZone",
            Self::Mesh => "MeshZone",
        })
    }
}

/// What [`Zone::crossing`] does when a particle reaches the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossType {
    /// Kill the particle once it leaves
    #[default]
    Dead,
    /// Reflect the particle back inside
    Bound,
    /// Report the crossing and keep the particle alive
    Cross,
}

/// Zone construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZoneError {
    /// The supplied bounds carry no geometry anywhere in their hierarchy
    #[error("MeshZone unable to set geometry from the supplied bounds")]
    MissingGeometry,
    /// The geometry has no complete vertex to sample
    #[error("MeshZone geometry has no vertices")]
    EmptyGeometry,
}

/// Spatial region with optional boundary behaviours
pub trait Zone {
    /// Variant tag
    fn kind(&self) -> ZoneKind;

    /// Behaviours this zone implements
    fn capabilities(&self) -> ZoneCapabilities;

    /// Behaviour selected for [`Zone::crossing`]
    fn cross_type(&self) -> CrossType;

    /// Whether crossing detection is implemented
    fn supports_crossing(&self) -> bool {
        self.capabilities().contains(ZoneCapabilities::CROSSING)
    }

    /// Sample a point of the region
    fn get_position(&mut self, rng: &mut MathRandom) -> Vec3;

    /// Mark the particle dead once it has left the region
    fn contain(&self, _particle: &mut Particle) {
        unsupported(self.kind(), "containment");
    }

    /// Reflect the particle's velocity when it touches the boundary
    fn bound(&self, _particle: &mut Particle) {
        unsupported(self.kind(), "boundary response");
    }

    /// Report a boundary crossing without killing the particle
    fn cross(&self, _particle: &mut Particle) {
        unsupported(self.kind(), "the cross method");
    }

    /// Apply the configured [`CrossType`] behaviour
    fn crossing(&self, particle: &mut Particle) {
        match self.cross_type() {
            CrossType::Dead => self.contain(particle),
            CrossType::Bound => self.bound(particle),
            CrossType::Cross => self.cross(particle),
        }
    }
}

fn unsupported(kind: ZoneKind, behaviour: &str) {
    log::warn!("{} does not support {}", kind, behaviour);
}
