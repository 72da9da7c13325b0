//! # Particle Engine
//!
//! Renderer synchronization and spatial zones for a particle-effects engine.
//!
//! ## Features
//!
//! - **Pooled Renderers**: Particle lifecycle events lease, update and release
//!   pooled scene nodes and materials without per-frame allocation
//! - **Sprite Support**: Sprites share the mesh pipeline through a transform policy
//! - **Zones**: Spherical and mesh-surface regions for spawning and containment
//! - **Deterministic Randomness**: Seedable generator for reproducible effects
//!
//! ## Quick Start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use particle_engine::prelude::*;
//!
//! let mut dispatcher = EventDispatcher::new();
//! let renderer = Rc::new(RefCell::new(MeshRenderer::new(RendererId(1), Group::new())));
//! let attachment = attach(&renderer, &mut dispatcher);
//!
//! let mut rng = MathRandom::seeded(7);
//! let mut zone = SphereZone::new(Vec3::zeros(), 10.0);
//! let mut particle = Particle::at(zone.get_position(&mut rng));
//!
//! dispatcher.dispatch_particle(RendererId(1), ParticleEventKind::Created, &mut particle);
//! assert_eq!(renderer.borrow().container().len(), 1);
//!
//! dispatcher.dispatch_particle(RendererId(1), ParticleEventKind::Dead, &mut particle);
//! attachment.detach(&mut dispatcher);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod events;
pub mod foundation;
pub mod particle;
pub mod render;
pub mod scene;
pub mod zone;

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EngineConfig, RendererConfig, ZoneConfig},
        events::{EventDispatcher, EventPayload, ParticleEventKind, SystemTick, SYSTEM_UPDATE},
        foundation::{
            math::Vec3,
            random::MathRandom,
        },
        particle::Particle,
        render::{
            attach, Attachment, BodyId, BodyTemplate, MeshRenderer, ParticleRenderer, RendererId,
            RendererKind, SpriteRenderer, TargetLease,
        },
        scene::{Color, Geometry, Group, Material, Mesh, SceneContainer, SceneObject},
        zone::{CrossType, MeshZone, SphereZone, Zone, ZoneBounds, ZoneError},
    };
}
