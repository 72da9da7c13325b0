//! Transform policies
//!
//! Mesh and sprite renderers share every bit of lifecycle and pooling
//! logic. They differ only in how a particle's rotation and scale land on
//! the leased node, and in the body they fall back to.

use std::rc::Rc;

use crate::foundation::math::Vec3;
use crate::particle::Particle;
use crate::render::body::{BodyDefaults, BodyKind, BodyTemplate, RenderTarget};
use crate::render::RendererKind;
use crate::scene::{Geometry, Material};

/// Strategy applying particle orientation and size to a render target
pub trait TransformPolicy {
    /// Renderer kind reported by renderers using this policy
    fn kind(&self) -> RendererKind;

    /// Body used for particles that do not name one
    fn default_body(&self, defaults: &BodyDefaults) -> BodyTemplate;

    /// Apply the particle's rotation
    fn rotate(&self, particle: &Particle, target: &mut RenderTarget, material: &mut Material);

    /// Apply the particle's scale
    fn scale(&self, particle: &Particle, target: &mut RenderTarget);
}

/// Full 3-axis rotation and uniform scale
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshPolicy;

impl TransformPolicy for MeshPolicy {
    fn kind(&self) -> RendererKind {
        RendererKind::Mesh
    }

    fn default_body(&self, defaults: &BodyDefaults) -> BodyTemplate {
        let size = defaults.mesh_size;
        BodyTemplate {
            kind: BodyKind::Mesh,
            geometry: Rc::new(Geometry::cuboid(size, size, size)),
            material: Material::lambert(defaults.mesh_color),
        }
    }

    fn rotate(&self, particle: &Particle, target: &mut RenderTarget, _material: &mut Material) {
        target.rotation = particle.rotation;
    }

    fn scale(&self, particle: &Particle, target: &mut RenderTarget) {
        target.scale = Vec3::repeat(particle.scale);
    }
}

/// Camera-facing planes: a single roll angle and radius-weighted scale
#[derive(Debug, Clone, Copy, Default)]
pub struct SpritePolicy;

impl TransformPolicy for SpritePolicy {
    fn kind(&self) -> RendererKind {
        RendererKind::Sprite
    }

    fn default_body(&self, defaults: &BodyDefaults) -> BodyTemplate {
        BodyTemplate {
            kind: BodyKind::Sprite,
            geometry: Rc::new(Geometry::plane(1.0, 1.0)),
            material: Material::sprite(defaults.sprite_color),
        }
    }

    fn rotate(&self, particle: &Particle, _target: &mut RenderTarget, material: &mut Material) {
        material.rotation = particle.rotation.z;
    }

    fn scale(&self, particle: &Particle, target: &mut RenderTarget) {
        let size = particle.scale * particle.radius;
        target.scale = Vec3::new(size, size, 1.0);
    }
}
