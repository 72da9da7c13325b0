//! Prototype bodies and the render targets cloned from them
//!
//! A body is the template a particle is drawn with: a geometry plus a
//! default material. Bodies live in a [`BodyLibrary`] arena, and their
//! arena ids double as the pool identities, so every particle sharing a body
//! draws from one bucket of recycled targets.

use std::rc::Rc;

use slotmap::SlotMap;

use crate::config::{ConfigError, RendererConfig};
use crate::foundation::math::Vec3;
use crate::scene::{Color, Geometry, Material};

slotmap::new_key_type! {
    /// Prototype body handle
    pub struct BodyId;
    /// Shared prototype material handle
    pub struct MaterialId;
    /// Per-particle material leased from a renderer's material pool
    pub struct MaterialInstanceKey;
}

/// What kind of host object a body clones into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Full 3D mesh
    Mesh,
    /// Camera-facing sprite
    Sprite,
}

/// Prototype a render target is cloned from
#[derive(Debug, Clone)]
pub struct Body {
    /// Host object kind
    pub kind: BodyKind,
    /// Shared geometry
    pub geometry: Rc<Geometry>,
    /// Default material, also the identity of per-particle material pools
    pub material: MaterialId,
}

/// Body description before it is registered
#[derive(Debug, Clone)]
pub struct BodyTemplate {
    /// Host object kind
    pub kind: BodyKind,
    /// Geometry to share between clones
    pub geometry: Rc<Geometry>,
    /// Default material
    pub material: Material,
}

/// Parsed defaults for the bodies renderers provision for themselves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDefaults {
    /// Edge length of the default box mesh
    pub mesh_size: f32,
    /// Default mesh color
    pub mesh_color: Color,
    /// Default sprite color
    pub sprite_color: Color,
}

impl Default for BodyDefaults {
    fn default() -> Self {
        Self {
            mesh_size: 50.0,
            mesh_color: Color::new(1.0, 0.0, 0.0),
            sprite_color: Color::WHITE,
        }
    }
}

impl TryFrom<&RendererConfig> for BodyDefaults {
    type Error = ConfigError;

    fn try_from(config: &RendererConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self {
            mesh_size: config.default_mesh_size,
            mesh_color: config.mesh_color()?,
            sprite_color: config.sprite_color()?,
        })
    }
}

/// Arena of prototype bodies and their materials
#[derive(Debug, Default)]
pub struct BodyLibrary {
    bodies: SlotMap<BodyId, Body>,
    materials: SlotMap<MaterialId, Material>,
}

impl BodyLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared material
    pub fn insert_material(&mut self, material: Material) -> MaterialId {
        self.materials.insert(material)
    }

    /// Register a body along with its default material
    pub fn insert(&mut self, template: BodyTemplate) -> BodyId {
        let material = self.insert_material(template.material);
        self.bodies.insert(Body {
            kind: template.kind,
            geometry: template.geometry,
            material,
        })
    }

    /// Register a body that reuses an already registered material
    ///
    /// Bodies sharing a material also share its per-particle material pool.
    pub fn insert_sharing_material(
        &mut self,
        kind: BodyKind,
        geometry: Rc<Geometry>,
        material: MaterialId,
    ) -> Option<BodyId> {
        if !self.materials.contains_key(material) {
            return None;
        }
        Some(self.bodies.insert(Body { kind, geometry, material }))
    }

    /// Look up a body
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    /// Look up a shared material
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Mutable shared material
    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    /// Number of registered bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether no bodies are registered
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// Which material a render target currently draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialBinding {
    /// The body's shared default material
    Shared(MaterialId),
    /// A per-particle material leased from the renderer
    Instance(MaterialInstanceKey),
}

/// Host scene node leased to one live particle
#[derive(Debug, Clone)]
pub struct RenderTarget {
    /// Host object kind
    pub kind: BodyKind,
    /// Body this node was cloned from
    pub body: BodyId,
    /// Geometry shared with the body
    pub geometry: Rc<Geometry>,
    /// World position
    pub position: Vec3,
    /// Euler rotation in radians
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
    /// Current material
    pub material: MaterialBinding,
    /// Body default material, restored when a leased material is released
    pub base_material: MaterialId,
}

impl RenderTarget {
    /// Clone a node from a body
    pub fn from_body(id: BodyId, body: &Body) -> Self {
        Self {
            kind: body.kind,
            body: id,
            geometry: Rc::clone(&body.geometry),
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            material: MaterialBinding::Shared(body.material),
            base_material: body.material,
        }
    }

    /// Whether this node is a camera-facing sprite
    pub fn is_sprite(&self) -> bool {
        self.kind == BodyKind::Sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_template() -> BodyTemplate {
        BodyTemplate {
            kind: BodyKind::Mesh,
            geometry: Rc::new(Geometry::cuboid(1.0, 1.0, 1.0)),
            material: Material::lambert(Color::WHITE),
        }
    }

    #[test]
    fn test_insert_registers_material() {
        let mut library = BodyLibrary::new();
        let id = library.insert(cube_template());

        let body = library.body(id).unwrap();
        assert_eq!(body.kind, BodyKind::Mesh);
        assert_eq!(library.material(body.material), Some(&Material::lambert(Color::WHITE)));
    }

    #[test]
    fn test_sharing_material_requires_known_material() {
        let mut library = BodyLibrary::new();
        let first = library.insert(cube_template());
        let material = library.body(first).unwrap().material;

        let geometry = Rc::new(Geometry::plane(1.0, 1.0));
        let second = library
            .insert_sharing_material(BodyKind::Sprite, geometry.clone(), material)
            .unwrap();
        assert_eq!(library.body(second).unwrap().material, material);

        let mut other = BodyLibrary::new();
        assert!(other.insert_sharing_material(BodyKind::Sprite, geometry, material).is_none());
    }

    #[test]
    fn test_target_starts_on_shared_material() {
        let mut library = BodyLibrary::new();
        let id = library.insert(cube_template());
        let body = library.body(id).unwrap();

        let target = RenderTarget::from_body(id, body);
        assert_eq!(target.material, MaterialBinding::Shared(body.material));
        assert_eq!(target.scale, Vec3::new(1.0, 1.0, 1.0));
        assert!(!target.is_sprite());
    }

    #[test]
    fn test_body_defaults_from_config() {
        let defaults = BodyDefaults::try_from(&RendererConfig::default()).unwrap();
        assert_eq!(defaults, BodyDefaults::default());

        let config = RendererConfig {
            default_sprite_color: "white".to_string(),
            ..RendererConfig::default()
        };
        assert!(BodyDefaults::try_from(&config).is_err());
    }
}
