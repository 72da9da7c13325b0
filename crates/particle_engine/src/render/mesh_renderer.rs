//! Pooled mesh renderer
//!
//! `MeshRenderer` owns everything needed to mirror particles into a host
//! container: a library of prototype bodies, a pool of render targets keyed
//! by body, and a pool of per-particle materials keyed by the body's default
//! material. The [`TransformPolicy`] parameter decides how rotation and scale
//! are applied, which is the only thing the sprite variant changes.
//!
//! # Invariants
//!
//! - A target is in the container exactly while a live particle holds it
//! - A per-particle material is leased the first time its particle asks for
//!   alpha or color individualization and stays leased until the target is
//!   released; alpha and color never touch a shared material
//! - Targets return to the pool bound to their body's shared material
//! - Hooks act only on live leases this renderer issued; stale or foreign
//!   leases never reach the pool or the container

use crate::config::{ConfigError, RendererConfig};
use crate::particle::Particle;
use crate::render::body::{
    BodyDefaults, BodyId, BodyLibrary, MaterialBinding, MaterialId, MaterialInstanceKey,
    RenderTarget,
};
use crate::render::policy::{MeshPolicy, SpritePolicy, TransformPolicy};
use crate::render::pool::Pool;
use crate::render::{ParticleRenderer, RendererId, RendererKind, TargetLease};
use crate::scene::{Material, SceneContainer, TargetKey};

/// Renderer drawing particles as sprites
pub type SpriteRenderer<C> = MeshRenderer<C, SpritePolicy>;

/// Renderer drawing particles as pooled scene nodes
#[derive(Debug)]
pub struct MeshRenderer<C, P = MeshPolicy> {
    id: RendererId,
    policy: P,
    container: C,
    library: BodyLibrary,
    default_body: BodyId,
    targets: Pool<BodyId, TargetKey, RenderTarget>,
    materials: Pool<MaterialId, MaterialInstanceKey, Material>,
}

impl<C: SceneContainer> MeshRenderer<C> {
    /// Mesh renderer with the built-in red box body
    pub fn new(id: RendererId, container: C) -> Self {
        Self::with_policy(id, container, MeshPolicy)
    }
}

impl<C: SceneContainer> MeshRenderer<C, SpritePolicy> {
    /// Sprite renderer with the built-in white sprite body
    pub fn sprite(id: RendererId, container: C) -> Self {
        Self::with_policy(id, container, SpritePolicy)
    }
}

impl<C: SceneContainer, P: TransformPolicy> MeshRenderer<C, P> {
    /// Renderer using `policy` and the built-in body defaults
    pub fn with_policy(id: RendererId, container: C, policy: P) -> Self {
        Self::build(id, container, policy, &BodyDefaults::default(), 0)
    }

    /// Renderer using `policy` with defaults taken from configuration
    pub fn with_config(
        id: RendererId,
        container: C,
        policy: P,
        config: &RendererConfig,
    ) -> Result<Self, ConfigError> {
        let defaults = BodyDefaults::try_from(config)?;
        Ok(Self::build(id, container, policy, &defaults, config.pool_capacity_hint))
    }

    fn build(id: RendererId, container: C, policy: P, defaults: &BodyDefaults, capacity: usize) -> Self {
        let mut library = BodyLibrary::new();
        let default_body = library.insert(policy.default_body(defaults));

        Self {
            id,
            policy,
            container,
            library,
            default_body,
            targets: Pool::with_capacity(capacity),
            materials: Pool::with_capacity(capacity),
        }
    }

    /// Host container
    pub fn container(&self) -> &C {
        &self.container
    }

    /// Mutable host container
    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    /// Prototype bodies known to this renderer
    pub fn library(&self) -> &BodyLibrary {
        &self.library
    }

    /// Mutable body library, used to register custom particle bodies
    pub fn library_mut(&mut self) -> &mut BodyLibrary {
        &mut self.library
    }

    /// Body given to particles that do not name one
    pub fn default_body(&self) -> BodyId {
        self.default_body
    }

    /// Render target behind `key`
    pub fn target(&self, key: TargetKey) -> Option<&RenderTarget> {
        self.targets.resource(key)
    }

    /// Material the target behind `key` currently draws with
    pub fn material_of(&self, key: TargetKey) -> Option<&Material> {
        match self.targets.resource(key)?.material {
            MaterialBinding::Shared(id) => self.library.material(id),
            MaterialBinding::Instance(instance) => self.materials.resource(instance),
        }
    }

    /// Whether the particle's target is a sprite
    pub fn is_sprite_target(&self, particle: &Particle) -> bool {
        self.live_key(particle)
            .and_then(|key| self.targets.resource(key))
            .is_some_and(RenderTarget::is_sprite)
    }

    /// Whether `lease` was issued by this renderer and is still held
    pub fn holds(&self, lease: TargetLease) -> bool {
        lease.renderer == self.id
            && self.targets.is_active(lease.key)
            && self.targets.lease_of(lease.key) == Some(lease.generation)
    }

    fn live_key(&self, particle: &Particle) -> Option<TargetKey> {
        particle
            .target
            .filter(|lease| self.holds(*lease))
            .map(|lease| lease.key)
    }

    fn owns(&self, particle: &Particle) -> bool {
        particle.target.is_some_and(|lease| lease.renderer == self.id)
    }

    /// Targets currently leased
    pub fn active_targets(&self) -> usize {
        self.targets.total_active()
    }

    /// Targets created so far
    pub fn allocated_targets(&self) -> usize {
        self.targets.allocated()
    }

    /// Per-particle materials currently leased
    pub fn active_materials(&self) -> usize {
        self.materials.total_active()
    }

    /// Per-particle materials created so far
    pub fn allocated_materials(&self) -> usize {
        self.materials.allocated()
    }

    fn resolve_body(&self, requested: Option<BodyId>) -> BodyId {
        match requested {
            Some(id) if self.library.body(id).is_some() => id,
            Some(id) => {
                log::warn!("Renderer {} has no body {:?}; using its default body", self.id, id);
                self.default_body
            }
            None => self.default_body,
        }
    }

    fn lease_target(&mut self, particle: &mut Particle) -> Option<TargetLease> {
        let body_id = self.resolve_body(particle.body);
        particle.body = Some(body_id);

        let body = self.library.body(body_id)?;
        let key = self.targets.get(body_id, || RenderTarget::from_body(body_id, body));

        if particle.wants_own_material() {
            self.lease_material(key);
        }

        Some(TargetLease {
            renderer: self.id,
            key,
            generation: self.targets.lease_of(key)?,
        })
    }

    /// Give the target behind `key` its own material if it still draws with the shared one
    fn lease_material(&mut self, key: TargetKey) {
        let Some(target) = self.targets.resource_mut(key) else {
            return;
        };
        let MaterialBinding::Shared(base) = target.material else {
            return;
        };
        let Some(template) = self.library.material(base) else {
            return;
        };

        let instance = self.materials.get(base, || template.clone());
        if let Some(material) = self.materials.resource_mut(instance) {
            material.clone_from(template);
        }
        target.material = MaterialBinding::Instance(instance);
    }
}

impl<C: SceneContainer, P: TransformPolicy> ParticleRenderer for MeshRenderer<C, P> {
    fn id(&self) -> RendererId {
        self.id
    }

    fn kind(&self) -> RendererKind {
        self.policy.kind()
    }

    fn on_particle_created(&mut self, particle: &mut Particle) {
        if let Some(lease) = particle.target {
            if lease.renderer != self.id {
                log::trace!("Renderer {} ignoring target leased by renderer {}", self.id, lease.renderer);
                return;
            }
            if !self.holds(lease) {
                log::debug!("Renderer {} replacing released target {:?}", self.id, lease.key);
                particle.target = None;
            }
        }
        if particle.target.is_none() {
            particle.target = self.lease_target(particle);
        }

        let Some(key) = self.live_key(particle) else {
            return;
        };
        if let Some(target) = self.targets.resource_mut(key) {
            target.position = particle.position;
            self.container.add(key);
        }
    }

    fn on_particle_update(&mut self, particle: &mut Particle) {
        let Some(key) = self.live_key(particle) else {
            return;
        };
        if particle.wants_own_material() {
            self.lease_material(key);
        }
        let Some(target) = self.targets.resource_mut(key) else {
            return;
        };

        target.position = particle.position;
        self.policy.scale(particle, target);

        let material = match target.material {
            MaterialBinding::Shared(id) => self.library.material_mut(id),
            MaterialBinding::Instance(instance) => self.materials.resource_mut(instance),
        };
        let Some(material) = material else {
            return;
        };

        self.policy.rotate(particle, target, material);

        if particle.use_alpha {
            material.opacity = particle.alpha;
            material.transparent = true;
        }
        if particle.use_color {
            material.color = particle.color;
        }
    }

    fn on_particle_dead(&mut self, particle: &mut Particle) {
        let Some(key) = self.live_key(particle) else {
            // A released lease of ours is just forgotten; foreign leases are kept
            if self.owns(particle) {
                particle.target = None;
            }
            return;
        };
        particle.target = None;

        if let Some(target) = self.targets.resource_mut(key) {
            if let MaterialBinding::Instance(instance) = target.material {
                self.materials.expire(instance);
                target.material = MaterialBinding::Shared(target.base_material);
            }
        }

        self.targets.expire(key);
        self.container.remove(key);
    }
}
