//! Renderer synchronization
//!
//! Renderers mirror the particle simulation into the host scene. They never
//! poll: the simulation publishes lifecycle events on its dispatcher and an
//! attached renderer reacts by leasing, updating and releasing pooled render
//! targets.
//!
//! ```text
//! simulation tick
//!   ├── SYSTEM_UPDATE        -> on_system_update
//!   └── per particle
//!         ├── <id>_created   -> on_particle_created  (lease target + material)
//!         ├── <id>_updated   -> on_particle_update   (copy transform/material)
//!         └── <id>_dead      -> on_particle_dead     (release target + material)
//! ```

pub mod body;
pub mod mesh_renderer;
pub mod policy;
pub mod pool;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::events::{
    particle_topic, EventDispatcher, EventPayload, ListenerId, ParticleEventKind, SystemTick,
    SYSTEM_UPDATE,
};
use crate::particle::Particle;
use crate::scene::TargetKey;

pub use body::{
    Body, BodyDefaults, BodyId, BodyKind, BodyLibrary, BodyTemplate, MaterialBinding, MaterialId,
    MaterialInstanceKey, RenderTarget,
};
pub use mesh_renderer::{MeshRenderer, SpriteRenderer};
pub use policy::{MeshPolicy, SpritePolicy, TransformPolicy};
pub use pool::Pool;

/// Identifier scoping a renderer's particle topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(pub u32);

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A particle's claim on a render target
///
/// Target keys from different renderers overlap, and pooled keys are reused
/// once released, so a lease records both the renderer that issued it and
/// which lease of that key it is. Renderers ignore leases they did not issue
/// or that have since been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetLease {
    /// Renderer owning the target
    pub renderer: RendererId,
    /// Target in that renderer's pool
    pub key: TargetKey,
    /// Lease count of `key` when this lease was issued
    pub generation: u32,
}

/// Renderer variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    /// Renders particles as 3D meshes
    Mesh,
    /// Renders particles as camera-facing sprites
    Sprite,
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mesh => "MeshRenderer",
            Self::Sprite => "SpriteRenderer",
        })
    }
}

/// Reactions to particle lifecycle events
///
/// Implementations are driven through [`attach`]; the hooks are public so a
/// host can also call them directly when it does not use a dispatcher.
pub trait ParticleRenderer {
    /// Id used to scope this renderer's particle topics
    fn id(&self) -> RendererId;

    /// Variant tag
    fn kind(&self) -> RendererKind;

    /// Once per tick, before any particle events of that tick
    fn on_system_update(&mut self, _tick: &SystemTick) {}

    /// A particle entered the simulation
    fn on_particle_created(&mut self, particle: &mut Particle);

    /// A particle advanced one tick
    fn on_particle_update(&mut self, particle: &mut Particle);

    /// A particle was retired; must tolerate repeated calls
    fn on_particle_dead(&mut self, particle: &mut Particle);
}

/// Live subscription of one renderer on one dispatcher
///
/// Only weak references to the renderer are held by the dispatcher, so a
/// dropped renderer silently stops receiving events.
#[must_use = "dropping an Attachment leaves the renderer subscribed; call detach"]
#[derive(Debug)]
pub struct Attachment {
    renderer: RendererId,
    listeners: Vec<(String, ListenerId)>,
}

impl Attachment {
    /// Renderer this attachment belongs to
    pub fn renderer_id(&self) -> RendererId {
        self.renderer
    }

    /// Topics this attachment listens on
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.listeners.iter().map(|(topic, _)| topic.as_str())
    }

    /// Unsubscribe every listener, returning how many were still registered
    pub fn detach(self, dispatcher: &mut EventDispatcher) -> usize {
        let removed = self
            .listeners
            .iter()
            .filter(|(topic, id)| dispatcher.unsubscribe(topic, *id))
            .count();
        log::debug!("Detached renderer {} ({} listeners)", self.renderer, removed);
        removed
    }
}

/// Subscribe `renderer` to the system topic and its own particle topics
pub fn attach<R>(renderer: &Rc<RefCell<R>>, dispatcher: &mut EventDispatcher) -> Attachment
where
    R: ParticleRenderer + 'static,
{
    let (id, kind) = {
        let renderer = renderer.borrow();
        (renderer.id(), renderer.kind())
    };

    let mut listeners = Vec::with_capacity(1 + ParticleEventKind::ALL.len());

    let weak = Rc::downgrade(renderer);
    let system = dispatcher.subscribe(SYSTEM_UPDATE, move |payload: &mut EventPayload<'_>| {
        if let EventPayload::System(tick) = payload {
            with_renderer(&weak, |renderer| renderer.on_system_update(tick));
        }
    });
    listeners.push((SYSTEM_UPDATE.to_string(), system));

    for event in ParticleEventKind::ALL {
        let topic = particle_topic(id, event);
        let weak = Rc::downgrade(renderer);
        let listener = dispatcher.subscribe(topic.clone(), move |payload: &mut EventPayload<'_>| {
            if let EventPayload::Particle(particle) = payload {
                with_renderer(&weak, |renderer| match event {
                    ParticleEventKind::Created => renderer.on_particle_created(particle),
                    ParticleEventKind::Updated => renderer.on_particle_update(particle),
                    ParticleEventKind::Dead => renderer.on_particle_dead(particle),
                });
            }
        });
        listeners.push((topic, listener));
    }

    log::debug!("Attached {} with id {}", kind, id);
    Attachment {
        renderer: id,
        listeners,
    }
}

fn with_renderer<R: ParticleRenderer>(renderer: &Weak<RefCell<R>>, f: impl FnOnce(&mut R)) {
    let Some(renderer) = renderer.upgrade() else {
        return;
    };
    match renderer.try_borrow_mut() {
        Ok(mut renderer) => f(&mut renderer),
        Err(_) => log::warn!("Renderer is already borrowed; dropping re-entrant event"),
    };
}
