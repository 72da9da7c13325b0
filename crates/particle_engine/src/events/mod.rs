//! Particle lifecycle event dispatch
//!
//! Key principles:
//! - Topics are plain strings; particle topics are scoped by renderer id
//!   (`"<id>_created"`, `"<id>_updated"`, `"<id>_dead"`) so several renderers
//!   can observe one particle stream without cross-talk
//! - Delivery is immediate and synchronous, in subscription order
//! - Publishing to a topic nobody listens to is a silent no-op
//! - Removing a listener that is not registered is a no-op

use std::collections::HashMap;
use std::fmt;

use crate::particle::Particle;

/// Topic published once per tick before any particle events
pub const SYSTEM_UPDATE: &str = "system_update";

/// Particle lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleEventKind {
    /// Particle entered the simulation
    Created,
    /// Particle advanced one tick
    Updated,
    /// Particle was retired
    Dead,
}

impl ParticleEventKind {
    /// All lifecycle kinds, in lifecycle order
    pub const ALL: [Self; 3] = [Self::Created, Self::Updated, Self::Dead];

    /// Topic suffix for this kind
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Dead => "dead",
        }
    }
}

impl fmt::Display for ParticleEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic for `kind` events addressed to the renderer `renderer_id`
pub fn particle_topic(renderer_id: impl fmt::Display, kind: ParticleEventKind) -> String {
    format!("{renderer_id}_{kind}")
}

/// Per-tick information delivered with [`SYSTEM_UPDATE`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemTick {
    /// Monotonic tick counter
    pub tick: u64,
    /// Seconds since the previous tick
    pub delta: f32,
}

/// Data handed to listeners
#[derive(Debug)]
pub enum EventPayload<'a> {
    /// System-wide tick
    System(&'a SystemTick),
    /// A particle transition; listeners may update render assignment fields
    Particle(&'a mut Particle),
}

/// Handle returned by [`EventDispatcher::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&mut EventPayload<'_>)>;

/// Topic to listener table
#[derive(Default)]
pub struct EventDispatcher {
    topics: HashMap<String, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl EventDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `topic`; it runs after earlier listeners
    pub fn subscribe<F>(&mut self, topic: impl Into<String>, listener: F) -> ListenerId
    where
        F: FnMut(&mut EventPayload<'_>) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        self.topics
            .entry(topic.into())
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a listener, returning whether it was registered on `topic`
    pub fn unsubscribe(&mut self, topic: &str, id: ListenerId) -> bool {
        let Some(listeners) = self.topics.get_mut(topic) else {
            return false;
        };
        let Some(index) = listeners.iter().position(|(listener_id, _)| *listener_id == id) else {
            return false;
        };

        drop(listeners.remove(index));
        if listeners.is_empty() {
            self.topics.remove(topic);
        }
        true
    }

    /// Deliver `payload` to every listener of `topic`, returning how many ran
    pub fn publish(&mut self, topic: &str, payload: &mut EventPayload<'_>) -> usize {
        let Some(listeners) = self.topics.get_mut(topic) else {
            return 0;
        };

        for (_, listener) in listeners.iter_mut() {
            listener(&mut *payload);
        }
        listeners.len()
    }

    /// Publish the per-tick system update
    pub fn dispatch_system_update(&mut self, tick: &SystemTick) -> usize {
        self.publish(SYSTEM_UPDATE, &mut EventPayload::System(tick))
    }

    /// Publish a lifecycle transition for `particle` to one renderer
    pub fn dispatch_particle(
        &mut self,
        renderer_id: impl fmt::Display,
        kind: ParticleEventKind,
        particle: &mut Particle,
    ) -> usize {
        let topic = particle_topic(renderer_id, kind);
        self.publish(&topic, &mut EventPayload::Particle(particle))
    }

    /// Whether anything listens on `topic`
    pub fn has_listeners(&self, topic: &str) -> bool {
        self.listener_count(topic) > 0
    }

    /// Number of listeners on `topic`
    pub fn listener_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    /// Drop every listener on every topic
    pub fn clear(&mut self) {
        self.topics.clear();
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut topics: Vec<(&str, usize)> = self
            .topics
            .iter()
            .map(|(topic, listeners)| (topic.as_str(), listeners.len()))
            .collect();
        topics.sort_unstable();

        f.debug_struct("EventDispatcher")
            .field("topics", &topics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnMut(&mut EventPayload<'_>)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |name: &'static str| {
            let sink = sink.clone();
            Box::new(move |_: &mut EventPayload<'_>| sink.borrow_mut().push(name))
                as Box<dyn FnMut(&mut EventPayload<'_>)>
        };
        (log, make)
    }

    #[test]
    fn test_topic_names() {
        assert_eq!(particle_topic(3, ParticleEventKind::Created), "3_created");
        assert_eq!(particle_topic(3, ParticleEventKind::Updated), "3_updated");
        assert_eq!(particle_topic(3, ParticleEventKind::Dead), "3_dead");
    }

    #[test]
    fn test_listeners_run_in_subscription_order() {
        let (log, make) = recorder();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(SYSTEM_UPDATE, make("first"));
        dispatcher.subscribe(SYSTEM_UPDATE, make("second"));
        dispatcher.subscribe(SYSTEM_UPDATE, make("third"));

        let ran = dispatcher.dispatch_system_update(&SystemTick::default());

        assert_eq!(ran, 3);
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_publish_without_listeners_is_noop() {
        let mut dispatcher = EventDispatcher::new();
        let mut particle = Particle::default();

        assert_eq!(dispatcher.dispatch_particle(1, ParticleEventKind::Created, &mut particle), 0);
        assert!(!dispatcher.has_listeners("1_created"));
    }

    #[test]
    fn test_unsubscribe_unknown_is_noop() {
        let (log, make) = recorder();
        let mut dispatcher = EventDispatcher::new();
        let id = dispatcher.subscribe("a", make("a"));

        assert!(!dispatcher.unsubscribe("b", id));
        assert!(dispatcher.unsubscribe("a", id));
        assert!(!dispatcher.unsubscribe("a", id));

        dispatcher.publish("a", &mut EventPayload::System(&SystemTick::default()));
        assert!(log.borrow().is_empty());
        assert_eq!(dispatcher.listener_count("a"), 0);
    }

    #[test]
    fn test_unsubscribe_releases_listener_state() {
        let state = Rc::new(());
        let mut dispatcher = EventDispatcher::new();
        let captured = Rc::clone(&state);
        let id = dispatcher.subscribe("a", move |_: &mut EventPayload<'_>| {
            let _ = &captured;
        });
        assert_eq!(Rc::strong_count(&state), 2);

        assert!(dispatcher.unsubscribe("a", id));
        assert_eq!(Rc::strong_count(&state), 1);
    }

    #[test]
    fn test_renderer_scopes_do_not_cross_talk() {
        let (log, make) = recorder();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(particle_topic(1, ParticleEventKind::Created), make("one"));
        dispatcher.subscribe(particle_topic(2, ParticleEventKind::Created), make("two"));

        let mut particle = Particle::default();
        dispatcher.dispatch_particle(2, ParticleEventKind::Created, &mut particle);

        assert_eq!(*log.borrow(), vec!["two"]);
    }

    #[test]
    fn test_listener_can_mutate_particle() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(particle_topic(0, ParticleEventKind::Dead), |payload: &mut EventPayload<'_>| {
            if let EventPayload::Particle(particle) = payload {
                particle.dead = true;
            }
        });

        let mut particle = Particle::default();
        dispatcher.dispatch_particle(0, ParticleEventKind::Dead, &mut particle);
        assert!(particle.dead);
    }

    #[test]
    fn test_clear_removes_everything() {
        let (_, make) = recorder();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe("a", make("a"));
        dispatcher.subscribe("b", make("b"));

        dispatcher.clear();
        assert!(!dispatcher.has_listeners("a"));
        assert!(!dispatcher.has_listeners("b"));
    }
}
