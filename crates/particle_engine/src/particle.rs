//! Particle record shared between the simulation and the renderers
//!
//! The simulation owns particles and advances them each tick. Renderers only
//! assign `body` and `target`; zones only touch `velocity` and `dead`.

use crate::foundation::math::Vec3;
use crate::render::{BodyId, TargetLease};
use crate::scene::Color;

/// A single simulated particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// World position
    pub position: Vec3,
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Euler rotation in radians
    pub rotation: Vec3,
    /// Uniform scale
    pub scale: f32,
    /// Bounding sphere radius
    pub radius: f32,
    /// Tint applied when `use_color` is set
    pub color: Color,
    /// Opacity applied when `use_alpha` is set
    pub alpha: f32,
    /// Set once the particle is retired
    pub dead: bool,
    /// Request a per-instance material driven by `alpha`
    pub use_alpha: bool,
    /// Request a per-instance material driven by `color`
    pub use_color: bool,
    /// Prototype body; renderers fill in their default when unset
    pub body: Option<BodyId>,
    /// Render target leased by a renderer
    pub target: Option<TargetLease>,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            velocity: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: 1.0,
            radius: 10.0,
            color: Color::WHITE,
            alpha: 1.0,
            dead: false,
            use_alpha: false,
            use_color: false,
            body: None,
            target: None,
        }
    }
}

impl Particle {
    /// Particle at `position` with default appearance
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Builder: set velocity
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: set bounding radius
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Builder: use a specific prototype body
    #[must_use]
    pub fn with_body(mut self, body: BodyId) -> Self {
        self.body = Some(body);
        self
    }

    /// Builder: toggle per-instance material customization
    #[must_use]
    pub fn with_individual_material(mut self, use_alpha: bool, use_color: bool) -> Self {
        self.use_alpha = use_alpha;
        self.use_color = use_color;
        self
    }

    /// Whether a per-instance material is requested
    pub fn wants_own_material(&self) -> bool {
        self.use_alpha || self.use_color
    }

    /// Reset simulation state so the record can be reused for a new particle
    ///
    /// Body and target are left alone; the renderer releases the target on
    /// the dead event.
    pub fn reset(&mut self) {
        let body = self.body;
        let target = self.target;
        *self = Self {
            body,
            target,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_particle() {
        let particle = Particle::default();

        assert_eq!(particle.scale, 1.0);
        assert_eq!(particle.alpha, 1.0);
        assert!(!particle.dead);
        assert!(!particle.wants_own_material());
        assert!(particle.target.is_none());
    }

    #[test]
    fn test_reset_keeps_render_assignment_fields() {
        let mut particle = Particle::at(Vec3::new(1.0, 2.0, 3.0)).with_radius(4.0);
        particle.dead = true;
        particle.reset();

        assert_eq!(particle.position, Vec3::zeros());
        assert_eq!(particle.radius, 10.0);
        assert!(!particle.dead);
    }
}
