//! Spherical zone

use crate::config::ZoneConfig;
use crate::foundation::math::{constants, Vec3};
use crate::foundation::random::MathRandom;
use crate::particle::Particle;
use crate::zone::{CrossType, Zone, ZoneCapabilities, ZoneKind};

/// Ball of `radius` around `center`
///
/// Sampling draws the radius and both spherical angles uniformly, which is
/// not uniform over the volume: points cluster toward the center compared
/// to a `radius * cbrt(U)` scheme. Emitters rely on this look, so it is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereZone {
    /// Center of the sphere
    pub center: Vec3,
    /// Sphere radius
    pub radius: f32,
    cross_type: CrossType,
    vector: Vec3,
}

impl SphereZone {
    /// Create a sphere zone
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            cross_type: CrossType::default(),
            vector: Vec3::zeros(),
        }
    }

    /// Sphere at `center` with the configured default radius
    pub fn from_config(center: Vec3, config: &ZoneConfig) -> Self {
        Self::new(center, config.default_sphere_radius)
    }

    /// Builder: select the [`Zone::crossing`] behaviour
    #[must_use]
    pub fn with_cross_type(mut self, cross_type: CrossType) -> Self {
        self.cross_type = cross_type;
        self
    }

    /// Last sampled position
    pub fn last_position(&self) -> Vec3 {
        self.vector
    }
}

impl Default for SphereZone {
    fn default() -> Self {
        Self::from_config(Vec3::zeros(), &ZoneConfig::default())
    }
}

impl Zone for SphereZone {
    fn kind(&self) -> ZoneKind {
        ZoneKind::Sphere
    }

    fn capabilities(&self) -> ZoneCapabilities {
        ZoneCapabilities::SAMPLING | ZoneCapabilities::CONTAINMENT | ZoneCapabilities::BOUNDARY
    }

    fn cross_type(&self) -> CrossType {
        self.cross_type
    }

    fn get_position(&mut self, rng: &mut MathRandom) -> Vec3 {
        let r = rng.random_f32() * self.radius;
        let tha = constants::PI * rng.random_f32();
        let phi = constants::TAU * rng.random_f32();

        self.vector = self.center
            + Vec3::new(
                r * tha.sin() * phi.cos(),
                r * phi.sin() * tha.sin(),
                r * tha.cos(),
            );
        self.vector
    }

    fn contain(&self, particle: &mut Particle) {
        let distance = (particle.position - self.center).magnitude();

        if distance - particle.radius > self.radius {
            particle.dead = true;
        }
    }

    fn bound(&self, particle: &mut Particle) {
        let offset = particle.position - self.center;

        if offset.magnitude() + particle.radius >= self.radius {
            // A particle sitting on the center has no outward direction
            let Some(normal) = offset.try_normalize(f32::EPSILON) else {
                return;
            };
            let k = 2.0 * particle.velocity.dot(&normal);
            particle.velocity -= normal * k;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_samples_stay_inside() {
        let mut zone = SphereZone::new(Vec3::new(5.0, -3.0, 2.0), 10.0);
        let mut rng = MathRandom::seeded(17);

        for _ in 0..1000 {
            let p = zone.get_position(&mut rng);
            assert!((p - zone.center).magnitude() <= zone.radius + EPSILON);
            assert_eq!(zone.last_position(), p);
        }
    }

    #[test]
    fn test_sampling_is_deterministic_for_seed() {
        let mut zone = SphereZone::new(Vec3::zeros(), 3.0);
        let mut first = MathRandom::seeded(99);
        let mut second = MathRandom::seeded(99);

        let a: Vec<Vec3> = (0..16).map(|_| zone.get_position(&mut first)).collect();
        let b: Vec<Vec3> = (0..16).map(|_| zone.get_position(&mut second)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sampling_follows_spherical_formula() {
        let mut zone = SphereZone::new(Vec3::new(1.0, 1.0, 1.0), 4.0);
        let mut rng = MathRandom::seeded(1);
        let mut replay = MathRandom::seeded(1);

        let p = zone.get_position(&mut rng);

        let r = replay.random_f32() * 4.0;
        let tha = constants::PI * replay.random_f32();
        let phi = constants::TAU * replay.random_f32();
        let expected = Vec3::new(
            1.0 + r * tha.sin() * phi.cos(),
            1.0 + r * phi.sin() * tha.sin(),
            1.0 + r * tha.cos(),
        );
        assert_relative_eq!(p, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_containment() {
        let zone = SphereZone::new(Vec3::zeros(), 10.0);

        let mut inside = Particle::at(Vec3::new(9.0, 0.0, 0.0)).with_radius(0.0);
        zone.contain(&mut inside);
        assert!(!inside.dead);

        // Partly outside but its bounding sphere still overlaps the zone
        let mut straddling = Particle::at(Vec3::new(11.0, 0.0, 0.0)).with_radius(2.0);
        zone.contain(&mut straddling);
        assert!(!straddling.dead);

        let mut outside = Particle::at(Vec3::new(0.0, 12.5, 0.0)).with_radius(2.0);
        zone.contain(&mut outside);
        assert!(outside.dead);
    }

    #[test]
    fn test_reflection_at_boundary() {
        let zone = SphereZone::new(Vec3::new(1.0, 2.0, 3.0), 5.0);
        let direction = Vec3::new(1.0, 1.0, 0.5).normalize();
        let velocity = Vec3::new(3.0, -1.0, 2.0);
        let mut particle = Particle::at(zone.center + direction * 5.0)
            .with_radius(0.0)
            .with_velocity(velocity);

        zone.bound(&mut particle);

        let n = (particle.position - zone.center).normalize();
        assert_relative_eq!(particle.velocity.dot(&n), -velocity.dot(&n), epsilon = EPSILON);
        assert_relative_eq!(particle.velocity.magnitude(), velocity.magnitude(), epsilon = EPSILON);

        // Tangential component is preserved
        let tangent_before = velocity - n * velocity.dot(&n);
        let tangent_after = particle.velocity - n * particle.velocity.dot(&n);
        assert_relative_eq!(tangent_after, tangent_before, epsilon = EPSILON);
    }

    #[test]
    fn test_no_reflection_inside() {
        let zone = SphereZone::new(Vec3::zeros(), 10.0);
        let mut particle = Particle::at(Vec3::new(2.0, 0.0, 0.0))
            .with_radius(1.0)
            .with_velocity(Vec3::new(1.0, 0.0, 0.0));

        zone.bound(&mut particle);
        assert_eq!(particle.velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_bound_at_center_is_left_alone() {
        let zone = SphereZone::new(Vec3::zeros(), 1.0);
        let mut particle = Particle::at(Vec3::zeros())
            .with_radius(2.0)
            .with_velocity(Vec3::new(0.0, 1.0, 0.0));

        zone.bound(&mut particle);
        assert_eq!(particle.velocity, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_cross_unsupported_is_noop() {
        let zone = SphereZone::new(Vec3::zeros(), 1.0).with_cross_type(CrossType::Cross);
        let mut particle = Particle::at(Vec3::new(5.0, 0.0, 0.0)).with_velocity(Vec3::new(1.0, 0.0, 0.0));
        let before = particle.clone();

        assert!(!zone.supports_crossing());
        zone.crossing(&mut particle);
        assert_eq!(particle, before);
    }

    #[test]
    fn test_crossing_dispatch() {
        let mut particle = Particle::at(Vec3::new(20.0, 0.0, 0.0))
            .with_radius(0.0)
            .with_velocity(Vec3::new(1.0, 0.0, 0.0));

        let bounding = SphereZone::new(Vec3::zeros(), 10.0).with_cross_type(CrossType::Bound);
        bounding.crossing(&mut particle);
        assert!(!particle.dead);
        assert_relative_eq!(particle.velocity, Vec3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);

        let killing = SphereZone::new(Vec3::zeros(), 10.0);
        killing.crossing(&mut particle);
        assert!(particle.dead);
    }
}
