//! Particles bouncing inside and escaping a sphere zone

use crate::foundation::math::Vec3;
use crate::foundation::random::MathRandom;
use crate::particle::Particle;
use crate::zone::{CrossType, SphereZone, Zone};
use approx::assert_relative_eq;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounce_then_escape() {
        let zone = SphereZone::new(Vec3::zeros(), 10.0);
        let mut particle = Particle::at(Vec3::new(10.0, 0.0, 0.0))
            .with_radius(0.0)
            .with_velocity(Vec3::new(1.0, 0.0, 0.0));

        zone.bound(&mut particle);
        let outward = particle.position.normalize();
        assert!(particle.velocity.dot(&outward) <= 0.0);
        assert_relative_eq!(particle.velocity, Vec3::new(-1.0, 0.0, 0.0));
        assert!(!particle.dead);

        particle.position = Vec3::new(11.0, 0.0, 0.0);
        zone.contain(&mut particle);
        assert!(particle.dead);
    }

    #[test]
    fn test_bounded_particles_never_leave() {
        let mut zone = SphereZone::new(Vec3::new(0.0, 5.0, 0.0), 10.0).with_cross_type(CrossType::Bound);
        let mut rng = MathRandom::seeded(2024);
        let dt = 0.05;
        let max_speed: f32 = 20.0;

        // Radial motion keeps every bounce on a line through the center
        let mut particles: Vec<Particle> = (0..32)
            .map(|_| {
                let position = zone.get_position(&mut rng);
                let direction = (position - zone.center)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vec3::x);
                let speed = rng.random_a_to_b(1.0, f64::from(max_speed), false) as f32;
                Particle::at(position).with_radius(0.0).with_velocity(direction * speed)
            })
            .collect();

        for _ in 0..400 {
            for particle in &mut particles {
                zone.crossing(particle);
                particle.position += particle.velocity * dt;
            }
        }

        // At most one step past the wall before being turned around
        for particle in &particles {
            let distance = (particle.position - zone.center).magnitude();
            assert!(distance <= zone.radius + max_speed * dt + 1e-3);
            assert!(!particle.dead);
        }
    }

    #[test]
    fn test_containment_culls_escapees() {
        let mut zone = SphereZone::new(Vec3::zeros(), 5.0);
        let mut rng = MathRandom::seeded(8);

        let mut particles: Vec<Particle> = (0..16)
            .map(|i| {
                let direction = if i % 2 == 0 { 1.0 } else { 0.0 };
                Particle::at(zone.get_position(&mut rng))
                    .with_radius(0.5)
                    .with_velocity(Vec3::new(direction, 0.0, 0.0))
            })
            .collect();

        for _ in 0..20 {
            for particle in particles.iter_mut().filter(|p| !p.dead) {
                particle.position += particle.velocity;
                zone.crossing(particle);
            }
        }

        for (i, particle) in particles.iter().enumerate() {
            assert_eq!(particle.dead, i % 2 == 0, "particle {i}");
        }
    }
}
