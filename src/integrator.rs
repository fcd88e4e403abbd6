//! Per-tick motion update.
//!
//! Ages every particle by one tick. Once a particle is past its stuck time
//! its velocity picks up the constant acceleration plus an independent
//! uniform kick on each axis, and its position advances by the velocity.

use glam::Vec3;
use rand::Rng;

use crate::particle::Particle;

/// Drift-plus-jitter integrator with a fixed unit time step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Integrator {
    /// Per-axis bound of the random velocity kick (`±jitter`).
    pub jitter: Vec3,
}

impl Integrator {
    pub fn new(jitter: Vec3) -> Self {
        Self { jitter: jitter.abs() }
    }

    /// Advance one particle by one tick.
    pub fn step<R: Rng + ?Sized>(&self, particle: &mut Particle, rng: &mut R) {
        particle.age = particle.age.saturating_add(1);
        if particle.age <= particle.stuck_time {
            return;
        }

        let kick = Vec3::new(
            self.jitter.x * rng.gen_range(-1.0f32..=1.0),
            self.jitter.y * rng.gen_range(-1.0f32..=1.0),
            self.jitter.z * rng.gen_range(-1.0f32..=1.0),
        );
        particle.velocity += particle.acceleration + kick;
        particle.position += particle.velocity;
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(Vec3::splat(0.1))
    }
}
