//! The particle record shared by every stage of the tick pipeline.

use glam::{Vec2, Vec3};

use crate::envelope::Envelope;

/// Coarse lifecycle phase of an active particle.
///
/// Envelope progression (attack, hold, decay, expired) is tracked separately
/// and never changes the phase by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Still parked on the sphere surface (`age <= stuck_time`).
    Held,
    /// Moving under drift and jitter (`age > stuck_time`).
    Drifting,
}

/// A single orb particle.
///
/// Records live inside a [`ParticlePool`](crate::pool::ParticlePool) and are
/// reused indefinitely; a recycled record is reset to [`Particle::default`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World-space position.
    pub position: Vec3,
    /// World-space velocity, in units per tick.
    pub velocity: Vec3,
    /// Constant per-tick velocity change (gravity).
    pub acceleration: Vec3,
    /// Ticks since spawn.
    pub age: u32,
    /// The particle stays put while `age <= stuck_time`.
    pub stuck_time: u32,
    /// Opacity profile over age.
    pub envelope: Envelope,

    // Per-tick derived values
    /// Screen position in local viewport pixels.
    pub projected: Vec2,
    /// Depth after camera rotation (positive is towards the viewer).
    pub rotated_z: f32,
    /// Perspective radius multiplier.
    pub scale: f32,
    /// Envelope opacity for the current age.
    pub alpha: f32,
    /// Set once the envelope has fully elapsed. Informational only.
    pub dead: bool,
}

impl Particle {
    /// Create a freshly spawned particle at rest.
    pub fn spawned(position: Vec3, acceleration: Vec3, stuck_time: u32, envelope: Envelope) -> Self {
        Self {
            position,
            acceleration,
            stuck_time,
            envelope,
            ..Self::default()
        }
    }

    /// Current lifecycle phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        if self.age > self.stuck_time {
            Phase::Drifting
        } else {
            Phase::Held
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            age: 0,
            stuck_time: 0,
            envelope: Envelope::default(),
            projected: Vec2::ZERO,
            rotated_z: 0.0,
            scale: 0.0,
            alpha: 0.0,
            dead: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_follows_stuck_time() {
        let mut p = Particle::spawned(Vec3::X, Vec3::ZERO, 3, Envelope::default());
        assert_eq!(p.phase(), Phase::Held);

        p.age = 3;
        assert_eq!(p.phase(), Phase::Held);

        p.age = 4;
        assert_eq!(p.phase(), Phase::Drifting);
    }

    #[test]
    fn test_spawned_is_at_rest() {
        let p = Particle::spawned(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, 90, Envelope::default());
        assert_eq!(p.velocity, Vec3::ZERO);
        assert_eq!(p.age, 0);
        assert!(!p.dead);
    }
}
