//! Particle lifecycle gate.
//!
//! Particles move through a small state machine:
//!
//! | State | Meaning |
//! |-------|---------|
//! | Spawned / Held | on the sphere, `age <= stuck_time` |
//! | Drifting | moving, `age > stuck_time` |
//! | Recycled | returned to the pool (terminal) |
//!
//! The gate owns the only path to *Recycled*: a particle is recycled once its
//! projection leaves the viewport or it comes closer to the eye than
//! `z_max`. Envelope expiry does not recycle. A fully faded particle that
//! stays in view keeps being simulated at its final alpha.

use crate::particle::Particle;

/// Why a particle left the live set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecycleReason {
    /// Projected outside `[0, width] x [0, height]`.
    OutOfBounds,
    /// Rotated depth beyond the near cutoff.
    TooNear,
}

/// Bounds and depth test applied after projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifecycleGate {
    /// Near cutoff; particles with `rotated_z > z_max` are recycled.
    pub z_max: f32,
    width: f32,
    height: f32,
}

impl LifecycleGate {
    pub fn new(z_max: f32) -> Self {
        Self {
            z_max,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
    }

    /// Decide whether a freshly projected particle should be recycled.
    pub fn check(&self, particle: &Particle) -> Option<RecycleReason> {
        let p = particle.projected;
        // Written so NaN coordinates also fail the test.
        let in_bounds = p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height;

        if !in_bounds {
            Some(RecycleReason::OutOfBounds)
        } else if particle.rotated_z > self.z_max {
            Some(RecycleReason::TooNear)
        } else {
            None
        }
    }
}

impl Default for LifecycleGate {
    fn default() -> Self {
        Self::new(318.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn projected(x: f32, y: f32, z: f32) -> Particle {
        Particle {
            projected: Vec2::new(x, y),
            rotated_z: z,
            ..Particle::default()
        }
    }

    fn gate() -> LifecycleGate {
        let mut gate = LifecycleGate::new(318.0);
        gate.set_viewport(400, 300);
        gate
    }

    #[test]
    fn test_inside_survives() {
        let gate = gate();
        assert_eq!(gate.check(&projected(200.0, 150.0, 0.0)), None);
        // Edges are inclusive
        assert_eq!(gate.check(&projected(0.0, 0.0, 0.0)), None);
        assert_eq!(gate.check(&projected(400.0, 300.0, 318.0)), None);
    }

    #[test]
    fn test_out_of_bounds() {
        let gate = gate();
        for (x, y) in [(-0.1, 10.0), (400.1, 10.0), (10.0, -0.1), (10.0, 300.1)] {
            assert_eq!(gate.check(&projected(x, y, 0.0)), Some(RecycleReason::OutOfBounds));
        }
    }

    #[test]
    fn test_too_near() {
        let gate = gate();
        assert_eq!(gate.check(&projected(10.0, 10.0, 318.5)), Some(RecycleReason::TooNear));
    }

    #[test]
    fn test_expired_envelope_is_not_recycled() {
        let gate = gate();
        let mut p = projected(100.0, 100.0, -10.0);
        p.dead = true;
        p.alpha = 0.0;
        assert_eq!(gate.check(&p), None);
    }

    #[test]
    fn test_nan_is_recycled() {
        let gate = gate();
        assert!(gate.check(&projected(f32::NAN, 10.0, 0.0)).is_some());
    }

    #[test]
    fn test_zero_viewport_recycles_everything_off_origin() {
        let gate = LifecycleGate::new(318.0);
        assert!(gate.check(&projected(1.0, 1.0, 0.0)).is_some());
    }
}
