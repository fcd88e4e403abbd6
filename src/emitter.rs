//! Sphere-surface emitter.
//!
//! Every emission tick the emitter activates a fixed number of particles on
//! the surface of the orb's sphere. Positions are uniform over the surface
//! area:
//!
//! - `theta` is uniform in `[0, 2π)`
//! - `phi = acos(u)` with `u` uniform in `[-1, 1]`
//!
//! Drawing `phi` uniformly in `[0, π]` instead would bunch particles at the
//! poles.
//!
//! # Example
//!
//! ```ignore
//! let emitter = SphereEmitter::new(100.0).with_count(8);
//! emitter.emit(tick, &mut rng, &mut pool);
//! ```

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use crate::envelope::Envelope;
use crate::particle::Particle;
use crate::pool::ParticlePool;

/// Spawns particles on a sphere of fixed radius centered at the origin.
#[derive(Clone, Debug)]
pub struct SphereEmitter {
    /// Sphere radius in world units.
    pub radius: f32,
    /// Particles spawned per emission.
    pub count: u32,
    /// Ticks between emissions (1 = every tick).
    pub interval: u32,
    /// Minimum dwell time on the sphere, in ticks.
    pub stuck_time_base: u32,
    /// Extra dwell time drawn uniformly from `[0, stuck_time_jitter)`.
    pub stuck_time_jitter: u32,
    /// Constant per-tick acceleration given to every particle.
    pub gravity: Vec3,
    /// Opacity envelope given to every particle.
    pub envelope: Envelope,
}

impl SphereEmitter {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            count: 8,
            interval: 1,
            stuck_time_base: 90,
            stuck_time_jitter: 20,
            gravity: Vec3::ZERO,
            envelope: Envelope::default(),
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval.max(1);
        self
    }

    pub fn with_stuck_time(mut self, base: u32, jitter: u32) -> Self {
        self.stuck_time_base = base;
        self.stuck_time_jitter = jitter;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Whether this tick is an emission tick.
    #[inline]
    pub fn fires_on(&self, tick: u64) -> bool {
        tick % u64::from(self.interval.max(1)) == 0
    }

    /// Emit this tick's particles into `pool`. Returns how many were spawned.
    pub fn emit<R: Rng + ?Sized>(&self, tick: u64, rng: &mut R, pool: &mut ParticlePool) -> u32 {
        if !self.fires_on(tick) {
            return 0;
        }

        for _ in 0..self.count {
            let position = sample_sphere_surface(rng, self.radius);
            let stuck_time = self
                .stuck_time_base
                .saturating_add(random_below(rng, self.stuck_time_jitter));
            pool.acquire(Particle::spawned(position, self.gravity, stuck_time, self.envelope));
        }
        self.count
    }
}

impl Default for SphereEmitter {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Uniformly distributed point on the surface of a sphere of `radius`.
pub fn sample_sphere_surface<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = rng.gen_range(0.0..TAU);
    let phi = rng.gen_range(-1.0f32..=1.0).acos();

    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

#[inline]
fn random_below<R: Rng + ?Sized>(rng: &mut R, bound: u32) -> u32 {
    if bound == 0 {
        0
    } else {
        rng.gen_range(0..bound)
    }
}
