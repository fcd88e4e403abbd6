//! Scene state and the per-tick simulation pipeline.
//!
//! One call to [`Scene::step`] runs, in order:
//!
//! 1. **Emit** - the sphere emitter activates this tick's particles
//! 2. **Rotate** - the camera advances one turn step
//! 3. **Integrate** - every live particle ages and (if released) moves
//! 4. **Project** - rotated position to viewport pixels and scale
//! 5. **Envelope** - alpha for the new age
//! 6. **Gate** - out-of-view or too-near particles go back to the pool
//!
//! Drawing is left to the caller, which sees exactly the survivors.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::camera::{Camera, Projector};
use crate::config::EngineConfig;
use crate::emitter::SphereEmitter;
use crate::integrator::Integrator;
use crate::lifecycle::{LifecycleGate, RecycleReason};
use crate::particle::Particle;
use crate::pool::{ParticleHandle, ParticlePool};

/// What happened during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub spawned: u32,
    pub out_of_bounds: u32,
    pub too_near: u32,
    /// Live particles whose envelope has fully elapsed.
    pub expired: u32,
}

impl StepReport {
    #[inline]
    pub fn recycled(&self) -> u32 {
        self.out_of_bounds + self.too_near
    }
}

/// All simulation state owned by one engine.
#[derive(Debug)]
pub struct Scene {
    pool: ParticlePool,
    emitter: SphereEmitter,
    integrator: Integrator,
    camera: Camera,
    projector: Projector,
    gate: LifecycleGate,
    rng: SmallRng,
    tick: u64,
    viewport: (u32, u32),
}

impl Scene {
    pub fn new(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut scene = Self {
            pool: ParticlePool::with_capacity(1024),
            emitter: SphereEmitter::default(),
            integrator: Integrator::default(),
            camera: Camera::default(),
            projector: Projector::default(),
            gate: LifecycleGate::default(),
            rng,
            tick: 0,
            viewport: (0, 0),
        };
        scene.reconfigure(config);
        scene
    }

    /// Apply new options without disturbing live particles or the camera
    /// angle. Particles already alive keep the envelope and stuck time they
    /// were spawned with.
    pub fn reconfigure(&mut self, config: &EngineConfig) {
        self.emitter = SphereEmitter::new(config.sphere_radius)
            .with_count(config.emission_count)
            .with_interval(config.emission_interval)
            .with_stuck_time(config.stuck_time_base, config.stuck_time_jitter)
            .with_gravity(config.gravity_vector())
            .with_envelope(config.envelope);
        self.integrator = Integrator::new(config.jitter);
        self.camera.turn_speed = config.turn_speed;
        self.projector.focal_length = config.focal_length;
        self.projector.radius_factor = config.radius_factor;
        self.gate.z_max = config.z_max;
    }

    /// Recompute viewport-dependent projection constants.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.projector.set_viewport(width, height);
        self.gate.set_viewport(width, height);
    }

    #[inline]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Steps run so far.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Live particles, all of which passed the gate on the last step.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.pool.iter_active()
    }

    /// Drop every particle record.
    pub fn clear(&mut self) {
        self.pool.clear();
    }

    /// Activate a particle outside the emitter.
    #[cfg(test)]
    pub(crate) fn inject(&mut self, particle: Particle) -> ParticleHandle {
        self.pool.acquire(particle)
    }

    /// Run one simulation step.
    pub fn step(&mut self) -> StepReport {
        let mut report = StepReport {
            spawned: self.emitter.emit(self.tick, &mut self.rng, &mut self.pool),
            ..StepReport::default()
        };

        self.camera.advance();

        let mut i = 0;
        while let Some(handle) = self.pool.active_at(i) {
            match self.update_particle(handle, &mut report) {
                Some(reason) => {
                    match reason {
                        RecycleReason::OutOfBounds => report.out_of_bounds += 1,
                        RecycleReason::TooNear => report.too_near += 1,
                    }
                    // Swap-remove pulls an unvisited handle into slot `i`.
                    self.pool.release(handle);
                }
                None => i += 1,
            }
        }

        self.tick += 1;
        report
    }

    fn update_particle(&mut self, handle: ParticleHandle, report: &mut StepReport) -> Option<RecycleReason> {
        let particle = self.pool.get_mut(handle)?;

        self.integrator.step(particle, &mut self.rng);

        let projection = self.projector.project(self.camera.rotate(particle.position));
        particle.projected = projection.screen;
        particle.rotated_z = projection.rotated_z;
        particle.scale = projection.scale;

        let sample = particle.envelope.sample(particle.age);
        particle.alpha = sample.alpha;
        particle.dead = sample.expired;
        if sample.expired {
            report.expired += 1;
        }

        self.gate.check(particle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use glam::Vec3;

    fn scene(seed: u64) -> Scene {
        let mut scene = Scene::new(&EngineConfig::default().with_seed(seed));
        scene.set_viewport(400, 400);
        scene
    }

    #[test]
    fn test_first_step_spawns_and_keeps_particles() {
        let mut scene = scene(1);
        let report = scene.step();

        assert_eq!(report.spawned, 8);
        assert_eq!(report.recycled(), 0);
        assert_eq!(scene.pool().active_len(), 8);
        assert_eq!(scene.tick(), 1);

        for p in scene.particles() {
            assert_eq!(p.age, 1);
            assert!(p.projected.is_finite());
            assert!(p.scale > 0.0);
        }
    }

    #[test]
    fn test_pool_stays_partitioned() {
        let mut scene = scene(2);
        for _ in 0..600 {
            scene.step();
            assert!(scene.pool().is_partitioned());
        }
        assert!(scene.pool().free_len() > 0);
    }

    #[test]
    fn test_out_of_view_particle_is_recycled_and_reset() {
        let mut scene = Scene::new(&EngineConfig::default().with_seed(3).with_emission_count(0));
        scene.set_viewport(400, 400);

        let inside = scene.inject(Particle::spawned(Vec3::ZERO, Vec3::ZERO, 1000, Envelope::default()));
        let outside = scene.inject(Particle::spawned(
            Vec3::new(1000.0, 0.0, 0.0),
            Vec3::ZERO,
            1000,
            Envelope::default(),
        ));

        let report = scene.step();
        assert_eq!(report.out_of_bounds, 1);
        assert!(scene.pool().is_active(inside));
        assert!(scene.pool().is_free(outside));
        assert!(!scene.pool().active_handles().contains(&outside));
        assert_eq!(scene.pool().get(outside), Some(&Particle::default()));
        assert!(scene.pool().is_partitioned());
    }

    #[test]
    fn test_too_near_particle_is_recycled() {
        let mut scene = Scene::new(
            &EngineConfig::default()
                .with_seed(4)
                .with_emission_count(0)
                .with_turn_speed(0.0),
        );
        scene.set_viewport(400, 400);

        let near = scene.inject(Particle::spawned(Vec3::new(0.0, 0.0, 319.0), Vec3::ZERO, 1000, Envelope::default()));
        let report = scene.step();
        assert_eq!(report.too_near, 1);
        assert!(scene.pool().is_free(near));
    }

    #[test]
    fn test_expired_particle_stays_alive() {
        let mut scene = Scene::new(
            &EngineConfig::default()
                .with_seed(5)
                .with_emission_count(0)
                .with_jitter(Vec3::ZERO),
        );
        scene.set_viewport(400, 400);

        let h = scene.inject(Particle::spawned(Vec3::ZERO, Vec3::ZERO, 0, Envelope::default()));
        let mut report = StepReport::default();
        for _ in 0..250 {
            report = scene.step();
        }

        assert!(scene.pool().is_active(h));
        let p = scene.pool().get(h).copied().unwrap_or_default();
        assert!(p.dead);
        assert_eq!(p.alpha, 0.0);
        assert_eq!(report.expired, 1);
    }

    #[test]
    fn test_seeded_scenes_are_deterministic() {
        let mut a = scene(42);
        let mut b = scene(42);
        for _ in 0..300 {
            assert_eq!(a.step(), b.step());
        }
        let pa: Vec<_> = a.particles().map(|p| p.position).collect();
        let pb: Vec<_> = b.particles().map(|p| p.position).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_reconfigure_keeps_live_particles() {
        let mut scene = scene(6);
        for _ in 0..10 {
            scene.step();
        }
        let live = scene.pool().active_len();

        scene.reconfigure(&EngineConfig::default().with_emission_count(0));
        scene.step();
        assert!(scene.pool().active_len() <= live);
        assert!(scene.pool().active_len() > 0);
    }
}
