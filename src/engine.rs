//! The engine handle.
//!
//! [`Engine`] owns one scene, one drawing surface and the clock that drives
//! them. The surrounding UI talks to it through a deliberately narrow port:
//!
//! - [`Engine::set_highlighted`] - pick the palette entry (read every tick)
//! - [`Engine::set_anchor`] - dock beside a rectangle, or `None` to center
//! - [`Engine::resize`] - the surface changed size
//! - [`Engine::destroy`] - stop for good
//!
//! Everything runs on the caller's thread. A resize is applied between ticks,
//! never in the middle of one.

use std::time::Instant;

use crate::anchor::{AnchorRect, AnchorTween, Presentation};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::render::Renderer;
use crate::scene::Scene;
use crate::surface::Surface;
use crate::time::Clock;

/// Ticks between periodic stats log lines.
const STATS_LOG_INTERVAL: u64 = 600;

/// Snapshot of engine counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Simulation steps run.
    pub tick: u64,
    pub active: usize,
    pub free: usize,
    /// Records ever allocated (`active + free`).
    pub allocated: usize,
    /// Discs submitted on the last rendered tick.
    pub rendered: usize,
}

/// A running particle orb bound to a drawing surface.
pub struct Engine<S: Surface> {
    surface: S,
    config: EngineConfig,
    scene: Scene,
    renderer: Renderer,
    clock: Clock,
    highlighted: bool,
    anchor: AnchorTween,
    running: bool,
    rendered: usize,
    warned_active: bool,
}

impl<S: Surface> Engine<S> {
    /// Validate the surface and options, then start the clock.
    ///
    /// Nothing is scheduled if either check fails.
    pub fn create(surface: S, config: EngineConfig) -> Result<Self, EngineError> {
        surface.validate().map_err(EngineError::InvalidSurface)?;
        config.validate()?;

        let (width, height) = surface.size();
        let mut scene = Scene::new(&config);
        scene.set_viewport(width, height);

        let mut clock = Clock::new(config.tick_interval(), config.max_catch_up_ticks);
        clock.start(Instant::now());

        log::debug!(
            "orb engine created: {}x{} surface, {} particles every {} tick(s), {:?} period",
            width,
            height,
            config.emission_count,
            config.emission_interval,
            clock.period()
        );

        Ok(Self {
            renderer: Renderer::new(config.particle_radius, config.zero_alpha_depth),
            surface,
            config,
            scene,
            clock,
            highlighted: false,
            anchor: AnchorTween::new(),
            running: true,
            rendered: 0,
            warned_active: false,
        })
    }

    // =========================================================================
    // CONFIG PORT
    // =========================================================================

    /// Select the highlighted palette entry from the next tick on.
    pub fn set_highlighted(&mut self, highlighted: bool) {
        if self.running {
            self.highlighted = highlighted;
        }
    }

    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Dock beside `anchor`, or return to the centered presentation.
    ///
    /// A rectangle with non-finite edges is ignored.
    pub fn set_anchor(&mut self, anchor: Option<AnchorRect>) {
        if let Some(rect) = anchor.filter(|r| !r.is_finite()) {
            log::warn!("ignoring non-finite anchor rectangle {:?}", rect);
            return;
        }
        if self.running {
            self.anchor.retarget(anchor, self.scene.tick(), &self.config.anchor);
        }
    }

    #[inline]
    pub fn anchor(&self) -> Option<AnchorRect> {
        self.anchor.anchor()
    }

    /// Presentation used for the current tick.
    pub fn presentation(&self) -> Presentation {
        self.anchor.sample(self.scene.tick(), &self.config.anchor)
    }

    /// Replace the options. Live particles keep their spawn-time parameters.
    pub fn update_config(&mut self, config: EngineConfig) -> Result<(), EngineError> {
        config.validate()?;
        self.scene.reconfigure(&config);
        self.renderer = Renderer::new(config.particle_radius, config.zero_alpha_depth);
        self.clock = Clock::new(config.tick_interval(), config.max_catch_up_ticks);
        if self.running {
            self.clock.start(Instant::now());
        }
        self.config = config;
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resize the surface and recompute projection constants.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.running {
            return;
        }
        self.surface.resize(width, height);
        let (width, height) = self.surface.size();
        self.scene.set_viewport(width, height);
        log::debug!("orb surface resized to {}x{}", width, height);
    }

    // =========================================================================
    // DRIVING
    // =========================================================================

    /// Run one full tick: emit, integrate, project, gate, render.
    ///
    /// Returns `false` without doing anything if the engine is destroyed or
    /// the surface currently has no area.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if self.surface.is_empty() {
            log::trace!("skipping tick on zero-area surface");
            return false;
        }

        let report = self.scene.step();

        let active = self.scene.pool().active_len();
        if !self.warned_active && active > self.config.active_warn_threshold {
            self.warned_active = true;
            log::warn!(
                "{} live orb particles exceeds the warning threshold of {}; emission is outpacing recycling",
                active,
                self.config.active_warn_threshold
            );
        }
        if self.scene.tick() % STATS_LOG_INTERVAL == 0 {
            log::debug!(
                "orb tick {}: {} active, {} free, +{} -{}",
                self.scene.tick(),
                active,
                self.scene.pool().free_len(),
                report.spawned,
                report.recycled()
            );
        }

        let color = self.config.palette.color(self.highlighted);
        let presentation = self.presentation();
        self.rendered = self
            .renderer
            .draw(&mut self.surface, self.scene.particles(), color, &presentation);
        true
    }

    /// Run every tick the clock says is due at `now`. Returns how many ran.
    pub fn advance(&mut self, now: Instant) -> u32 {
        if !self.running {
            return 0;
        }
        let due = self.clock.due(now);
        let mut ran = 0;
        for _ in 0..due {
            if self.tick() {
                ran += 1;
            }
        }
        ran
    }

    /// When the next tick is due, or `None` once destroyed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.clock.next_deadline()
    }

    /// Stop the clock and discard all particles. Safe to call repeatedly;
    /// afterwards every other operation is a no-op.
    pub fn destroy(&mut self) {
        self.clock.stop();
        if self.running {
            self.running = false;
            self.scene.clear();
            self.rendered = 0;
            log::debug!("orb engine destroyed after {} ticks", self.scene.tick());
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn stats(&self) -> EngineStats {
        let pool = self.scene.pool();
        EngineStats {
            tick: self.scene.tick(),
            active: pool.active_len(),
            free: pool.free_len(),
            allocated: pool.allocated(),
            rendered: self.rendered,
        }
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: Surface> Drop for Engine<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}
