//! Engine options.
//!
//! [`EngineConfig`] carries every tunable of the orb. Build it in code with
//! the `with_*` methods, or load it from JSON; missing JSON fields fall back
//! to the defaults, which give the stock blue orb.
//!
//! ```ignore
//! let config = EngineConfig::default()
//!     .with_sphere_radius(120.0)
//!     .with_emission_count(6)
//!     .with_seed(42);
//! let engine = Engine::create(Canvas::new(400, 400), config)?;
//! ```
//!
//! ```json
//! { "sphere_radius": 120.0, "palette": { "normal": { "r": 0, "g": 200, "b": 180 } } }
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::path::Path;
use std::time::Duration;

use crate::anchor::AnchorConfig;
use crate::envelope::Envelope;
use crate::error::{ConfigError, EngineError};
use crate::visuals::Palette;

/// All engine options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Radius of the emission sphere, in world units.
    pub sphere_radius: f32,
    /// Extra multiplier applied to every projected scale.
    pub radius_factor: f32,
    /// Particles spawned per emission.
    pub emission_count: u32,
    /// Ticks between emissions.
    pub emission_interval: u32,
    /// Disc radius at projected scale 1, in pixels.
    pub particle_radius: f32,
    /// Rotated depth at which particles fade out completely.
    pub zero_alpha_depth: f32,
    /// Eye distance from the origin.
    pub focal_length: f32,
    /// Near cutoff; must be below `focal_length`.
    pub z_max: f32,
    /// Rotation per tick, in radians.
    pub turn_speed: f32,
    /// Per-axis bound of the random velocity kick.
    pub jitter: Vec3,
    /// Constant per-tick velocity change along Y.
    pub gravity: f32,
    /// Minimum dwell on the sphere, in ticks.
    pub stuck_time_base: u32,
    /// Random extra dwell, drawn from `[0, stuck_time_jitter)`.
    pub stuck_time_jitter: u32,
    /// Opacity profile; `hold_value` is the peak alpha.
    pub envelope: Envelope,
    pub palette: Palette,
    pub anchor: AnchorConfig,
    /// Clock period in milliseconds.
    pub tick_interval_ms: u64,
    /// Most ticks run for one clock reading after a stall.
    pub max_catch_up_ticks: u32,
    /// Active-set size that triggers a one-time warning.
    pub active_warn_threshold: usize,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 100.0,
            radius_factor: 0.9,
            emission_count: 8,
            emission_interval: 1,
            particle_radius: 1.8,
            zero_alpha_depth: -750.0,
            focal_length: 320.0,
            z_max: 318.0,
            turn_speed: TAU / 1200.0,
            jitter: Vec3::splat(0.1),
            gravity: 0.0,
            stuck_time_base: 90,
            stuck_time_jitter: 20,
            envelope: Envelope::default(),
            palette: Palette::default(),
            anchor: AnchorConfig::default(),
            tick_interval_ms: 16,
            max_catch_up_ticks: 4,
            active_warn_threshold: 20_000,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // BUILDER
    // =========================================================================

    pub fn with_sphere_radius(mut self, radius: f32) -> Self {
        self.sphere_radius = radius;
        self
    }

    pub fn with_emission_count(mut self, count: u32) -> Self {
        self.emission_count = count;
        self
    }

    pub fn with_emission_interval(mut self, ticks: u32) -> Self {
        self.emission_interval = ticks;
        self
    }

    pub fn with_particle_radius(mut self, radius: f32) -> Self {
        self.particle_radius = radius;
        self
    }

    pub fn with_zero_alpha_depth(mut self, depth: f32) -> Self {
        self.zero_alpha_depth = depth;
        self
    }

    /// Set the focal length and move `z_max` to just in front of the eye.
    pub fn with_focal_length(mut self, focal_length: f32) -> Self {
        self.focal_length = focal_length;
        self.z_max = focal_length - 2.0;
        self
    }

    pub fn with_z_max(mut self, z_max: f32) -> Self {
        self.z_max = z_max;
        self
    }

    pub fn with_turn_speed(mut self, radians_per_tick: f32) -> Self {
        self.turn_speed = radians_per_tick;
        self
    }

    pub fn with_jitter(mut self, jitter: Vec3) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_stuck_time(mut self, base: u32, jitter: u32) -> Self {
        self.stuck_time_base = base;
        self.stuck_time_jitter = jitter;
        self
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn with_peak_alpha(mut self, alpha: f32) -> Self {
        self.envelope.hold_value = alpha;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_anchor(mut self, anchor: AnchorConfig) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // =========================================================================
    // DERIVED VALUES
    // =========================================================================

    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Gravity as an acceleration vector.
    #[inline]
    pub fn gravity_vector(&self) -> Vec3 {
        Vec3::new(0.0, self.gravity, 0.0)
    }

    // =========================================================================
    // VALIDATION AND LOADING
    // =========================================================================

    /// Check the options for consistency.
    pub fn validate(&self) -> Result<(), EngineError> {
        let finite = [
            ("sphere_radius", self.sphere_radius),
            ("radius_factor", self.radius_factor),
            ("particle_radius", self.particle_radius),
            ("zero_alpha_depth", self.zero_alpha_depth),
            ("focal_length", self.focal_length),
            ("z_max", self.z_max),
            ("turn_speed", self.turn_speed),
            ("gravity", self.gravity),
            ("envelope.init_value", self.envelope.init_value),
            ("envelope.hold_value", self.envelope.hold_value),
            ("envelope.last_value", self.envelope.last_value),
            ("anchor.margin", self.anchor.margin),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite, got {value}")));
            }
        }
        if !self.jitter.is_finite() {
            return Err(invalid("jitter must be finite".into()));
        }

        if self.sphere_radius <= 0.0 {
            return Err(invalid(format!("sphere_radius must be positive, got {}", self.sphere_radius)));
        }
        if self.radius_factor <= 0.0 {
            return Err(invalid(format!("radius_factor must be positive, got {}", self.radius_factor)));
        }
        if self.focal_length <= 0.0 {
            return Err(invalid(format!("focal_length must be positive, got {}", self.focal_length)));
        }
        if self.z_max >= self.focal_length {
            return Err(invalid(format!(
                "z_max ({}) must be below focal_length ({})",
                self.z_max, self.focal_length
            )));
        }
        if self.zero_alpha_depth == 0.0 {
            return Err(invalid("zero_alpha_depth must be non-zero".into()));
        }
        if self.particle_radius < 0.0 {
            return Err(invalid(format!("particle_radius must not be negative, got {}", self.particle_radius)));
        }
        if self.emission_interval == 0 {
            return Err(invalid("emission_interval must be at least 1 tick".into()));
        }
        if self.stuck_time_base.checked_add(self.stuck_time_jitter).is_none() {
            return Err(invalid(format!(
                "stuck_time_base ({}) + stuck_time_jitter ({}) overflows",
                self.stuck_time_base, self.stuck_time_jitter
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms must be at least 1".into()));
        }
        if !(self.anchor.docked_scale > 0.0 && self.anchor.docked_scale <= 1.0) {
            return Err(invalid(format!(
                "anchor.docked_scale must be in (0, 1], got {}",
                self.anchor.docked_scale
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

fn invalid(msg: String) -> EngineError {
    EngineError::InvalidConfig(msg)
}
