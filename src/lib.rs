//! # Energy Orb
//!
//! The ambient particle sphere that sits behind an assistant's voice UI.
//!
//! Every tick a handful of particles appear on the surface of a sphere,
//! linger there for a moment, then drift away under a random walk while the
//! whole cloud slowly turns. Particles are drawn as small discs whose opacity
//! follows an attack/hold/decay envelope and fades with depth. When a
//! particle leaves the view it goes back to a free list for reuse.
//!
//! ## Quick Start
//!
//! ```ignore
//! use energy_orb::prelude::*;
//!
//! let mut engine = Engine::create(Canvas::new(400, 400), EngineConfig::default())?;
//!
//! engine.set_highlighted(true);                 // recording: turn orange
//! engine.set_anchor(Some(AnchorRect::new(600.0, 80.0, 480.0, 270.0)));
//!
//! loop {
//!     engine.advance(std::time::Instant::now()); // runs due ticks
//!     // present engine.surface() ...
//! }
//! ```
//!
//! ## Tick Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Emit on the sphere surface | [`emitter`] |
//! | Age, drift and jitter | [`integrator`] |
//! | Turn and project | [`camera`] |
//! | Opacity over age | [`envelope`] |
//! | Recycle out-of-view particles | [`lifecycle`] |
//! | Clear and paint discs | [`render`] |
//!
//! The [`Engine`] ties these together with a [`Clock`](time::Clock) and the
//! host-facing controls (highlight flag, docking anchor, resize, destroy).
//!
//! ## Surfaces
//!
//! Anything implementing [`Surface`] can be drawn on. [`Canvas`] rasterizes
//! on the CPU; [`DiscBatch`] records instances for the [`gpu`] renderer used
//! by the `orb-viewer` binary.

pub mod anchor;
pub mod camera;
pub mod config;
pub mod emitter;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod gpu;
pub mod integrator;
pub mod lifecycle;
pub mod particle;
pub mod pool;
pub mod render;
pub mod scene;
pub mod surface;
pub mod time;
pub mod visuals;

pub use anchor::{AnchorConfig, AnchorRect, Presentation};
pub use config::EngineConfig;
pub use engine::{Engine, EngineStats};
pub use envelope::Envelope;
pub use error::{ConfigError, EngineError, GpuError, ViewerError};
pub use glam::{Vec2, Vec3};
pub use particle::{Particle, Phase};
pub use pool::{ParticleHandle, ParticlePool};
pub use surface::{Canvas, Disc, DiscBatch, Surface};
pub use visuals::{Palette, Rgb};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use energy_orb::prelude::*;
/// ```
pub mod prelude {
    pub use crate::anchor::{AnchorConfig, AnchorRect};
    pub use crate::config::EngineConfig;
    pub use crate::engine::{Engine, EngineStats};
    pub use crate::envelope::Envelope;
    pub use crate::surface::{Canvas, DiscBatch, Surface};
    pub use crate::visuals::{Palette, Rgb};
    pub use crate::{Vec2, Vec3};
}
