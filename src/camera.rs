//! Turntable camera and perspective projector.
//!
//! The orb spins about the world Y axis at a fixed angle per tick, so the
//! rotation is frame-counted rather than wall-clock driven. Projection is a
//! simple pinhole with the eye `focal_length` units in front of the origin
//! on +Z:
//!
//! ```text
//! scale = radius_factor * f / (f - z')
//! screen = (x' * scale + cx, y * scale + cy)
//! ```

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Smallest allowed gap between the eye and a projected point.
pub const MIN_EYE_DISTANCE: f32 = 1e-3;

/// Rotation state that advances one step per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    angle: f32,
    /// Radians added per tick.
    pub turn_speed: f32,
    sin: f32,
    cos: f32,
}

impl Camera {
    pub fn new(turn_speed: f32) -> Self {
        Self {
            angle: 0.0,
            turn_speed,
            sin: 0.0,
            cos: 1.0,
        }
    }

    /// Advance by one step, wrapping into `[0, 2π)`.
    pub fn advance(&mut self) {
        self.angle = (self.angle + self.turn_speed).rem_euclid(TAU);
        let (sin, cos) = self.angle.sin_cos();
        self.sin = sin;
        self.cos = cos;
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Rotate a world point about the Y axis. Returns `(x', y, z')`.
    #[inline]
    pub fn rotate(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.cos * p.x + self.sin * p.z,
            p.y,
            -self.sin * p.x + self.cos * p.z,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(TAU / 1200.0)
    }
}

/// Output of projecting one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Screen position in viewport pixels.
    pub screen: Vec2,
    /// Depth after rotation.
    pub rotated_z: f32,
    /// Radius multiplier, always finite and positive.
    pub scale: f32,
}

/// Perspective projector for a viewport of known size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub focal_length: f32,
    pub radius_factor: f32,
    center: Vec2,
}

impl Projector {
    pub fn new(focal_length: f32, radius_factor: f32) -> Self {
        Self {
            focal_length,
            radius_factor,
            center: Vec2::ZERO,
        }
    }

    /// Recompute the projection center for a new viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.center = Vec2::new(width as f32 * 0.5, height as f32 * 0.5);
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Project a point that has already been rotated by the camera.
    ///
    /// Points at or behind the eye are clamped to [`MIN_EYE_DISTANCE`] in
    /// front of it so the result never goes infinite or flips sign.
    pub fn project(&self, rotated: Vec3) -> Projection {
        let eye_distance = (self.focal_length - rotated.z).max(MIN_EYE_DISTANCE);
        let scale = self.radius_factor * self.focal_length / eye_distance;

        Projection {
            screen: Vec2::new(rotated.x, rotated.y) * scale + self.center,
            rotated_z: rotated.z,
            scale,
        }
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(320.0, 0.9)
    }
}
