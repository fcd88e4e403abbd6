//! Colors and palettes.
//!
//! The orb is drawn in a single color picked from a two-entry palette by the
//! host's highlight flag (typically orange while the microphone is
//! recording).

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized color with channels in `0.0..=1.0`.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }

    /// RGBA with the given alpha, channels in `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        let c = self.to_vec3();
        [c.x, c.y, c.z, alpha.clamp(0.0, 1.0)]
    }
}

/// Two colors keyed by the highlight flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Idle color.
    pub normal: Rgb,
    /// Color while highlighted.
    pub highlighted: Rgb,
}

impl Palette {
    /// Default idle blue.
    pub const IDLE_BLUE: Rgb = Rgb::new(0, 72, 255);
    /// Default highlight orange.
    pub const RECORDING_ORANGE: Rgb = Rgb::new(235, 94, 52);

    pub const fn new(normal: Rgb, highlighted: Rgb) -> Self {
        Self {
            normal,
            highlighted,
        }
    }

    #[inline]
    pub fn color(&self, highlighted: bool) -> Rgb {
        if highlighted {
            self.highlighted
        } else {
            self.normal
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Self::IDLE_BLUE, Self::RECORDING_ORANGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_selects_by_flag() {
        let palette = Palette::default();
        assert_eq!(palette.color(false), Rgb::new(0, 72, 255));
        assert_eq!(palette.color(true), Rgb::new(235, 94, 52));
    }

    #[test]
    fn test_with_alpha_clamps() {
        let c = Rgb::new(255, 0, 51).with_alpha(1.5);
        assert_eq!(c[0], 1.0);
        assert_eq!(c[1], 0.0);
        assert!((c[2] - 0.2).abs() < 1e-6);
        assert_eq!(c[3], 1.0);
    }
}
