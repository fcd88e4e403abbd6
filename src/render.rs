//! Paints surviving particles as depth-faded discs.

use crate::anchor::Presentation;
use crate::particle::Particle;
use crate::surface::{Disc, Surface};
use crate::visuals::Rgb;

/// Disc renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    /// Disc radius at scale 1, in pixels.
    pub particle_radius: f32,
    /// Rotated depth at which particles become fully transparent. The orb
    /// lives around the origin, so this is negative (behind it).
    pub zero_alpha_depth: f32,
}

impl Renderer {
    pub fn new(particle_radius: f32, zero_alpha_depth: f32) -> Self {
        Self {
            particle_radius,
            zero_alpha_depth,
        }
    }

    /// Opacity factor for a rotated depth: 1 in front of the origin, fading
    /// linearly to 0 at `zero_alpha_depth`.
    #[inline]
    pub fn depth_attenuation(&self, rotated_z: f32) -> f32 {
        (1.0 - rotated_z / self.zero_alpha_depth).clamp(0.0, 1.0)
    }

    /// Disc for one projected particle.
    pub fn disc_for(&self, particle: &Particle, color: Rgb, presentation: &Presentation) -> Disc {
        Disc {
            center: presentation.apply(particle.projected),
            radius: particle.scale * self.particle_radius * presentation.scale,
            color,
            alpha: self.depth_attenuation(particle.rotated_z) * particle.alpha,
        }
    }

    /// Clear `surface` and paint every particle. Returns the number of discs
    /// submitted.
    pub fn draw<'a, S, I>(&self, surface: &mut S, particles: I, color: Rgb, presentation: &Presentation) -> usize
    where
        S: Surface + ?Sized,
        I: IntoIterator<Item = &'a Particle>,
    {
        surface.clear();

        let mut drawn = 0;
        for particle in particles {
            surface.fill_disc(&self.disc_for(particle, color, presentation));
            drawn += 1;
        }
        drawn
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(1.8, -750.0)
    }
}
