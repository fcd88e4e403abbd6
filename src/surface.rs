//! Drawing surfaces.
//!
//! The renderer only needs three operations from whatever it draws on: query
//! the size, clear, and fill a disc. Two surfaces ship with the crate:
//!
//! | Surface | Use |
//! |---------|-----|
//! | [`Canvas`] | CPU raster backed by an [`image::RgbaImage`] (tests, snapshots) |
//! | [`DiscBatch`] | Records instances for the GPU disc renderer |

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use image::{Rgba, RgbaImage};
use std::path::Path;

use crate::visuals::Rgb;

/// Largest width or height a surface may report.
pub const MAX_SURFACE_DIMENSION: u32 = 16_384;

/// A filled, uniformly colored circle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
}

/// Something the orb can be painted on.
pub trait Surface {
    /// Current `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Change the pixel dimensions. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    /// Erase everything.
    fn clear(&mut self);

    /// Paint one disc over the current contents.
    fn fill_disc(&mut self, disc: &Disc);

    /// Check that the surface can be drawn on.
    fn validate(&self) -> Result<(), String> {
        let (width, height) = self.size();
        if width > MAX_SURFACE_DIMENSION || height > MAX_SURFACE_DIMENSION {
            return Err(format!(
                "surface is {width}x{height}, larger than the {MAX_SURFACE_DIMENSION}px limit"
            ));
        }
        Ok(())
    }

    /// Whether either dimension is zero.
    fn is_empty(&self) -> bool {
        let (width, height) = self.size();
        width == 0 || height == 0
    }
}

// ============================================================================
// Canvas
// ============================================================================

/// Software raster surface with source-over alpha compositing.
///
/// Cleared pixels are fully transparent. Discs cover every pixel whose center
/// lies inside the circle; there is no anti-aliasing.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Wrap raw RGBA8 pixel data. Returns `None` if the buffer length does
    /// not match the dimensions.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, pixels).map(|image| Self { image })
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Pixel at `(x, y)`, if in range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Number of pixels with non-zero alpha.
    pub fn covered_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p.0[3] > 0).count()
    }

    /// Write the canvas to an image file; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.image.save(path)
    }

    fn blend(&mut self, x: u32, y: u32, color: [f32; 3], alpha: f32) {
        let dst = self.image.get_pixel_mut(x, y);
        let [dr, dg, db, da] = dst.0;
        let da = da as f32 / 255.0;

        let out_a = alpha + da * (1.0 - alpha);
        if out_a <= 0.0 {
            *dst = Rgba([0, 0, 0, 0]);
            return;
        }

        let mix = |s: f32, d: u8| -> u8 {
            let d = d as f32 / 255.0;
            let c = (s * alpha + d * da * (1.0 - alpha)) / out_a;
            (c * 255.0).round().clamp(0.0, 255.0) as u8
        };

        *dst = Rgba([
            mix(color[0], dr),
            mix(color[1], dg),
            mix(color[2], db),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ]);
    }
}

impl Surface for Canvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }

    fn fill_disc(&mut self, disc: &Disc) {
        let alpha = disc.alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 || !(disc.radius > 0.0) || !disc.center.is_finite() {
            return;
        }

        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return;
        }

        let r = disc.radius;
        let x0 = (disc.center.x - r).floor().max(0.0) as u32;
        let y0 = (disc.center.y - r).floor().max(0.0) as u32;
        let x1 = ((disc.center.x + r).ceil().max(0.0) as u32).min(width - 1);
        let y1 = ((disc.center.y + r).ceil().max(0.0) as u32).min(height - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let color = disc.color.to_vec3().to_array();
        let r2 = r * r;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - disc.center;
                if d.length_squared() <= r2 {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }
}

// ============================================================================
// GPU disc batch
// ============================================================================

/// One disc as uploaded to the GPU instance buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DiscInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    /// Straight (non-premultiplied) RGBA.
    pub color: [f32; 4],
}

/// Surface that records discs for the GPU renderer instead of rasterizing.
#[derive(Debug, Clone, Default)]
pub struct DiscBatch {
    width: u32,
    height: u32,
    instances: Vec<DiscInstance>,
}

impl DiscBatch {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            instances: Vec::new(),
        }
    }

    /// Discs recorded since the last clear, in paint order.
    #[inline]
    pub fn instances(&self) -> &[DiscInstance] {
        &self.instances
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Surface for DiscBatch {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.instances.clear();
    }

    fn clear(&mut self) {
        self.instances.clear();
    }

    fn fill_disc(&mut self, disc: &Disc) {
        if disc.alpha <= 0.0 || !(disc.radius > 0.0) || !disc.center.is_finite() {
            return;
        }
        self.instances.push(DiscInstance {
            center: disc.center.to_array(),
            radius: disc.radius,
            _pad: 0.0,
            color: disc.color.with_alpha(disc.alpha),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(x: f32, y: f32, radius: f32, alpha: f32) -> Disc {
        Disc {
            center: Vec2::new(x, y),
            radius,
            color: Rgb::new(255, 0, 0),
            alpha,
        }
    }

    #[test]
    fn test_canvas_fill_and_clear() {
        let mut canvas = Canvas::new(20, 20);
        canvas.fill_disc(&disc(10.0, 10.0, 3.0, 1.0));

        assert_eq!(canvas.pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
        // Area of r=3 is ~28 pixels
        let covered = canvas.covered_pixels();
        assert!((20..=37).contains(&covered), "covered {covered}");

        canvas.clear();
        assert_eq!(canvas.covered_pixels(), 0);
    }

    #[test]
    fn test_canvas_source_over() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_disc(&disc(2.0, 2.0, 1.0, 0.5));
        let [r, _, _, a] = canvas.pixel(1, 1).unwrap_or_default();
        assert_eq!(r, 255);
        assert_eq!(a, 128);

        canvas.fill_disc(&disc(2.0, 2.0, 1.0, 0.5));
        let [_, _, _, a] = canvas.pixel(1, 1).unwrap_or_default();
        // 0.5 + 0.5 * 0.5, up to rounding of the stored alpha
        assert!((191..=192).contains(&a));
    }

    #[test]
    fn test_canvas_clips_offscreen_discs() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_disc(&disc(-50.0, -50.0, 4.0, 1.0));
        canvas.fill_disc(&disc(100.0, 4.0, 4.0, 1.0));
        assert_eq!(canvas.covered_pixels(), 0);

        // Partially visible at the corner
        canvas.fill_disc(&disc(0.0, 0.0, 2.0, 1.0));
        assert!(canvas.covered_pixels() > 0);
    }

    #[test]
    fn test_canvas_ignores_degenerate_discs() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_disc(&disc(4.0, 4.0, 0.0, 1.0));
        canvas.fill_disc(&disc(4.0, 4.0, 2.0, 0.0));
        canvas.fill_disc(&disc(f32::NAN, 4.0, 2.0, 1.0));
        canvas.fill_disc(&disc(4.0, 4.0, f32::NAN, 1.0));
        assert_eq!(canvas.covered_pixels(), 0);
    }

    #[test]
    fn test_zero_area_canvas() {
        let mut canvas = Canvas::new(0, 10);
        assert!(canvas.is_empty());
        canvas.fill_disc(&disc(0.0, 0.0, 5.0, 1.0));
        assert!(canvas.validate().is_ok());
    }

    #[test]
    fn test_oversized_surface_is_invalid() {
        let batch = DiscBatch::new(MAX_SURFACE_DIMENSION + 1, 10);
        assert!(batch.validate().is_err());
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(Canvas::from_raw(2, 2, vec![0; 16]).is_some());
        assert!(Canvas::from_raw(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_disc_batch_records_instances() {
        let mut batch = DiscBatch::new(100, 100);
        batch.fill_disc(&disc(10.0, 20.0, 2.0, 0.25));
        batch.fill_disc(&disc(10.0, 20.0, 2.0, 0.0));

        assert_eq!(batch.len(), 1);
        let inst = batch.instances()[0];
        assert_eq!(inst.center, [10.0, 20.0]);
        assert_eq!(inst.color, [1.0, 0.0, 0.0, 0.25]);

        batch.clear();
        assert!(batch.is_blank());
    }
}
