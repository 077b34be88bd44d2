//! The output image: a flat array of per-pixel radiance estimates and the
//! final tone-mapped PNG encode.
//!
//! Unlike the teacher's original `Film`, there is no reconstruction filter
//! or tile-merging machinery here: each integrator call already returns one
//! pixel's final averaged radiance (spec.md §6), so `Image` only needs to
//! hold that value and know how to write it out. The per-pixel parallel
//! render loop in `integrator` writes each cell exactly once, so no locking
//! is required (spec.md §5).

use crate::spectrum::Spectrum;
use crate::Point2i;
use anyhow::{Context, Result};
use image::{ImageBuffer, Rgb};

pub struct Image {
    resolution: Point2i,
    pixels: Vec<Spectrum>,
}

impl Image {
    pub fn new(resolution: Point2i) -> Self {
        let n = (resolution.x.max(0) as usize) * (resolution.y.max(0) as usize);
        Image { resolution, pixels: vec![Spectrum::BLACK; n] }
    }

    pub fn resolution(&self) -> Point2i {
        self.resolution
    }

    pub fn set_zero(&mut self) {
        for p in &mut self.pixels {
            *p = Spectrum::BLACK;
        }
    }

    pub fn set_value(&mut self, index: usize, value: Spectrum) {
        self.pixels[index] = value;
    }

    pub fn pixels(&self) -> &[Spectrum] {
        &self.pixels
    }

    /// Applies a `1/2.2` gamma curve and clamps to `[0, 1]`, then writes an
    /// 8-bit PNG. Spec.md §6's display transform, applied once at output
    /// rather than per-sample so intermediate accumulation stays linear.
    pub fn write_png(&self, path: &str) -> Result<()> {
        let width = self.resolution.x.max(0) as u32;
        let height = self.resolution.y.max(0) as u32;

        let mut buf = ImageBuffer::<Rgb<u8>, Vec<u8>>::new(width, height);
        for (i, pixel) in self.pixels.iter().enumerate() {
            let x = (i as u32) % width.max(1);
            let y = (i as u32) / width.max(1);
            let [r, g, b] = tonemap(*pixel);
            buf.put_pixel(x, y, Rgb([r, g, b]));
        }

        buf.save(path).with_context(|| format!("writing output image to {}", path))?;
        Ok(())
    }
}

fn tonemap(s: Spectrum) -> [u8; 3] {
    let rgb = s.clamp_positive().to_rgb();
    let mut out = [0u8; 3];
    for i in 0..3 {
        let gamma_corrected = rgb[i].powf(1.0 / 2.2);
        let clamped = crate::math::clamp(gamma_corrected, 0.0, 1.0);
        out[i] = (clamped * 255.0 + 0.5) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_is_black() {
        let image = Image::new(Point2i::new(4, 3));
        assert_eq!(image.pixels().len(), 12);
        assert!(image.pixels().iter().all(|p| p.is_black()));
    }

    #[test]
    fn set_value_round_trips() {
        let mut image = Image::new(Point2i::new(2, 2));
        image.set_value(1, Spectrum::new(0.5));
        assert_eq!(image.pixels()[1], Spectrum::new(0.5));
        assert!(image.pixels()[0].is_black());
    }

    #[test]
    fn tonemap_clamps_above_unit_range() {
        let [r, g, b] = tonemap(Spectrum::new(4.0));
        assert_eq!((r, g, b), (255, 255, 255));
    }

    #[test]
    fn tonemap_is_monotonic_below_one() {
        let [lo, _, _] = tonemap(Spectrum::new(0.1));
        let [hi, _, _] = tonemap(Spectrum::new(0.5));
        assert!(hi > lo);
    }
}
