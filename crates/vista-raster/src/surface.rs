//! Row-major RGBA8 surfaces.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::RasterError;

/// A `width x height` RGBA raster with byte channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    /// Pixel data in row-major RGBA order. Length = `width * height * 4`.
    pixels: Vec<u8>,
}

impl RasterSurface {
    /// Create a fully transparent black surface.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Create a surface with every texel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::ZeroDimensions { width, height });
        }
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Whether `(x, y)` addresses a texel of this surface.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Read one texel.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Write one texel.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Overwrite this surface with `other`'s contents. Dimensions must match.
    pub(crate) fn copy_from(&mut self, other: &RasterSurface) {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        self.pixels.copy_from_slice(&other.pixels);
    }

    /// Count the number of unique colours (ignoring alpha).
    pub fn unique_color_count(&self) -> usize {
        let mut colors = std::collections::HashSet::new();
        for chunk in self.pixels.chunks_exact(4) {
            colors.insert((chunk[0], chunk[1], chunk[2]));
        }
        colors.len()
    }

    /// Encode the surface as an in-memory PNG blob.
    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            &self.pixels,
            self.width,
            self.height,
            ExtendedColorType::Rgba8,
        )?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_correct_dimensions() {
        let surface = RasterSurface::new(256, 128).unwrap();
        assert_eq!(surface.dimensions(), (256, 128));
        assert_eq!(surface.pixels().len(), 256 * 128 * 4);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            RasterSurface::new(0, 4),
            Err(RasterError::ZeroDimensions { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut surface = RasterSurface::filled(8, 8, [0, 0, 0, 255]).unwrap();
        surface.set(2, 3, [10, 20, 30, 40]);
        assert_eq!(surface.get(2, 3), [10, 20, 30, 40]);
        assert_eq!(surface.get(3, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn test_encode_png_signature() {
        let surface = RasterSurface::filled(4, 4, [255, 0, 0, 255]).unwrap();
        let png = surface.encode_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_contains() {
        let surface = RasterSurface::new(3, 2).unwrap();
        assert!(surface.contains(0, 0));
        assert!(surface.contains(2, 1));
        assert!(!surface.contains(-1, 0));
        assert!(!surface.contains(3, 0));
        assert!(!surface.contains(0, 2));
    }
}
