//! Double-buffered pixel writes with batched flushing.
//!
//! Generators write into the back surface one texel at a time; the front
//! surface is what a display collaborator reads. Copying back to front on
//! every texel would dominate the cost of synthesis, so flushes happen every
//! [`FlushPolicy::rows_per_flush`] completed rows and once more at the end.

use tracing::trace;

use crate::color::Rgb;
use crate::error::RasterError;
use crate::surface::RasterSurface;

/// Quantize a `[0, 1]` channel for storage.
///
/// Floors like a canvas colour string. The epsilon keeps values that came
/// from a byte (`b / 255`) mapping back to the same byte.
#[inline]
fn quantize(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 1e-9).floor() as u8
}

/// How often a [`PixelBuffer`] publishes its back surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlushPolicy {
    /// Completed rows between flushes. Zero is treated as one.
    pub rows_per_flush: u32,
}

impl Default for FlushPolicy {
    fn default() -> Self {
        Self { rows_per_flush: 16 }
    }
}

/// An addressable RGBA raster plus the displayable copy it flushes into.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    back: RasterSurface,
    front: RasterSurface,
    policy: FlushPolicy,
    current_row: Option<u32>,
    rows_since_flush: u32,
    flush_count: u64,
}

impl PixelBuffer {
    /// Create a transparent buffer.
    pub fn new(width: u32, height: u32, policy: FlushPolicy) -> Result<Self, RasterError> {
        Self::from_surface(RasterSurface::new(width, height)?, policy)
    }

    /// Create a buffer whose back and front start as copies of `surface`.
    pub fn from_surface(surface: RasterSurface, policy: FlushPolicy) -> Result<Self, RasterError> {
        Ok(Self {
            front: surface.clone(),
            back: surface,
            policy,
            current_row: None,
            rows_since_flush: 0,
            flush_count: 0,
        })
    }

    /// Create an opaque buffer filled with `color`.
    pub fn opaque(
        width: u32,
        height: u32,
        color: Rgb,
        policy: FlushPolicy,
    ) -> Result<Self, RasterError> {
        let rgba = [quantize(color.r), quantize(color.g), quantize(color.b), 255];
        Self::from_surface(RasterSurface::filled(width, height, rgba)?, policy)
    }

    pub fn width(&self) -> u32 {
        self.back.width()
    }

    pub fn height(&self) -> u32 {
        self.back.height()
    }

    /// Write one texel, replacing what was there. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb, alpha: f64) {
        if !self.back.contains(x as i64, y as i64) {
            return;
        }
        self.back.set(
            x,
            y,
            [
                quantize(color.r),
                quantize(color.g),
                quantize(color.b),
                quantize(alpha),
            ],
        );
    }

    /// Source-over composite `color` at `alpha` onto the texel at `(x, y)`.
    ///
    /// Coordinates outside the surface are clipped, which lets sprites
    /// straddle the edges.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgb, alpha: f64) {
        if !self.back.contains(x, y) || !(alpha > 0.0) {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let alpha = alpha.min(1.0);
        let (dst, dst_alpha) = self.get_pixel(x, y);
        let out_alpha = alpha + dst_alpha * (1.0 - alpha);
        let w = dst_alpha * (1.0 - alpha);
        let mix = |s: f64, d: f64| (s.clamp(0.0, 1.0) * alpha + d * w) / out_alpha;
        let out = Rgb::new(mix(color.r, dst.r), mix(color.g, dst.g), mix(color.b, dst.b));
        self.set_pixel(x, y, out, out_alpha);
    }

    /// Read a texel from the back surface as `[0, 1]` floats.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> (Rgb, f64) {
        let [r, g, b, a] = self.back.get(x, y);
        (
            Rgb::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0),
            a as f64 / 255.0,
        )
    }

    /// Record that a generator is working on `row`; flushes once enough
    /// distinct rows have been completed since the last flush.
    pub fn note_row(&mut self, row: u32) {
        if self.current_row == Some(row) {
            return;
        }
        if self.current_row.is_some() {
            self.rows_since_flush += 1;
        }
        self.current_row = Some(row);
        if self.rows_since_flush >= self.policy.rows_per_flush.max(1) {
            self.flush();
        }
    }

    /// Publish the back surface to the front surface.
    pub fn flush(&mut self) {
        self.front.copy_from(&self.back);
        self.rows_since_flush = 0;
        self.flush_count += 1;
        trace!(flushes = self.flush_count, "pixel buffer flushed");
    }

    /// Number of flushes performed so far.
    pub fn flush_count(&self) -> u64 {
        self.flush_count
    }

    /// The surface generators write into.
    pub fn back(&self) -> &RasterSurface {
        &self.back
    }

    /// The most recently flushed surface.
    pub fn front(&self) -> &RasterSurface {
        &self.front
    }

    /// Consume the buffer, returning the flushed surface.
    pub fn into_front(self) -> RasterSurface {
        self.front
    }

    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }
}
