//! Glowing sun: an inverse-square falloff scanned over the whole canvas and
//! added onto whatever earlier layers left there.

use vista_raster::{GeneratorState, PixelBuffer, Progress, Rgb, ScanCursor, ScanStep};

use crate::error::{SpaceError, at_least, finite};
use crate::layer::CanvasLayer;

/// Falloff exponent applied to the squared distance.
const GLOW_EXPONENT: f64 = 1.0;

/// Per-channel saturation boost applied to the overexposed part of the
/// glow, giving the core its white-green halo.
const HALO_BOOST: [f64; 3] = [2.0, 4.0, 2.0];

/// Full-canvas additive glow source.
#[derive(Debug, Clone)]
pub struct GlowSourceGenerator {
    color: Rgb,
    x: f64,
    y: f64,
    m: f64,
    cursor: ScanCursor,
    state: GeneratorState,
}

impl GlowSourceGenerator {
    /// Create a glow centred at `(x, y)` scanning a `width x height` area.
    ///
    /// Cells of that area outside the canvas it is drawn onto are skipped.
    pub fn new(
        color: Rgb,
        x: f64,
        y: f64,
        size: f64,
        width: u32,
        height: u32,
    ) -> Result<Self, SpaceError> {
        let x = finite("sun", "x", x)?;
        let y = finite("sun", "y", y)?;
        let size = at_least("sun", "size", size, 0.0, true)?;
        Ok(Self::from_parts(color, x, y, size, width, height))
    }

    pub(crate) fn from_parts(color: Rgb, x: f64, y: f64, size: f64, width: u32, height: u32) -> Self {
        Self {
            color,
            x,
            y,
            m: size.powf(GLOW_EXPONENT * 2.0),
            cursor: ScanCursor::new(width, height),
            state: GeneratorState::Pending,
        }
    }

    /// Glow contribution at a texel centre: `(intensity, overexposure)`.
    fn shade(&self, px: u32, py: u32) -> (f64, f64) {
        let dx = px as f64 - self.x;
        let dy = py as f64 - self.y;
        let raw = self.m / (dx * dx + dy * dy).powf(GLOW_EXPONENT);
        let intensity = raw.min(1.0);
        (intensity, raw - intensity)
    }
}

impl CanvasLayer for GlowSourceGenerator {
    fn advance(&mut self, canvas: &mut PixelBuffer) -> Progress {
        let progress = match self.cursor.advance() {
            ScanStep::Finished => Progress::DONE,
            ScanStep::Cell { x, y, progress } if !canvas.back().contains(x as i64, y as i64) => {
                Progress::partial(progress)
            }
            ScanStep::Cell { x, y, progress } => {
                canvas.note_row(y);
                let (i, q) = self.shade(x, y);
                let (existing, _) = canvas.get_pixel(x, y);
                let boost = |c: f64, k: f64| (c + q * k).min(1.0) * i;
                let out = Rgb::new(
                    existing.r + boost(self.color.r, HALO_BOOST[0]),
                    existing.g + boost(self.color.g, HALO_BOOST[1]),
                    existing.b + boost(self.color.b, HALO_BOOST[2]),
                );
                canvas.set_pixel(x, y, out, 1.0);
                Progress::partial(progress)
            }
        };
        self.state = GeneratorState::after(progress);
        progress
    }

    fn state(&self) -> GeneratorState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_raster::FlushPolicy;

    fn run(glow: &mut GlowSourceGenerator, canvas: &mut PixelBuffer) {
        while !glow.advance(canvas).finished {}
    }

    #[test]
    fn test_centre_saturates() {
        let mut canvas = PixelBuffer::opaque(16, 16, Rgb::BLACK, FlushPolicy::default()).unwrap();
        let mut glow =
            GlowSourceGenerator::new(Rgb::new(1.0, 0.3, 0.1), 8.0, 8.0, 2.0, 16, 16).unwrap();
        run(&mut glow, &mut canvas);
        assert_eq!(canvas.back().get(8, 8), [255, 255, 255, 255]);
    }

    #[test]
    fn test_glow_is_additive() {
        let mut base = PixelBuffer::opaque(16, 16, Rgb::grey(0.2), FlushPolicy::default()).unwrap();
        let mut black = PixelBuffer::opaque(16, 16, Rgb::BLACK, FlushPolicy::default()).unwrap();
        let make = || GlowSourceGenerator::new(Rgb::new(0.1, 0.5, 1.0), 2.0, 3.0, 1.5, 16, 16);
        run(&mut make().unwrap(), &mut base);
        run(&mut make().unwrap(), &mut black);
        for (x, y) in [(15, 15), (10, 2), (0, 12)] {
            let lit = black.back().get(x, y);
            let over = base.back().get(x, y);
            for ch in 0..3 {
                assert!(over[ch] >= lit[ch], "glow over grey should not be darker than over black");
                assert!(over[ch] >= 51, "earlier layer must persist under the glow");
            }
        }
    }

    #[test]
    fn test_far_field_fades() {
        let mut canvas = PixelBuffer::opaque(64, 64, Rgb::BLACK, FlushPolicy::default()).unwrap();
        let mut glow = GlowSourceGenerator::new(Rgb::WHITE, 0.0, 0.0, 1.0, 64, 64).unwrap();
        run(&mut glow, &mut canvas);
        let corner = canvas.back().get(63, 63);
        assert!(corner[0] < 5, "distant texel should be nearly black, got {corner:?}");
    }

    #[test]
    fn test_rejects_zero_size() {
        assert!(matches!(
            GlowSourceGenerator::new(Rgb::WHITE, 0.0, 0.0, 0.0, 4, 4),
            Err(SpaceError::InvalidParameter { generator: "sun", name: "size", .. })
        ));
    }

    #[test]
    fn test_glow_larger_than_canvas_is_clipped() {
        let mut canvas = PixelBuffer::opaque(8, 8, Rgb::BLACK, FlushPolicy::default()).unwrap();
        let mut glow = GlowSourceGenerator::new(Rgb::WHITE, 4.0, 4.0, 2.0, 16, 16).unwrap();
        let mut steps = 0;
        while !glow.advance(&mut canvas).finished {
            steps += 1;
        }
        assert_eq!(steps, 16 * 16);
        assert_eq!(glow.state(), GeneratorState::Done);
        assert_eq!(canvas.back().get(4, 4), [255, 255, 255, 255]);
    }

    #[test]
    fn test_glow_smaller_than_canvas_leaves_rest() {
        let mut canvas = PixelBuffer::opaque(8, 8, Rgb::BLACK, FlushPolicy::default()).unwrap();
        let mut glow = GlowSourceGenerator::new(Rgb::WHITE, 1.0, 1.0, 4.0, 4, 4).unwrap();
        run(&mut glow, &mut canvas);
        assert_eq!(canvas.back().get(1, 1), [255, 255, 255, 255]);
        assert_eq!(canvas.back().get(6, 6), [0, 0, 0, 255]);
    }

    #[test]
    fn test_flushes_periodically() {
        let mut canvas =
            PixelBuffer::opaque(4, 10, Rgb::BLACK, FlushPolicy { rows_per_flush: 3 }).unwrap();
        let mut glow = GlowSourceGenerator::new(Rgb::WHITE, 2.0, 2.0, 1.0, 4, 10).unwrap();
        run(&mut glow, &mut canvas);
        assert_eq!(canvas.flush_count(), 3);
    }
}
