//! Point-light star sprites with a power-law falloff.
//!
//! Intensity at squared distance `d` from the centre is
//! `min(1, m / d^(e + d / 10000))`. The distance-dependent exponent steepens
//! the tail so faint halos fade out instead of being clipped by the sprite
//! bounds.

use vista_raster::{GeneratorState, PixelBuffer, Progress, Rgb, ScanCursor, ScanStep};

use crate::error::{SpaceError, at_least, finite};
use crate::layer::CanvasLayer;

/// Falloff exponent applied to the squared distance.
const STAR_EXPONENT: f64 = 0.5;

/// Contributions at or below this intensity are not drawn.
const STAR_CUTOFF: f64 = 0.001;

/// Hard bound on the sprite half-width search.
const MAX_SPRITE_RADIUS: u32 = 1 << 16;

#[inline]
fn falloff(m: f64, d: f64) -> f64 {
    m / d.powf(STAR_EXPONENT + d / 10000.0)
}

/// Smallest integer radius at which the falloff drops to the cutoff.
///
/// A zero-sized star has no visible contribution anywhere and yields 0.
pub(crate) fn sprite_radius(m: f64) -> u32 {
    let mut d = 0u32;
    while d < MAX_SPRITE_RADIUS {
        let dd = d as f64 * d as f64;
        if !(falloff(m, dd) > STAR_CUTOFF) {
            break;
        }
        d += 1;
    }
    d
}

/// Draws one star sprite into a square region around its centre.
#[derive(Debug, Clone)]
pub struct StarGenerator {
    color: Rgb,
    x: i64,
    y: i64,
    m: f64,
    side: u32,
    cursor: ScanCursor,
    state: GeneratorState,
}

impl StarGenerator {
    /// Create a star centred at `(x, y)` (rounded to the nearest texel).
    pub fn new(color: Rgb, x: f64, y: f64, size: f64) -> Result<Self, SpaceError> {
        let x = finite("star", "x", x)?;
        let y = finite("star", "y", y)?;
        let size = at_least("star", "size", size, 0.0, false)?;
        Ok(Self::from_parts(color, x, y, size))
    }

    pub(crate) fn from_parts(color: Rgb, x: f64, y: f64, size: f64) -> Self {
        let m = size.powf(STAR_EXPONENT * 2.0);
        let side = sprite_radius(m);
        Self {
            color,
            x: x.round() as i64,
            y: y.round() as i64,
            m,
            side,
            cursor: ScanCursor::new(side * 2, side * 2),
            state: GeneratorState::Pending,
        }
    }

    /// Half-width of the sprite's bounding square.
    pub fn side(&self) -> u32 {
        self.side
    }
}

impl CanvasLayer for StarGenerator {
    fn advance(&mut self, canvas: &mut PixelBuffer) -> Progress {
        let progress = match self.cursor.advance() {
            ScanStep::Finished => Progress::DONE,
            ScanStep::Cell { x, y, progress } => {
                let dx = x as f64 - self.side as f64;
                let dy = y as f64 - self.side as f64;
                let intensity = falloff(self.m, dx * dx + dy * dy).min(1.0);
                canvas.blend_pixel(
                    x as i64 + self.x - self.side as i64,
                    y as i64 + self.y - self.side as i64,
                    self.color,
                    intensity,
                );
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

    fn canvas(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::opaque(w, h, Rgb::BLACK, FlushPolicy::default()).unwrap()
    }

    fn run(star: &mut StarGenerator, canvas: &mut PixelBuffer) -> usize {
        let mut steps = 0;
        while !star.advance(canvas).finished {
            steps += 1;
            assert!(steps < 1_000_000, "star never finished");
        }
        steps
    }

    #[test]
    fn test_zero_size_has_empty_sprite() {
        let mut star = StarGenerator::new(Rgb::WHITE, 10.0, 10.0, 0.0).unwrap();
        assert_eq!(star.side(), 0);
        let mut c = canvas(20, 20);
        let before = c.back().clone();
        assert!(star.advance(&mut c).finished);
        assert_eq!(c.back(), &before);
        assert_eq!(star.state(), GeneratorState::Done);
    }

    #[test]
    fn test_sprite_radius_grows_with_size() {
        let small = StarGenerator::new(Rgb::WHITE, 0.0, 0.0, 0.1).unwrap().side();
        let large = StarGenerator::new(Rgb::WHITE, 0.0, 0.0, 1.0).unwrap().side();
        assert!(small > 0);
        assert!(large > small, "radius {large} should exceed {small}");
    }

    #[test]
    fn test_falloff_at_radius_is_below_cutoff() {
        for size in [0.01, 0.2, 0.5, 2.0] {
            let star = StarGenerator::new(Rgb::WHITE, 0.0, 0.0, size).unwrap();
            let d = star.side() as f64;
            assert!(falloff(star.m, d * d) <= STAR_CUTOFF);
        }
    }

    #[test]
    fn test_centre_is_brightest() {
        let mut c = canvas(64, 64);
        let mut star = StarGenerator::new(Rgb::WHITE, 32.0, 32.0, 0.5).unwrap();
        let steps = run(&mut star, &mut c);
        let side = star.side() as usize;
        assert_eq!(steps, 4 * side * side);
        assert_eq!(c.back().get(32, 32), [255, 255, 255, 255]);
        let near = c.back().get(33, 32)[0];
        let far_x = (32 + side as u32 - 1).min(63);
        let far = c.back().get(far_x, 32)[0];
        assert!(near >= far, "falloff should decrease away from centre");
    }

    #[test]
    fn test_sprite_clipped_at_edges() {
        let mut c = canvas(8, 8);
        let mut star = StarGenerator::new(Rgb::WHITE, 0.0, 0.0, 0.5).unwrap();
        run(&mut star, &mut c);
        assert_eq!(c.back().get(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_advance_after_done_is_noop() {
        let mut c = canvas(16, 16);
        let mut star = StarGenerator::new(Rgb::WHITE, 8.0, 8.0, 0.3).unwrap();
        run(&mut star, &mut c);
        let snapshot = c.back().clone();
        for _ in 0..10 {
            assert!(star.advance(&mut c).finished);
        }
        assert_eq!(c.back(), &snapshot);
    }

    #[test]
    fn test_rejects_negative_size() {
        assert!(matches!(
            StarGenerator::new(Rgb::WHITE, 0.0, 0.0, -1.0),
            Err(SpaceError::InvalidParameter { name: "size", .. })
        ));
        assert!(StarGenerator::new(Rgb::WHITE, f64::NAN, 0.0, 1.0).is_err());
    }
}
