//! Background dust of single-pixel stars.

use vista_noise::{RandomSource, SeededRandom};
use vista_raster::{GeneratorState, PixelBuffer, Progress, Rgb};

use crate::layer::CanvasLayer;

/// Canvas area per point star.
const AREA_PER_POINT: f64 = 512.0;

/// Scatters `ceil(width * height / 512)` white points, one per step.
///
/// Point alpha is `c^3` for a uniform draw `c`, so most points are faint.
#[derive(Debug, Clone)]
pub struct PointStarField<R = SeededRandom> {
    rng: R,
    width: u32,
    height: u32,
    count: u64,
    drawn: u64,
    state: GeneratorState,
}

impl<R: RandomSource> PointStarField<R> {
    /// Create a field over a `width x height` canvas drawing from `rng`.
    pub fn new(width: u32, height: u32, rng: R) -> Self {
        let area = width as f64 * height as f64;
        Self {
            rng,
            width,
            height,
            count: (area / AREA_PER_POINT).ceil() as u64,
            drawn: 0,
            state: GeneratorState::Pending,
        }
    }

    /// Total number of points this field draws.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<R: RandomSource> CanvasLayer for PointStarField<R> {
    fn advance(&mut self, canvas: &mut PixelBuffer) -> Progress {
        let progress = if self.drawn >= self.count {
            Progress::DONE
        } else {
            let x = self.rng.next_f64() * self.width as f64;
            let y = self.rng.next_f64() * self.height as f64;
            let c = self.rng.next_f64();
            canvas.blend_pixel(x.floor() as i64, y.floor() as i64, Rgb::WHITE, c * c * c);
            let fraction = self.drawn as f64 / self.count as f64;
            self.drawn += 1;
            Progress::partial(fraction)
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
    use vista_noise::Seed;
    use vista_raster::FlushPolicy;

    #[test]
    fn test_point_count() {
        let field = PointStarField::new(64, 32, SeededRandom::new(&Seed::from("dust")));
        assert_eq!(field.count(), 4);
        let field = PointStarField::new(10, 10, SeededRandom::new(&Seed::from("dust")));
        assert_eq!(field.count(), 1);
    }

    #[test]
    fn test_draws_count_points_then_finishes() {
        let mut canvas = PixelBuffer::opaque(128, 128, Rgb::BLACK, FlushPolicy::default()).unwrap();
        let mut field = PointStarField::new(128, 128, SeededRandom::new(&Seed::from("dust")));
        let mut steps = 0;
        while !field.advance(&mut canvas).finished {
            steps += 1;
        }
        assert_eq!(steps, 32);
        assert_eq!(field.state(), GeneratorState::Done);
        assert!(field.advance(&mut canvas).finished);
    }
}
