//! Nebula clouds from recursively domain-warped gradient noise.
//!
//! Each warp level samples the noise at half the divisor of the level above
//! and feeds its value back in as a coordinate offset, giving swirled
//! filaments distinct from the octave sums of the layered sampler.

use vista_noise::GradientNoise3D;
use vista_raster::{GeneratorState, PixelBuffer, Progress, Rgb, ScanCursor, ScanStep};

use crate::error::{SpaceError, at_least, finite};
use crate::layer::CanvasLayer;

/// Number of warp levels above the base sample.
pub const NEBULA_DEPTH: u32 = 5;

/// Divisor of the outermost warp level.
const NEBULA_DIVISOR: f64 = 2.0;

/// Alpha-composites a coloured noise cloud over the whole canvas.
#[derive(Debug, Clone)]
pub struct NebulaGenerator {
    color: Rgb,
    scale: f64,
    intensity: f64,
    falloff: f64,
    noise: GradientNoise3D,
    cursor: ScanCursor,
    state: GeneratorState,
}

impl NebulaGenerator {
    /// Create a nebula over a `width x height` canvas.
    ///
    /// Canvas coordinates are divided by `scale` before warping.
    pub fn new(
        color: Rgb,
        scale: f64,
        intensity: f64,
        falloff: f64,
        noise: GradientNoise3D,
        width: u32,
        height: u32,
    ) -> Result<Self, SpaceError> {
        let scale = at_least("nebula", "scale", scale, 0.0, true)?;
        let intensity = finite("nebula", "intensity", intensity)?;
        let falloff = finite("nebula", "falloff", falloff)?;
        Ok(Self::from_parts(color, scale, intensity, falloff, noise, width, height))
    }

    pub(crate) fn from_parts(
        color: Rgb,
        scale: f64,
        intensity: f64,
        falloff: f64,
        noise: GradientNoise3D,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            color,
            scale,
            intensity,
            falloff,
            noise,
            cursor: ScanCursor::new(width, height),
            state: GeneratorState::Pending,
        }
    }

    /// The warped field at scaled coordinates, in `[0, 1]`.
    pub fn field(&self, x: f64, y: f64) -> f64 {
        let mut divisor = NEBULA_DIVISOR / 2f64.powi(NEBULA_DEPTH as i32);
        let mut value = self.noise.noise(x / divisor, y / divisor, 0.0);
        for _ in 0..NEBULA_DEPTH {
            divisor *= 2.0;
            value = self.noise.noise(x / divisor + value, y / divisor + value, 0.0);
        }
        value
    }

    /// Opacity at a canvas texel.
    pub fn opacity(&self, px: u32, py: u32) -> f64 {
        let v = self.field(px as f64 / self.scale, py as f64 / self.scale);
        (v * self.intensity).min(1.0).powf(self.falloff)
    }
}

impl CanvasLayer for NebulaGenerator {
    fn advance(&mut self, canvas: &mut PixelBuffer) -> Progress {
        let progress = match self.cursor.advance() {
            ScanStep::Finished => Progress::DONE,
            ScanStep::Cell { x, y, progress } => {
                canvas.note_row(y);
                let alpha = self.opacity(x, y);
                canvas.blend_pixel(x as i64, y as i64, self.color, alpha);
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
