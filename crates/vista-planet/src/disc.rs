//! A quick orthographic preview: the planet drawn as a lit disc.

use glam::DVec3;
use tracing::debug;
use vista_noise::{GradientNoise3D, Seed};
use vista_raster::{
    CheckedGradient, ColorGradient, FlushPolicy, GeneratorState, Incremental, PixelBuffer, Progress, Rgb,
    ScanCursor, ScanStep,
};

use crate::error::PlanetError;

/// Octave frequencies and their weights. The weights sum past one, so the
/// total is clamped.
const OCTAVES: [(f64, f64); 4] = [
    (4.0, 1.0 / 1.125),
    (8.0, 1.0 / 4.0),
    (16.0, 1.0 / 8.0),
    (32.0, 1.0 / 16.0),
];

/// Height to colour, from deep water to snow.
fn terrain_gradient() -> Result<CheckedGradient, PlanetError> {
    let gradient = ColorGradient::with_stops([
        (0.0, Rgb::new(0.0, 0.0, 0.5)),
        (0.5, Rgb::new(0.0, 0.0, 1.0)),
        (0.65, Rgb::new(0.5, 0.5, 1.0)),
        (0.75, Rgb::new(0.5, 0.5, 0.0)),
        (0.85, Rgb::new(0.0, 0.8, 0.0)),
        (0.95, Rgb::new(0.5, 0.5, 0.5)),
        (1.0, Rgb::WHITE),
    ])?;
    Ok(CheckedGradient::try_from(gradient)?)
}

/// Draws a `size x size` Lambert-lit sphere seen head on.
///
/// Texels outside the disc are left transparent.
pub struct PlanetDiscGenerator {
    size: u32,
    light: DVec3,
    noise: GradientNoise3D,
    gradient: CheckedGradient,
    canvas: PixelBuffer,
    cursor: ScanCursor,
    state: GeneratorState,
}

impl PlanetDiscGenerator {
    pub fn new(seed: &Seed, size: u32, policy: FlushPolicy) -> Result<Self, PlanetError> {
        let canvas = PixelBuffer::new(size, size, policy)?;
        debug!(%seed, size, "planet disc generator created");
        Ok(Self {
            size,
            light: DVec3::new(1.0, -1.0, 2.0).normalize(),
            noise: GradientNoise3D::from_seed(seed),
            gradient: terrain_gradient()?,
            canvas,
            cursor: ScanCursor::new(size, size),
            state: GeneratorState::Pending,
        })
    }

    /// Weighted octave height at a point on the sphere of radius `size / 2`.
    fn height(&self, p: DVec3) -> f64 {
        let q = p / self.size as f64;
        OCTAVES
            .iter()
            .map(|&(scale, weight)| self.noise.noise(q.x * scale, q.y * scale, q.z * scale) * weight)
            .sum::<f64>()
            .min(1.0)
    }

    fn shade(&mut self, px: u32, py: u32) {
        let c = self.size as f64 * 0.5;
        let x = px as f64 + 0.5 - c;
        let y = py as f64 + 0.5 - c;
        let d2 = x * x + y * y;
        if d2 >= c * c {
            return;
        }
        let p = DVec3::new(x, y, (c * c - d2).sqrt());
        let lambert = (p / c).dot(self.light);
        let i = self.height(p);
        let color = self.gradient.sample(i);
        self.canvas.set_pixel(px, py, color.scale(i * lambert), 1.0);
    }

    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    pub fn into_canvas(self) -> PixelBuffer {
        self.canvas
    }
}

impl Incremental for PlanetDiscGenerator {
    fn advance(&mut self) -> Progress {
        let progress = match self.cursor.advance() {
            ScanStep::Finished => {
                if self.state != GeneratorState::Done {
                    self.canvas.flush();
                }
                Progress::DONE
            }
            ScanStep::Cell { x, y, progress } => {
                self.canvas.note_row(y);
                self.shade(x, y);
                Progress::partial(progress)
            }
        };
        self.state = GeneratorState::after(progress);
        progress
    }

    fn state(&self) -> GeneratorState {
        self.state
    }

    fn status_label(&self) -> String {
        match self.state {
            GeneratorState::Done => "Rendering complete.".to_string(),
            _ => "Rendering planet".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(seed: &str, size: u32) -> PixelBuffer {
        let mut disc = PlanetDiscGenerator::new(&Seed::from(seed), size, FlushPolicy::default()).unwrap();
        while !disc.advance().finished {}
        disc.into_canvas()
    }

    #[test]
    fn test_corners_untouched_centre_opaque() {
        let canvas = render("disc", 32);
        let front = canvas.front();
        for (x, y) in [(0, 0), (31, 0), (0, 31), (31, 31)] {
            assert_eq!(front.get(x, y), [0, 0, 0, 0], "corner ({x}, {y})");
        }
        assert_eq!(front.get(16, 16)[3], 255);
    }

    #[test]
    fn test_lit_side_brighter_than_shadow() {
        // Light comes from +x, -y, so the upper right limb is lit.
        let canvas = render("light", 64);
        let luma = |x, y| {
            let [r, g, b, _] = canvas.front().get(x, y);
            r as u32 + g as u32 + b as u32
        };
        let lit: u32 = (40..48).map(|i| luma(i, 64 - i)).sum();
        let dark: u32 = (16..24).map(|i| luma(i, 64 - i)).sum();
        assert!(lit >= dark, "lit {lit} < dark {dark}");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(render("same", 24).front(), render("same", 24).front());
    }

    #[test]
    fn test_gradient_has_seven_stops() {
        assert_eq!(terrain_gradient().unwrap().stops().len(), 7);
    }

    #[test]
    fn test_every_disc_texel_is_shaded() {
        // Peak heights clamp to 1.0, the last stop, which must still colour the texel.
        let canvas = render("every", 20);
        let front = canvas.front();
        let c = 10.0;
        for y in 0..20u32 {
            for x in 0..20u32 {
                let dx = x as f64 + 0.5 - c;
                let dy = y as f64 + 0.5 - c;
                let inside = dx * dx + dy * dy < c * c;
                assert_eq!(front.get(x, y)[3] == 255, inside, "texel ({x}, {y})");
            }
        }
    }
}
