//! The step interface shared by canvas layers, and the tagged union the
//! composer dispatches through.

use vista_raster::{GeneratorState, PixelBuffer, Progress};

use crate::glow::GlowSourceGenerator;
use crate::nebula::NebulaGenerator;
use crate::point_stars::PointStarField;
use crate::star::StarGenerator;

/// A generator that paints onto a canvas it does not own.
///
/// Each call to [`advance`](Self::advance) touches at most one texel. After
/// the generator reports `finished`, further calls leave the canvas untouched
/// and keep reporting `finished`.
pub trait CanvasLayer {
    /// Perform one unit of work on `canvas`.
    fn advance(&mut self, canvas: &mut PixelBuffer) -> Progress;

    /// Current lifecycle state.
    fn state(&self) -> GeneratorState;
}

/// One queued layer, resolved to its concrete generator when it starts.
#[derive(Debug)]
pub enum LayerGenerator {
    PointStars(PointStarField),
    Star(StarGenerator),
    Nebula(NebulaGenerator),
    Glow(GlowSourceGenerator),
}

impl CanvasLayer for LayerGenerator {
    fn advance(&mut self, canvas: &mut PixelBuffer) -> Progress {
        match self {
            LayerGenerator::PointStars(g) => g.advance(canvas),
            LayerGenerator::Star(g) => g.advance(canvas),
            LayerGenerator::Nebula(g) => g.advance(canvas),
            LayerGenerator::Glow(g) => g.advance(canvas),
        }
    }

    fn state(&self) -> GeneratorState {
        match self {
            LayerGenerator::PointStars(g) => g.state(),
            LayerGenerator::Star(g) => g.state(),
            LayerGenerator::Nebula(g) => g.state(),
            LayerGenerator::Glow(g) => g.state(),
        }
    }
}
