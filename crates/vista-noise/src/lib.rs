//! Seeded procedural noise for planet and space vista synthesis.
//!
//! Provides a deterministic random stream, classic 3D gradient noise over a
//! seeded permutation table, and a layered sampler that composites octaves,
//! domain warping ("smear") and ridging into a single density field.

mod error;
mod gradient;
mod layered;
mod random;

pub use error::NoiseError;
pub use gradient::GradientNoise3D;
pub use layered::{LayeredNoiseSampler, NoiseParameters, octave, ridge};
pub use random::{RandomSource, Seed, SeededRandom};
