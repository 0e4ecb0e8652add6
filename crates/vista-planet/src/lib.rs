//! Planet imagery: equirectangular texture sets for a sphere mesh, and the
//! flat Lambert-lit disc preview.

pub mod disc;
mod error;
pub mod texture;

pub use disc::PlanetDiscGenerator;
pub use error::PlanetError;
pub use texture::{PlanetTextureGenerator, PlanetTextureParams, PlanetTextures};
