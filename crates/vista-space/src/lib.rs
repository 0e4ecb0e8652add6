//! Space vista synthesis: point-star dust, star sprites, glowing suns and
//! domain-warped nebulae, composited onto one canvas by a seeded queue.

pub mod composer;
pub mod glow;
pub mod layer;
pub mod nebula;
pub mod point_stars;
pub mod star;

mod error;

pub use composer::{GenerationQueue, GeneratorKind, VistaComposer, VistaOptions, VistaProgress};
pub use error::SpaceError;
pub use glow::GlowSourceGenerator;
pub use layer::{CanvasLayer, LayerGenerator};
pub use nebula::NebulaGenerator;
pub use point_stars::PointStarField;
pub use star::StarGenerator;
