//! Raster plumbing shared by every generator: the resumable scan cursor,
//! RGBA surfaces with batched flushing, colour gradients, and the progress
//! vocabulary generators report through.

mod buffer;
mod color;
mod error;
mod gradient;
mod progress;
mod scan;
mod surface;

pub use buffer::{FlushPolicy, PixelBuffer};
pub use color::{Rgb, smootherstep};
pub use error::RasterError;
pub use gradient::{CheckedGradient, ColorGradient, ColorStop};
pub use progress::{GeneratorState, Incremental, Progress};
pub use scan::{ScanCursor, ScanStep};
pub use surface::RasterSurface;
