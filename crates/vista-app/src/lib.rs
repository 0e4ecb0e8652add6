//! Headless driver for the vista renderer: builds a render job from the
//! configuration and time-slices it to completion.

pub mod frame_driver;
pub mod job;
pub mod platform;

pub use frame_driver::{DriverStats, FrameDriver, SliceReport};
pub use job::{AppError, RenderJob, RenderOutput};
pub use platform::{PlatformDirs, PlatformError};
