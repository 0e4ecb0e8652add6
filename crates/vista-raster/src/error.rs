//! Raster construction and encoding errors.

/// Errors raised when building surfaces and gradients or encoding output.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// Width or height is zero.
    #[error("raster dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// A gradient was sampled before it had two stops.
    #[error("colour gradient needs at least 2 stops, has {0}")]
    TooFewStops(usize),

    /// A gradient stop position was outside `[0, 1]` or not finite.
    #[error("colour stop position must lie in [0, 1], got {0}")]
    InvalidStopPosition(f64),

    /// PNG encoding failed.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}
